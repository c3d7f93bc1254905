// tests/env_lifecycle_tests.rs
//
// Episode lifecycle of DiabetesEnv through the public API:
// reset / step / termination, score bookkeeping, history and error paths.

use std::time::{Duration, Instant};

use glucosim::{
    score_glucose, Config, DiabetesEnv, EnvError, EpisodePhase, Medication, PatientOverrides,
    ACTION_COUNT,
};

fn default_env() -> DiabetesEnv {
    DiabetesEnv::new(Config::default()).unwrap()
}

#[test]
fn fixed_overrides_reproduce_exact_initial_triple_every_reset() {
    let mut env = DiabetesEnv::new(Config::fixed_patient(60.0, 30.0, 100.0)).unwrap();

    for seed in [0, 1, 99] {
        let obs = env.reset(Some(seed));
        assert_eq!(obs.as_array(), [60.0, 30.0, 100.0]);
    }
    // Also without an explicit seed.
    assert_eq!(env.reset(None).as_array(), [60.0, 30.0, 100.0]);
}

#[test]
fn done_flips_exactly_on_step_365_for_every_action() {
    for code in 0..ACTION_COUNT as i64 {
        let mut env = default_env();
        env.reset(Some(code as u64));

        for step in 1..=365u64 {
            let result = env.step(code).unwrap();
            assert_eq!(result.info.step, step);
            if step < 365 {
                assert!(!result.done, "action {} done early at step {}", code, step);
            } else {
                assert!(result.done, "action {} not done at step 365", code);
            }
        }
        assert_eq!(env.phase(), EpisodePhase::Terminated);
    }
}

#[test]
fn glucose_stays_clamped_over_full_episodes() {
    for code in 0..ACTION_COUNT as i64 {
        let mut env = default_env();
        env.reset(Some(1000 + code as u64));
        loop {
            let result = env.step(code).unwrap();
            let g = result.observation.glucose;
            assert!((40.0..=500.0).contains(&g), "glucose {} out of bounds", g);
            if result.done {
                break;
            }
        }
    }
}

#[test]
fn age_and_bmi_are_constant_within_an_episode() {
    let mut env = default_env();
    let initial = env.reset(Some(17));

    for i in 0..50 {
        let result = env.step(i % ACTION_COUNT as i64).unwrap();
        assert_eq!(result.observation.age, initial.age);
        assert_eq!(result.observation.bmi, initial.bmi);
    }
}

#[test]
fn history_matches_supplied_actions() {
    let mut env = default_env();
    env.reset(Some(4));

    let actions = [0i64, 1, 2, 3, 4, 4, 2, 0];
    for &a in &actions {
        env.step(a).unwrap();
    }

    let expected: Vec<&str> = actions
        .iter()
        .map(|&a| Medication::from_code(a).unwrap().name())
        .collect();
    assert_eq!(env.medication_history().len(), actions.len());
    assert_eq!(env.medication_names(), expected);
    assert_eq!(env.last_medication(), Some(Medication::LowInsulin));
}

#[test]
fn reward_and_score_follow_reward_rules() {
    let mut env = default_env();
    env.reset(Some(21));

    let mut expected_score = 0;
    for _ in 0..100 {
        let result = env.step(2).unwrap();
        let outcome = score_glucose(result.observation.glucose);
        expected_score += outcome.score_delta;

        assert_eq!(result.reward, outcome.reward);
        assert_eq!(result.info.band, outcome.band);
        assert_eq!(result.info.score, expected_score);
    }
}

#[test]
fn out_of_range_action_is_rejected_without_side_effects() {
    let mut env = default_env();
    env.reset(Some(2));
    for _ in 0..3 {
        env.step(0).unwrap();
    }
    let steps = env.step_count();
    let score = env.score();
    let history = env.medication_history().to_vec();
    let obs = env.observation();

    assert_eq!(env.step(7), Err(EnvError::InvalidAction { code: 7 }));

    assert_eq!(env.step_count(), steps);
    assert_eq!(env.score(), score);
    assert_eq!(env.medication_history(), history.as_slice());
    assert_eq!(env.observation(), obs);
}

#[test]
fn reset_clears_episode_state_but_keeps_cumulative_score() {
    let cfg = Config::fixed_patient(60.0, 30.0, 100.0).with_step_limit(50);
    let mut env = DiabetesEnv::new(cfg).unwrap();

    env.reset(Some(10));
    while !env.step(2).unwrap().done {}
    let score_after_first = env.score();
    assert_eq!(env.episode_score(), score_after_first);

    env.reset(Some(11));
    assert_eq!(env.step_count(), 0);
    assert!(env.medication_history().is_empty());
    assert_eq!(env.episode_score(), 0);
    assert_eq!(env.score(), score_after_first);

    let result = env.step(2).unwrap();
    assert_eq!(
        result.info.score,
        score_after_first + result.info.episode_score
    );
}

#[test]
fn stepping_after_termination_is_rejected_until_reset() {
    let mut env = DiabetesEnv::new(Config::default().with_step_limit(3)).unwrap();
    env.reset(Some(0));
    for _ in 0..3 {
        env.step(4).unwrap();
    }

    assert_eq!(
        env.step(4),
        Err(EnvError::EpisodeTerminated { step_limit: 3 })
    );
    assert_eq!(env.step_count(), 3);
    assert_eq!(env.medication_history().len(), 3);

    env.reset(Some(1));
    assert!(env.step(4).is_ok());
}

#[test]
fn step_before_reset_is_rejected() {
    let mut env = default_env();
    assert_eq!(env.phase(), EpisodePhase::Idle);
    assert_eq!(env.step(1), Err(EnvError::NotReset));
}

#[test]
fn zero_bmi_surfaces_domain_error() {
    let cfg = Config::default().with_overrides(PatientOverrides {
        bmi: Some(0.0),
        ..PatientOverrides::default()
    });
    let mut env = DiabetesEnv::new(cfg).unwrap();
    let obs = env.reset(Some(3));

    match env.step(0) {
        Err(EnvError::DegeneratePatient { age, bmi }) => {
            assert_eq!(age, obs.age);
            assert_eq!(bmi, 0.0);
        }
        other => panic!("expected DegeneratePatient, got {:?}", other),
    }
    assert_eq!(env.step_count(), 0);
    assert_eq!(env.observation(), obs);
}

#[test]
fn action_space_and_close() {
    let mut env = default_env();
    assert_eq!(env.action_space_size(), 5);
    assert_eq!(DiabetesEnv::ACTION_COUNT, 5);
    env.close();
}

#[test]
fn step_delay_sleeps_without_changing_the_trajectory() {
    let delay = Duration::from_millis(40);
    let steps = 5u32;

    let mut plain = default_env();
    let mut throttled = DiabetesEnv::new(Config::default().with_step_delay(delay)).unwrap();
    assert_eq!(plain.reset(Some(9)), throttled.reset(Some(9)));

    let expected: Vec<_> = (0..steps).map(|_| plain.step(2).unwrap()).collect();

    let started = Instant::now();
    let actual: Vec<_> = (0..steps).map(|_| throttled.step(2).unwrap()).collect();
    let elapsed = started.elapsed();

    assert_eq!(expected, actual);
    assert!(
        elapsed >= delay * steps,
        "expected at least {:?}, took {:?}",
        delay * steps,
        elapsed
    );
}
