// src/runner.rs
//
// Episode runner: drives a DiabetesEnv with a Policy until the episode ends.
//
// The runner is pure orchestration. It resets the env and the policy with
// the same seed, steps until `done`, reports through an EventSink and folds
// the trajectory into an EpisodeSummary. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::env::DiabetesEnv;
use crate::error::EnvError;
use crate::logging::EventSink;
use crate::observation::Observation;
use crate::policy::Policy;
use crate::reward::GlucoseBand;

/// Summary of a completed episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_id: u64,
    pub seed: u64,
    pub policy: String,
    /// Steps executed (equals the step limit for a completed episode).
    pub steps: u64,
    /// Steps in the healthy band this episode.
    pub episode_score: u64,
    /// Environment score after this episode (cumulative across episodes).
    pub cumulative_score: u64,
    pub total_reward: i64,
    /// Fraction of steps in the healthy band.
    pub time_in_range: f64,
    pub hypo_steps: u64,
    pub hyper_steps: u64,
    pub min_glucose: f64,
    pub max_glucose: f64,
    pub mean_glucose: f64,
    pub initial_observation: Observation,
    pub final_observation: Observation,
}

/// Runs episodes and reports them to a sink.
pub struct EpisodeRunner<S: EventSink> {
    sink: S,
    render: bool,
}

impl<S: EventSink> EpisodeRunner<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            render: false,
        }
    }

    /// Render the medication line after every step.
    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one full episode.
    pub fn run_episode<P: Policy + ?Sized>(
        &mut self,
        env: &mut DiabetesEnv,
        policy: &mut P,
        seed: u64,
        episode_id: u64,
    ) -> Result<EpisodeSummary, EnvError> {
        let initial = env.reset(Some(seed));
        policy.reset_episode(seed, episode_id);
        self.sink.log_reset(episode_id, seed, &initial);

        let mut obs = initial;
        let mut total_reward: i64 = 0;
        let mut hypo_steps = 0u64;
        let mut hyper_steps = 0u64;
        let mut min_glucose = f64::INFINITY;
        let mut max_glucose = f64::NEG_INFINITY;
        let mut glucose_sum = 0.0;

        loop {
            let medication = policy.act(&obs);
            let result = env.step_medication(medication)?;
            self.sink.log_step(episode_id, medication, &result);
            if self.render {
                env.render();
            }

            let g = result.observation.glucose;
            total_reward += i64::from(result.reward);
            min_glucose = min_glucose.min(g);
            max_glucose = max_glucose.max(g);
            glucose_sum += g;
            match result.info.band {
                GlucoseBand::Hypoglycemia => hypo_steps += 1,
                GlucoseBand::Hyperglycemia | GlucoseBand::SevereHyperglycemia => {
                    hyper_steps += 1
                }
                GlucoseBand::Target | GlucoseBand::OutOfRange => {}
            }

            obs = result.observation;
            if result.done {
                break;
            }
        }

        if self.render {
            // Terminate the in-place render line.
            println!();
        }

        let steps = env.step_count();
        let summary = EpisodeSummary {
            episode_id,
            seed,
            policy: policy.name().to_string(),
            steps,
            episode_score: env.episode_score(),
            cumulative_score: env.score(),
            total_reward,
            time_in_range: env.episode_score() as f64 / steps as f64,
            hypo_steps,
            hyper_steps,
            min_glucose,
            max_glucose,
            mean_glucose: glucose_sum / steps as f64,
            initial_observation: initial,
            final_observation: obs,
        };
        self.sink.log_episode_end(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Medication;
    use crate::config::Config;
    use crate::logging::{LineSink, NoopSink};
    use crate::policy::{FixedPolicy, ThresholdPolicy};

    #[test]
    fn episode_runs_to_step_limit() {
        let mut env = DiabetesEnv::new(Config::default().with_step_limit(30)).unwrap();
        let mut runner = EpisodeRunner::new(NoopSink);
        let mut policy = ThresholdPolicy::default();

        let summary = runner.run_episode(&mut env, &mut policy, 42, 0).unwrap();

        assert_eq!(summary.steps, 30);
        assert!(env.is_done());
        assert!(summary.time_in_range >= 0.0 && summary.time_in_range <= 1.0);
        assert!(summary.min_glucose >= 40.0 && summary.max_glucose <= 500.0);
        assert_eq!(summary.policy, "threshold");
    }

    #[test]
    fn cumulative_score_carries_across_episodes() {
        let mut env = DiabetesEnv::new(Config::default().with_step_limit(20)).unwrap();
        let mut runner = EpisodeRunner::new(NoopSink);
        let mut policy = ThresholdPolicy::default();

        let first = runner.run_episode(&mut env, &mut policy, 1, 0).unwrap();
        let second = runner.run_episode(&mut env, &mut policy, 2, 1).unwrap();

        assert_eq!(first.cumulative_score, first.episode_score);
        assert_eq!(
            second.cumulative_score,
            first.episode_score + second.episode_score
        );
    }

    #[test]
    fn sink_sees_every_step() {
        let mut env = DiabetesEnv::new(Config::default().with_step_limit(5)).unwrap();
        let mut runner = EpisodeRunner::new(LineSink::new(Vec::new(), 2));
        let mut policy = FixedPolicy::new(Medication::Metformin);

        runner.run_episode(&mut env, &mut policy, 3, 0).unwrap();

        let out = String::from_utf8(runner.into_sink().into_inner()).unwrap();
        assert_eq!(out.lines().filter(|l| l.starts_with("event=step")).count(), 5);
        assert_eq!(out.lines().filter(|l| l.starts_with("event=reset")).count(), 1);
        assert_eq!(
            out.lines().filter(|l| l.starts_with("event=episode_end")).count(),
            1
        );
    }

    #[test]
    fn degenerate_patient_error_propagates() {
        let mut env = DiabetesEnv::new(Config::fixed_patient(60.0, 0.0, 100.0)).unwrap();
        let mut runner = EpisodeRunner::new(NoopSink);
        let mut policy = FixedPolicy::new(Medication::None);

        let err = runner.run_episode(&mut env, &mut policy, 0, 0).unwrap_err();
        assert!(matches!(err, EnvError::DegeneratePatient { .. }));
    }
}
