// src/env.rs
//
// Gym-style diabetic patient environment.
//
// - reset(seed) -> observation
// - step(action) -> (observation, reward, done, info)
//
// The environment owns the patient, the episode bookkeeping and a seeded
// ChaCha8 RNG. All state transitions are deterministic given the seed.
//
// Lifecycle:
//
//   Idle --reset--> Active --step x step_limit--> Terminated --reset--> Active
//
// Stepping in Idle or Terminated is an error. The cumulative score survives
// reset; `episode_score` is the per-episode counterpart.

use std::io::{self, Write};
use std::thread;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actions::{Medication, ACTION_COUNT};
use crate::config::Config;
use crate::dynamics;
use crate::error::EnvError;
use crate::observation::Observation;
use crate::render::ConsoleRenderer;
use crate::reward::{score_glucose, GlucoseBand};
use crate::sampling::sample_patient;
use crate::state::PatientState;

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The observation after taking the action.
    pub observation: Observation,
    /// The reward for this step.
    pub reward: i32,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

/// Additional information returned from a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Cumulative score across every episode run on this environment.
    pub score: u64,
    /// Score accumulated in the current episode only.
    pub episode_score: u64,
    /// Step count after this step.
    pub step: u64,
    /// Medication applied this step.
    pub medication: Medication,
    /// Reward rule that matched the new glucose.
    pub band: GlucoseBand,
}

/// Episode phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Constructed, never reset.
    Idle,
    Active,
    /// Step limit reached.
    Terminated,
}

pub struct DiabetesEnv {
    config: Config,
    patient: PatientState,
    rng: ChaCha8Rng,
    seed: u64,
    phase: EpisodePhase,
    step_count: u64,
    /// Cumulative across resets.
    score: u64,
    episode_score: u64,
    medication_history: Vec<Medication>,
}

impl DiabetesEnv {
    pub const ACTION_COUNT: usize = ACTION_COUNT;

    /// Create an environment whose RNG starts from seed 0.
    pub fn new(config: Config) -> Result<Self, EnvError> {
        Self::seeded(config, 0)
    }

    /// Create an environment with an explicit initial RNG seed.
    ///
    /// The seed only matters for `reset(None)`; `reset(Some(s))` reseeds.
    pub fn seeded(config: Config, seed: u64) -> Result<Self, EnvError> {
        config.validate()?;
        Ok(Self {
            config,
            patient: PatientState::new(0.0, 0.0, 0.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            phase: EpisodePhase::Idle,
            step_count: 0,
            score: 0,
            episode_score: 0,
            medication_history: Vec::new(),
        })
    }

    /// Start a new episode.
    ///
    /// `Some(seed)` reseeds the RNG so the episode is reproducible; `None`
    /// draws the next seed from the current RNG. Attributes with overrides
    /// are used verbatim, the rest are sampled.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or_else(|| self.rng.gen());
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        self.patient = sample_patient(&self.config.initial, &self.config.overrides, &mut self.rng);

        self.step_count = 0;
        self.episode_score = 0;
        self.medication_history.clear();
        self.phase = EpisodePhase::Active;

        self.patient.observation()
    }

    /// Take a step with a raw action code in `0..ACTION_COUNT`.
    pub fn step(&mut self, action: i64) -> Result<StepResult, EnvError> {
        let medication = Medication::from_code(action)?;
        self.step_medication(medication)
    }

    /// Take a step with a typed medication.
    ///
    /// Every check (phase, drift domain) happens before any state is
    /// touched, so an Err leaves the environment unchanged.
    pub fn step_medication(&mut self, medication: Medication) -> Result<StepResult, EnvError> {
        match self.phase {
            EpisodePhase::Idle => return Err(EnvError::NotReset),
            EpisodePhase::Terminated => {
                return Err(EnvError::EpisodeTerminated {
                    step_limit: self.config.episode.step_limit,
                })
            }
            EpisodePhase::Active => {}
        }

        let glucose = dynamics::next_glucose(
            &self.config.dynamics,
            &self.patient,
            medication,
            &mut self.rng,
        )?;

        self.medication_history.push(medication);
        self.patient.glucose = glucose;

        let outcome = score_glucose(glucose);
        self.score += outcome.score_delta;
        self.episode_score += outcome.score_delta;

        self.step_count += 1;
        let done = self.step_count >= self.config.episode.step_limit;
        if done {
            self.phase = EpisodePhase::Terminated;
        }

        let delay = self.config.episode.step_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        Ok(StepResult {
            observation: self.patient.observation(),
            reward: outcome.reward,
            done,
            info: StepInfo {
                score: self.score,
                episode_score: self.episode_score,
                step: self.step_count,
                medication,
                band: outcome.band,
            },
        })
    }

    /// Print the medication history to stdout, overwriting the line.
    pub fn render(&self) {
        // Rendering must never disturb the simulation; I/O errors are dropped.
        let _ = ConsoleRenderer::stdout().render(&self.medication_history);
    }

    /// Render the medication history to any writer.
    pub fn render_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        ConsoleRenderer::new(out).render(&self.medication_history)
    }

    pub fn close(&mut self) {}

    pub fn action_space_size(&self) -> usize {
        ACTION_COUNT
    }

    /// Current observation (zeros before the first reset).
    pub fn observation(&self) -> Observation {
        self.patient.observation()
    }

    pub fn patient(&self) -> &PatientState {
        &self.patient
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == EpisodePhase::Terminated
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn step_limit(&self) -> u64 {
        self.config.episode.step_limit
    }

    /// Cumulative score across all episodes.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn episode_score(&self) -> u64 {
        self.episode_score
    }

    pub fn medication_history(&self) -> &[Medication] {
        &self.medication_history
    }

    /// History as medication names, in step order.
    pub fn medication_names(&self) -> Vec<&'static str> {
        self.medication_history.iter().map(|m| m.name()).collect()
    }

    pub fn last_medication(&self) -> Option<Medication> {
        self.medication_history.last().copied()
    }
}
