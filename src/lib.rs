//! glucosim core library.
//!
//! A single simulated diabetic patient whose blood glucose evolves in
//! response to a chosen medication, exposed through a Gym-style episodic
//! interface. The binary (`src/main.rs`) is just a thin harness that runs
//! episodes with a built-in policy.
//!
//! # Architecture
//!
//! - **Actions** (`actions`): the medication catalog (code, name, w3).
//! - **State** (`state`, `observation`): the patient record and the
//!   `(age, bmi, glucose)` observation.
//! - **Dynamics** (`dynamics`): deterministic drift + Normal noise, clamped
//!   to `[40, 500]`. Pure given an RNG.
//! - **Reward** (`reward`): first-match-wins scoring of the new glucose.
//! - **Environment** (`env`): reset / step / render / close and all episode
//!   bookkeeping. Owns a seeded ChaCha8 RNG.
//!
//! Around the core:
//!
//! - **Config** (`config`): coefficients, reset distributions, overrides,
//!   step limit, env-var overrides.
//! - **Logging** (`logging`): `EventSink` trait with noop / line sinks.
//! - **Policies** (`policy`) and **Runner** (`runner`): drive full episodes.

pub mod actions;
pub mod config;
pub mod dynamics;
pub mod env;
pub mod error;
pub mod logging;
pub mod observation;
pub mod policy;
pub mod render;
pub mod reward;
pub mod runner;
pub mod sampling;
pub mod state;

// --- Re-exports for ergonomic external use ---------------------------------

pub use actions::{Medication, ACTION_COUNT};
pub use config::{Config, DynamicsConfig, EpisodeSettings, InitialConditions, NormalParams};
pub use env::{DiabetesEnv, EpisodePhase, StepInfo, StepResult};
pub use error::{ConfigError, EnvError};
pub use logging::{EventSink, LineSink, NoopSink, StderrSink};
pub use observation::{Observation, OBS_DIM};
pub use policy::{FixedPolicy, Policy, RandomPolicy, ThresholdPolicy};
pub use reward::{score_glucose, GlucoseBand, RewardOutcome};
pub use runner::{EpisodeRunner, EpisodeSummary};
pub use state::{PatientOverrides, PatientState};
