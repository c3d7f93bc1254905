// src/error.rs
//
// Error types for the glucose environment.
//
// Every error is a caller contract violation. Nothing here is retried or
// suppressed: the environment checks before it mutates, so an Err always
// leaves the episode exactly as it was.

use std::fmt;

/// Errors raised by `DiabetesEnv` and the transition model.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Action code outside the medication catalog.
    InvalidAction { code: i64 },
    /// `age * bmi == 0` (or a non-finite drift), so the interaction term
    /// of the drift is undefined.
    DegeneratePatient { age: f64, bmi: f64 },
    /// `step` called before the first `reset`.
    NotReset,
    /// `step` called after the episode reached its step limit.
    EpisodeTerminated { step_limit: u64 },
    /// Environment constructed from an invalid configuration.
    InvalidConfig(ConfigError),
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidAction { code } => {
                write!(f, "invalid action {} (expected 0..=4)", code)
            }
            EnvError::DegeneratePatient { age, bmi } => write!(
                f,
                "glucose drift undefined for age={} bmi={} (age * bmi must be non-zero)",
                age, bmi
            ),
            EnvError::NotReset => write!(f, "step called before reset"),
            EnvError::EpisodeTerminated { step_limit } => write!(
                f,
                "episode already terminated after {} steps; call reset first",
                step_limit
            ),
            EnvError::InvalidConfig(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for EnvError {
    fn from(err: ConfigError) -> Self {
        EnvError::InvalidConfig(err)
    }
}

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Validation { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Validation { field, message } => {
                write!(f, "config validation error in '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
