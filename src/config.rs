// src/config.rs
//
// Central configuration for the glucose environment.
//
// This is the single source of truth for the dynamics coefficients, the
// reset distributions, optional fixed patient attributes and the episode
// bookkeeping (step limit, optional throttle delay).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::PatientOverrides;

/// Mean / standard deviation of a Normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalParams {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// Coefficients of the glucose transition model.
///
/// drift = w_age*age + w_bmi*bmi + w3*normalization_factor
///         + w_interaction*w3/(age*bmi)
/// next  ~ Normal(glucose + drift_scale*drift, noise_std),
///         clamped to [glucose_min, glucose_max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsConfig {
    /// w1: weight on age.
    pub w_age: f64,
    /// w2: weight on BMI.
    pub w_bmi: f64,
    /// w4: weight on the medication / (age*bmi) interaction term.
    pub w_interaction: f64,
    /// Multiplier on the medication coefficient w3.
    pub normalization_factor: f64,
    /// Fraction of the drift applied to the mean of the next glucose.
    pub drift_scale: f64,
    /// Standard deviation of the transition noise (mg/dL).
    pub noise_std: f64,
    /// Lower clamp on glucose after each transition (mg/dL).
    pub glucose_min: f64,
    /// Upper clamp on glucose after each transition (mg/dL).
    pub glucose_max: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            w_age: 0.1,
            w_bmi: 0.2,
            w_interaction: 1.0 / 0.99,
            normalization_factor: 3.0,
            drift_scale: 0.2,
            noise_std: 5.0,
            glucose_min: 40.0,
            glucose_max: 500.0,
        }
    }
}

/// Distributions sampled at reset for attributes without an override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub age: NormalParams,
    pub bmi: NormalParams,
    pub glucose: NormalParams,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            age: NormalParams::new(60.0, 10.0),
            bmi: NormalParams::new(30.0, 5.0),
            glucose: NormalParams::new(100.0, 10.0),
        }
    }
}

/// Episode bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSettings {
    /// Number of steps after which `done` becomes true (one per day).
    pub step_limit: u64,
    /// Sleep applied after every step. Zero disables throttling.
    ///
    /// Purely for pacing external consumers (e.g. a rendering loop);
    /// it has no effect on simulation results.
    pub step_delay: Duration,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        Self {
            step_limit: 365,
            step_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Human-readable config version.
    pub version: &'static str,
    pub dynamics: DynamicsConfig,
    pub initial: InitialConditions,
    pub overrides: PatientOverrides,
    pub episode: EpisodeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "glucosim-v1",
            dynamics: DynamicsConfig::default(),
            initial: InitialConditions::default(),
            overrides: PatientOverrides::default(),
            episode: EpisodeSettings::default(),
        }
    }
}

impl Config {
    /// Config whose every reset returns exactly `(age, bmi, glucose)`.
    pub fn fixed_patient(age: f64, bmi: f64, glucose: f64) -> Self {
        Self::default().with_overrides(PatientOverrides::fixed(age, bmi, glucose))
    }

    pub fn with_overrides(mut self, overrides: PatientOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.episode.step_limit = step_limit;
        self
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.episode.step_delay = step_delay;
        self
    }

    /// Validate the configuration.
    ///
    /// Zero age / BMI overrides are accepted here: they only become an
    /// error when a transition needs the interaction term.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dynamics;
        let coefficients = [
            ("dynamics.w_age", d.w_age),
            ("dynamics.w_bmi", d.w_bmi),
            ("dynamics.w_interaction", d.w_interaction),
            ("dynamics.normalization_factor", d.normalization_factor),
            ("dynamics.drift_scale", d.drift_scale),
            ("dynamics.glucose_min", d.glucose_min),
            ("dynamics.glucose_max", d.glucose_max),
        ];
        for (field, value) in coefficients {
            if !value.is_finite() {
                return Err(ConfigError::validation(field, "must be finite"));
            }
        }

        if !(d.noise_std.is_finite() && d.noise_std > 0.0) {
            return Err(ConfigError::validation(
                "dynamics.noise_std",
                "must be finite and > 0",
            ));
        }
        if d.glucose_min > d.glucose_max {
            return Err(ConfigError::validation(
                "dynamics.glucose_min",
                format!(
                    "glucose_min ({}) must not exceed glucose_max ({})",
                    d.glucose_min, d.glucose_max
                ),
            ));
        }

        let dists = [
            ("initial.age", self.initial.age),
            ("initial.bmi", self.initial.bmi),
            ("initial.glucose", self.initial.glucose),
        ];
        for (field, p) in dists {
            if !p.mean.is_finite() || !p.std_dev.is_finite() || p.std_dev < 0.0 {
                return Err(ConfigError::validation(
                    field,
                    "mean must be finite and std_dev finite and >= 0",
                ));
            }
        }

        let overrides = [
            ("overrides.age", self.overrides.age),
            ("overrides.bmi", self.overrides.bmi),
            ("overrides.glucose", self.overrides.glucose),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ConfigError::validation(field, "must be finite"));
                }
            }
        }

        if self.episode.step_limit == 0 {
            return Err(ConfigError::validation(
                "episode.step_limit",
                "step_limit must be > 0",
            ));
        }

        Ok(())
    }

    /// Defaults plus environment overrides.
    ///
    /// Recognised variables:
    ///
    ///   - GLUCOSIM_AGE            (f64, years; fixes age at every reset)
    ///   - GLUCOSIM_BMI            (f64; fixes BMI at every reset)
    ///   - GLUCOSIM_GLUCOSE        (f64, mg/dL; fixes initial glucose)
    ///   - GLUCOSIM_STEP_LIMIT     (u64)
    ///   - GLUCOSIM_NOISE_STD      (f64, mg/dL)
    ///   - GLUCOSIM_STEP_DELAY_MS  (u64, ms)
    ///
    /// Any variable that fails to parse is ignored with a warning.
    pub fn from_env_or_default() -> Self {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg
    }

    /// Apply overrides from an arbitrary key lookup (the process environment
    /// in production, a map in tests).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override::<f64>(&lookup, "GLUCOSIM_AGE", self.overrides.age) {
            self.overrides.age = Some(v);
        }
        if let Some(v) = parse_override::<f64>(&lookup, "GLUCOSIM_BMI", self.overrides.bmi) {
            self.overrides.bmi = Some(v);
        }
        if let Some(v) =
            parse_override::<f64>(&lookup, "GLUCOSIM_GLUCOSE", self.overrides.glucose)
        {
            self.overrides.glucose = Some(v);
        }
        if let Some(v) = parse_override::<u64>(
            &lookup,
            "GLUCOSIM_STEP_LIMIT",
            Some(self.episode.step_limit),
        ) {
            // Zero is left for validate() to reject, as with --step-limit 0.
            self.episode.step_limit = v;
        }
        if let Some(v) = parse_override::<f64>(
            &lookup,
            "GLUCOSIM_NOISE_STD",
            Some(self.dynamics.noise_std),
        ) {
            self.dynamics.noise_std = v;
        }
        if let Some(v) = parse_override::<u64>(
            &lookup,
            "GLUCOSIM_STEP_DELAY_MS",
            Some(
                u64::try_from(self.episode.step_delay.as_millis()).unwrap_or(u64::MAX),
            ),
        ) {
            self.episode.step_delay = Duration::from_millis(v);
        }
    }
}

/// Parse one override, announcing the outcome on stderr.
fn parse_override<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    current: Option<T>,
) -> Option<T>
where
    T: std::str::FromStr + std::fmt::Debug,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => {
            eprintln!("[config] {key} = {v:?} (overrode default)");
            Some(v)
        }
        Err(_) => {
            eprintln!(
                "[config] WARN: could not parse {key} = {raw:?} as {}; using default {current:?}",
                std::any::type_name::<T>()
            );
            None
        }
    }
}
