// src/dynamics.rs
//
// Glucose transition model.
//
// One step of the patient's glucose:
//
//   drift = w1*age + w2*bmi + w3[a]*k + w4*w3[a]/(age*bmi)
//   g'    ~ Normal(g + 0.2*drift, 5.0)
//   g'    = clamp(g', 40, 500)
//
// The functions here are pure given the RNG and never touch episode
// bookkeeping.

use rand::Rng;

use crate::actions::Medication;
use crate::config::DynamicsConfig;
use crate::error::EnvError;
use crate::sampling::sample_normal;
use crate::state::PatientState;

/// Deterministic component of the glucose change.
///
/// Fails with `DegeneratePatient` when `age * bmi == 0` or the result is
/// not finite.
pub fn drift(
    cfg: &DynamicsConfig,
    state: &PatientState,
    medication: Medication,
) -> Result<f64, EnvError> {
    let denom = state.age * state.bmi;
    if denom == 0.0 {
        return Err(EnvError::DegeneratePatient {
            age: state.age,
            bmi: state.bmi,
        });
    }

    let w3 = medication.coefficient();
    let d = cfg.w_age * state.age
        + cfg.w_bmi * state.bmi
        + w3 * cfg.normalization_factor
        + cfg.w_interaction * w3 / denom;

    if !d.is_finite() {
        return Err(EnvError::DegeneratePatient {
            age: state.age,
            bmi: state.bmi,
        });
    }
    Ok(d)
}

/// Mean of the next-glucose distribution.
pub fn expected_next_glucose(
    cfg: &DynamicsConfig,
    state: &PatientState,
    medication: Medication,
) -> Result<f64, EnvError> {
    Ok(state.glucose + cfg.drift_scale * drift(cfg, state, medication)?)
}

/// Sample the next glucose and clamp it to `[glucose_min, glucose_max]`.
///
/// Does not mutate `state`; the caller commits the value.
pub fn next_glucose<R: Rng + ?Sized>(
    cfg: &DynamicsConfig,
    state: &PatientState,
    medication: Medication,
    rng: &mut R,
) -> Result<f64, EnvError> {
    let mean = expected_next_glucose(cfg, state, medication)?;
    let raw = sample_normal(rng, mean, cfg.noise_std);
    Ok(raw.clamp(cfg.glucose_min, cfg.glucose_max))
}
