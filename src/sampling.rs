// src/sampling.rs
//
// Random draws used by the environment.
//
// All randomness flows through an explicitly passed `Rng`, so resets and
// transitions are reproducible under a fixed seed. Normal variates use the
// Box-Muller transform over uniform draws.

use rand::Rng;

use crate::config::{InitialConditions, NormalParams};
use crate::state::{PatientOverrides, PatientState};

/// Draw one standard normal variate.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 in (0, 1] keeps ln() finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Draw from `Normal(mean, std_dev)`.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    mean + std_dev * sample_standard_normal(rng)
}

impl NormalParams {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_normal(rng, self.mean, self.std_dev)
    }
}

/// Build the patient for a new episode.
///
/// Each attribute uses its override when present and is sampled otherwise.
/// Draw order is fixed (age, bmi, glucose) and overridden attributes do
/// not consume randomness.
pub fn sample_patient<R: Rng + ?Sized>(
    initial: &InitialConditions,
    overrides: &PatientOverrides,
    rng: &mut R,
) -> PatientState {
    let age = overrides.age.unwrap_or_else(|| initial.age.sample(rng));
    let bmi = overrides.bmi.unwrap_or_else(|| initial.bmi.sample(rng));
    let glucose = overrides
        .glucose
        .unwrap_or_else(|| initial.glucose.sample(rng));
    PatientState::new(age, bmi, glucose)
}
