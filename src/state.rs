// src/state.rs
//
// Patient state for the current episode.
//
// Age and BMI are fixed for the lifetime of an episode (either supplied as
// overrides or sampled at reset). Glucose is the only field the transition
// model mutates.

use serde::{Deserialize, Serialize};

use crate::observation::Observation;

/// Mutable patient record owned by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientState {
    /// Age in years.
    pub age: f64,
    /// Body-mass index (kg/m^2).
    pub bmi: f64,
    /// Blood glucose (mg/dL).
    pub glucose: f64,
}

impl PatientState {
    pub fn new(age: f64, bmi: f64, glucose: f64) -> Self {
        Self { age, bmi, glucose }
    }

    /// Snapshot of the state as seen by a policy.
    pub fn observation(&self) -> Observation {
        Observation {
            age: self.age,
            bmi: self.bmi,
            glucose: self.glucose,
        }
    }
}

/// Fixed patient attributes supplied at construction.
///
/// A `None` field is re-sampled at every reset; a `Some` field is used
/// verbatim at every reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientOverrides {
    pub age: Option<f64>,
    pub bmi: Option<f64>,
    pub glucose: Option<f64>,
}

impl PatientOverrides {
    /// Overrides that pin every attribute.
    pub fn fixed(age: f64, bmi: f64, glucose: f64) -> Self {
        Self {
            age: Some(age),
            bmi: Some(bmi),
            glucose: Some(glucose),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.bmi.is_none() && self.glucose.is_none()
    }
}
