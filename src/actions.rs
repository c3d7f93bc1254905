// src/actions.rs
//
// Medication catalog: the discrete action space of the environment.
//
// Each action code maps to a medication name (used for rendering / the
// medication history) and to the dynamics coefficient w3 that drives the
// glucose drift. Codes are stable and ordered:
//
//   0 low_insulin   w3 = -7.0
//   1 high_insulin  w3 = -12.0
//   2 metformin     w3 = -4.5
//   3 glimepiride   w3 = -2.5
//   4 None          w3 = +0.4

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Number of discrete actions.
pub const ACTION_COUNT: usize = 5;

/// A medication choice for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medication {
    LowInsulin,
    HighInsulin,
    Metformin,
    Glimepiride,
    None,
}

impl Medication {
    /// All medications in action-code order.
    pub const ALL: [Medication; ACTION_COUNT] = [
        Medication::LowInsulin,
        Medication::HighInsulin,
        Medication::Metformin,
        Medication::Glimepiride,
        Medication::None,
    ];

    /// Look up a medication by its action code.
    pub fn from_code(code: i64) -> Result<Medication, EnvError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(EnvError::InvalidAction { code })
    }

    /// Stable action code in `0..ACTION_COUNT`.
    pub fn code(self) -> usize {
        match self {
            Medication::LowInsulin => 0,
            Medication::HighInsulin => 1,
            Medication::Metformin => 2,
            Medication::Glimepiride => 3,
            Medication::None => 4,
        }
    }

    /// Name recorded in the medication history.
    pub fn name(self) -> &'static str {
        match self {
            Medication::LowInsulin => "low_insulin",
            Medication::HighInsulin => "high_insulin",
            Medication::Metformin => "metformin",
            Medication::Glimepiride => "glimepiride",
            Medication::None => "None",
        }
    }

    /// Dynamics coefficient w3 for this medication.
    pub fn coefficient(self) -> f64 {
        match self {
            Medication::LowInsulin => -7.0,
            Medication::HighInsulin => -12.0,
            Medication::Metformin => -4.5,
            Medication::Glimepiride => -2.5,
            Medication::None => 0.4,
        }
    }
}

impl TryFrom<i64> for Medication {
    type Error = EnvError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Medication::from_code(code)
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
