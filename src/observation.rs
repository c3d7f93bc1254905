// src/observation.rs
//
// Observation returned by reset() and step().
//
// Serializable (serde) so runs can be compared byte-for-byte in
// determinism tests and emitted as JSON by the CLI.

use serde::{Deserialize, Serialize};

/// Number of features in an observation.
pub const OBS_DIM: usize = 3;

/// The `(age, bmi, glucose)` triple seen by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub age: f64,
    pub bmi: f64,
    pub glucose: f64,
}

impl Observation {
    /// Flat feature vector in `(age, bmi, glucose)` order.
    pub fn as_array(&self) -> [f64; OBS_DIM] {
        [self.age, self.bmi, self.glucose]
    }

    /// Serialize to canonical JSON bytes (field order is struct order).
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl From<[f64; OBS_DIM]> for Observation {
    fn from(v: [f64; OBS_DIM]) -> Self {
        Self {
            age: v[0],
            bmi: v[1],
            glucose: v[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_is_age_bmi_glucose() {
        let obs = Observation {
            age: 60.0,
            bmi: 30.0,
            glucose: 100.0,
        };
        assert_eq!(obs.as_array(), [60.0, 30.0, 100.0]);
        assert_eq!(Observation::from(obs.as_array()), obs);
    }

    #[test]
    fn canonical_json_is_stable() {
        let obs = Observation::from([61.5, 28.25, 97.0]);
        let json1 = obs.to_canonical_json().unwrap();
        let json2 = obs.to_canonical_json().unwrap();
        assert_eq!(json1, json2);
        assert_eq!(
            String::from_utf8(json1).unwrap(),
            r#"{"age":61.5,"bmi":28.25,"glucose":97.0}"#
        );
    }
}
