// src/reward.rs
//
// Reward shaping on the post-transition glucose level.
//
// Rules are evaluated in this order and the first match wins:
//
//   1. 80 < g < 140   ->  +1, score +1
//   2. g < 60         ->  -4
//   3. g > 300        ->  -3
//   4. g > 450        ->  -4   (shadowed by rule 3)
//   5. otherwise      ->  -1
//
// Rule 4 can never fire under this ordering, so g = 460 scores -3. The
// order is kept as observed; `GlucoseBand::SevereHyperglycemia` exists so
// the band can be reported if the ordering is ever changed.

use serde::{Deserialize, Serialize};

/// Exclusive bounds of the healthy band (mg/dL).
pub const TARGET_LOW: f64 = 80.0;
pub const TARGET_HIGH: f64 = 140.0;
/// Below this glucose is treated as hypoglycemia.
pub const HYPO_THRESHOLD: f64 = 60.0;
/// Above this glucose is treated as hyperglycemia.
pub const HYPER_THRESHOLD: f64 = 300.0;
pub const SEVERE_HYPER_THRESHOLD: f64 = 450.0;

/// Which reward rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlucoseBand {
    Target,
    Hypoglycemia,
    Hyperglycemia,
    SevereHyperglycemia,
    OutOfRange,
}

impl GlucoseBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseBand::Target => "target",
            GlucoseBand::Hypoglycemia => "hypo",
            GlucoseBand::Hyperglycemia => "hyper",
            GlucoseBand::SevereHyperglycemia => "severe_hyper",
            GlucoseBand::OutOfRange => "out_of_range",
        }
    }
}

/// Result of scoring one glucose value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub reward: i32,
    /// Increment to apply to the cumulative score (0 or 1).
    pub score_delta: u64,
    pub band: GlucoseBand,
}

impl RewardOutcome {
    /// `(reward, score_delta)` pair.
    pub fn as_pair(&self) -> (i32, u64) {
        (self.reward, self.score_delta)
    }
}

/// Score a glucose value. Pure: the caller applies `score_delta`.
pub fn score_glucose(glucose: f64) -> RewardOutcome {
    let (reward, score_delta, band) = if TARGET_LOW < glucose && glucose < TARGET_HIGH {
        (1, 1, GlucoseBand::Target)
    } else if glucose < HYPO_THRESHOLD {
        (-4, 0, GlucoseBand::Hypoglycemia)
    } else if glucose > HYPER_THRESHOLD {
        (-3, 0, GlucoseBand::Hyperglycemia)
    } else if glucose > SEVERE_HYPER_THRESHOLD {
        (-4, 0, GlucoseBand::SevereHyperglycemia)
    } else {
        (-1, 0, GlucoseBand::OutOfRange)
    };

    RewardOutcome {
        reward,
        score_delta,
        band,
    }
}
