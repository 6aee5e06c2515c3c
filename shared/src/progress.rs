//! Weight-goal progress math
//!
//! A goal records the weight at the start, the current weight and the target.
//! Whether the user is losing or gaining follows from start and target.

use serde::{Deserialize, Serialize};

/// Direction of a weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    #[serde(alias = "bajar")]
    Lose,
    #[serde(alias = "subir")]
    Gain,
}

impl GoalDirection {
    /// Losing when the target is below the starting weight, gaining otherwise
    pub fn between(start_kg: f64, target_kg: f64) -> Self {
        if target_kg < start_kg {
            GoalDirection::Lose
        } else {
            GoalDirection::Gain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDirection::Lose => "lose",
            GoalDirection::Gain => "gain",
        }
    }
}

/// Lifecycle of a progress goal, stored as a small integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Active = 1,
    Finished = 2,
}

impl ProgressStatus {
    pub fn code(&self) -> i16 {
        *self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(ProgressStatus::Active),
            2 => Some(ProgressStatus::Finished),
            _ => None,
        }
    }
}

/// Percentage of the distance between start and target already covered.
///
/// Movement away from the target counts as zero and overshooting caps at 100.
pub fn progress_percent(start_kg: f64, current_kg: f64, target_kg: f64) -> f64 {
    let total = (start_kg - target_kg).abs();
    if total == 0.0 || !total.is_finite() {
        return 0.0;
    }
    let done = match GoalDirection::between(start_kg, target_kg) {
        GoalDirection::Lose => start_kg - current_kg,
        GoalDirection::Gain => current_kg - start_kg,
    };
    (done / total * 100.0).clamp(0.0, 100.0)
}

pub fn goal_reached(current_kg: f64, target_kg: f64, direction: GoalDirection) -> bool {
    match direction {
        GoalDirection::Lose => current_kg <= target_kg,
        GoalDirection::Gain => current_kg >= target_kg,
    }
}
