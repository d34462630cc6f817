//! Prioritization modes.

use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// One of the four fixed prioritization policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Quick, easy tasks first.
    FastestWins,
    /// Important tasks first.
    HighImpact,
    /// Closest deadlines first.
    DeadlineDriven,
    /// Weighted blend of urgency, importance and effort.
    #[default]
    SmartBalance,
}

/// Factor weights of a mode. Each mode's weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Weight on urgency.
    pub urgency: f64,
    /// Weight on importance.
    pub impact: f64,
    /// Weight on low effort.
    pub effort: f64,
}

impl Mode {
    /// All modes, in display order.
    pub const ALL: [Mode; 4] = [
        Mode::FastestWins,
        Mode::HighImpact,
        Mode::DeadlineDriven,
        Mode::SmartBalance,
    ];

    /// Wire token used in `?mode=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::FastestWins => "fastest_wins",
            Mode::HighImpact => "high_impact",
            Mode::DeadlineDriven => "deadline_driven",
            Mode::SmartBalance => "smart_balance",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::FastestWins => "Fastest Wins",
            Mode::HighImpact => "High Impact",
            Mode::DeadlineDriven => "Deadline Driven",
            Mode::SmartBalance => "Smart Balance",
        }
    }

    /// Weights applied to the normalized factors.
    pub fn weights(&self) -> Weights {
        match self {
            Mode::FastestWins => Weights { urgency: 0.0, impact: 0.3, effort: 0.7 },
            Mode::HighImpact => Weights { urgency: 0.2, impact: 0.8, effort: 0.0 },
            Mode::DeadlineDriven => Weights { urgency: 0.8, impact: 0.2, effort: 0.0 },
            Mode::SmartBalance => Weights { urgency: 0.4, impact: 0.35, effort: 0.25 },
        }
    }

    /// Resolve an optional query token. Absent means the default mode;
    /// present but unknown is rejected.
    pub fn from_query(token: Option<&str>) -> Result<Self, TaskError> {
        match token {
            None => Ok(Mode::default()),
            Some(t) => t.parse(),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = TaskError;

    /// Case-sensitive: `High_Impact` is not `high_impact`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| TaskError::InvalidMode(s.to_string()))
    }
}
