//! Working-hours budget for the "today" selection.

use taskrank_core::ValidationError;

/// Hours in one standard working day.
pub const DEFAULT_BUDGET_HOURS: f64 = 8.0;

/// Total hours available for today's selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    hours: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            hours: DEFAULT_BUDGET_HOURS,
        }
    }
}

impl Budget {
    /// Create a budget; the hours must be positive and finite.
    pub fn new(hours: f64) -> Result<Self, ValidationError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(ValidationError::general(format!(
                "hour budget must be a positive number (got {hours})"
            )));
        }
        Ok(Self { hours })
    }

    /// Use `hours` if given, otherwise the default working day.
    pub fn or_default(hours: Option<f64>) -> Result<Self, ValidationError> {
        hours.map_or_else(|| Ok(Self::default()), Self::new)
    }

    /// Total hours.
    pub fn hours(&self) -> f64 {
        self.hours
    }
}

/// Tracks hours committed against a budget.
#[derive(Debug, Clone)]
pub struct HourLedger {
    budget: Budget,
    used: f64,
}

impl HourLedger {
    /// Start with nothing committed.
    pub fn new(budget: Budget) -> Self {
        Self { budget, used: 0.0 }
    }

    /// Whether `hours` more still fit.
    pub fn fits(&self, hours: f64) -> bool {
        self.used + hours <= self.budget.hours
    }

    /// Commit hours.
    pub fn commit(&mut self, hours: f64) {
        self.used += hours;
    }

    /// Hours committed so far.
    pub fn used(&self) -> f64 {
        self.used
    }

    /// Hours left.
    pub fn remaining(&self) -> f64 {
        (self.budget.hours - self.used).max(0.0)
    }
}
