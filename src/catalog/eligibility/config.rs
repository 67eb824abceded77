use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

const DEFAULT_LARGE_FAMILY_MIN_CHILDREN: usize = 4;

/// Tunables for the requirement rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Children needed for a "famiglia numerosa" requirement.
    pub large_family_min_children: usize,
    /// Calendar year used for birth-year arithmetic; `None` means the current year.
    pub reference_year: Option<i32>,
}

impl EligibilityConfig {
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub(crate) fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| Local::now().date_naive().year())
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            large_family_min_children: DEFAULT_LARGE_FAMILY_MIN_CHILDREN,
            reference_year: None,
        }
    }
}
