/// Statistics policies
///
/// Two behaviors whose intent is still open are kept as explicit switches
/// instead of hidden side effects. The defaults reproduce the established
/// behavior.

use serde::{Deserialize, Serialize};

/// How a freshly computed completion percentage replaces the cached one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PercentagePolicy {
    /// Keep the larger of the cached and the computed value
    #[default]
    NeverDecrease,
    /// Always store the computed value
    Recompute,
}

impl PercentagePolicy {
    pub fn apply(&self, cached: u8, computed: u8) -> u8 {
        match self {
            PercentagePolicy::NeverDecrease => cached.max(computed),
            PercentagePolicy::Recompute => computed,
        }
    }
}

/// What happens to recorded data when frequency or start date changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleChangePolicy {
    /// Drop executions and reset cached statistics, keep closed runs
    #[default]
    ClearExecutions,
    /// Also drop the streak history
    ClearExecutionsAndHistory,
}

impl ScheduleChangePolicy {
    pub fn clears_history(&self) -> bool {
        matches!(self, ScheduleChangePolicy::ClearExecutionsAndHistory)
    }
}

/// All policies the statistics engine runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatisticsPolicy {
    pub percentage: PercentagePolicy,
    pub schedule_change: ScheduleChangePolicy,
}
