/// Streak calculation
///
/// A streak is the number of consecutive periods with an execution, ending at
/// the most recent execution. When a new execution leaves the streak shorter
/// than the cached value, the previous run is closed into a StreakRecord.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{Frequency, StreakRecord};
use crate::engine::calendar::{has_execution_in_period, period_end, period_start, retreat};

/// Result of recomputing the streak after an execution was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    /// New value for the habit's current streak
    pub current_streak: u32,
    /// The run that just broke, if any
    pub closed_run: Option<StreakRecord>,
}

/// Count consecutive periods with an execution, walking back from `anchor`
///
/// Returns 0 when the anchor's own period has no execution.
pub fn streak_ending_at(
    frequency: Frequency,
    executions: &BTreeSet<NaiveDate>,
    anchor: NaiveDate,
) -> u32 {
    let Some(&earliest) = executions.iter().next() else {
        return 0;
    };
    if !has_execution_in_period(frequency, executions, anchor) {
        return 0;
    }

    let mut count = 1;
    let mut cursor = anchor;
    // The first representable period has nothing before it
    while period_start(frequency, cursor) > NaiveDate::MIN {
        cursor = retreat(cursor, frequency, 1);
        if period_end(frequency, cursor) < earliest
            || !has_execution_in_period(frequency, executions, cursor)
        {
            break;
        }
        count += 1;
    }
    count
}

/// Streak recomputed from scratch, anchored at the latest execution
pub fn current_streak(frequency: Frequency, executions: &BTreeSet<NaiveDate>) -> u32 {
    executions
        .iter()
        .next_back()
        .map(|&latest| streak_ending_at(frequency, executions, latest))
        .unwrap_or(0)
}

/// Recompute the streak after `new_execution` was added to `executions`
///
/// `executions` must already contain `new_execution`. The streak is anchored at
/// the latest execution, which is the new one unless an older date was
/// back-filled.
pub fn update_streak(
    frequency: Frequency,
    executions: &BTreeSet<NaiveDate>,
    previous_streak: u32,
    new_execution: NaiveDate,
) -> StreakUpdate {
    if executions.len() <= 1 {
        return StreakUpdate {
            current_streak: 1,
            closed_run: None,
        };
    }

    let candidate = current_streak(frequency, executions).max(1);

    let closed_run = if candidate < previous_streak {
        executions
            .range(..new_execution)
            .next_back()
            .map(|&last_of_run| close_run(frequency, last_of_run, previous_streak))
    } else {
        None
    };

    StreakUpdate {
        current_streak: candidate,
        closed_run,
    }
}

/// Build the record for a run of `length` periods ending at `last_of_run`
fn close_run(frequency: Frequency, last_of_run: NaiveDate, length: u32) -> StreakRecord {
    let first_of_run = retreat(last_of_run, frequency, length.saturating_sub(1));
    StreakRecord::new(
        period_start(frequency, first_of_run),
        period_end(frequency, last_of_run),
        length,
        frequency,
    )
}
