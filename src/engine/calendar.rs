/// Frequency-aware date arithmetic
///
/// A period is one calendar day for daily habits and one ISO week (Monday to
/// Sunday) for weekly habits. Everything here is pure.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{DomainError, Frequency};

/// Length of `amount` periods
fn span(frequency: Frequency, amount: u32) -> Duration {
    match frequency {
        Frequency::Daily => Duration::days(i64::from(amount)),
        Frequency::Weekly => Duration::weeks(i64::from(amount)),
    }
}

/// Move `amount` periods forward, saturating at the last representable date
pub fn advance(date: NaiveDate, frequency: Frequency, amount: u32) -> NaiveDate {
    date.checked_add_signed(span(frequency, amount))
        .unwrap_or(NaiveDate::MAX)
}

/// Move `amount` periods backward, saturating at the first representable date
pub fn retreat(date: NaiveDate, frequency: Frequency, amount: u32) -> NaiveDate {
    date.checked_sub_signed(span(frequency, amount))
        .unwrap_or(NaiveDate::MIN)
}

/// First day of the period containing `date`
///
/// Clamped to the first representable date for the week that contains it.
pub fn period_start(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => date
            .checked_sub_signed(Duration::days(i64::from(
                date.weekday().num_days_from_monday(),
            )))
            .unwrap_or(NaiveDate::MIN),
    }
}

/// Last day of the period containing `date`
///
/// Clamped to the last representable date for the week that contains it.
pub fn period_end(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => date
            .checked_add_signed(Duration::days(i64::from(
                6 - date.weekday().num_days_from_monday(),
            )))
            .unwrap_or(NaiveDate::MAX),
    }
}

/// Whether two dates fall in the same period
///
/// Weekly comparison uses the (ISO week, week-based year) pair, so
/// 2024-12-30 and 2025-01-05 are the same week.
pub fn same_period(frequency: Frequency, a: NaiveDate, b: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => a == b,
        Frequency::Weekly => a.iso_week() == b.iso_week(),
    }
}

/// Whether any execution falls in the period containing `date`
pub fn has_execution_in_period(
    frequency: Frequency,
    executions: &BTreeSet<NaiveDate>,
    date: NaiveDate,
) -> bool {
    match frequency {
        Frequency::Daily => executions.contains(&date),
        Frequency::Weekly => executions
            .range(period_start(frequency, date)..=period_end(frequency, date))
            .next()
            .is_some(),
    }
}

/// Number of periods touched by the inclusive range [start, end]
///
/// Weeks are counted by stepping from the start week to the end week one
/// boundary at a time, never by subtracting week-of-year numbers, so ranges
/// that cross a year end count correctly.
pub fn periods_between(
    frequency: Frequency,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<u32, DomainError> {
    if end < start {
        return Err(DomainError::InvalidRange { start, end });
    }

    match frequency {
        Frequency::Daily => {
            let days = (end - start).num_days() + 1;
            u32::try_from(days).map_err(|_| DomainError::InvalidRange { start, end })
        }
        Frequency::Weekly => {
            let last = period_start(frequency, end);
            let mut cursor = period_start(frequency, start);
            let mut count = 1;
            while cursor < last {
                let next = advance(cursor, frequency, 1);
                if next == cursor {
                    break;
                }
                cursor = next;
                count += 1;
            }
            Ok(count)
        }
    }
}
