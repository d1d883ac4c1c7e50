//! # Order Number Allocation
//!
//! Human-readable order numbers: prefix + `YYMMDD` (local calendar day) +
//! zero-padded 3-digit daily sequence, e.g. `DS241201001`.
//!
//! The allocator is a pure function of the numbers already issued today.
//! Uniqueness under concurrency is the storage layer's job: a duplicate insert
//! surfaces as `AllocationConflict` and the caller allocates again.

use crate::constants::{MAX_DAILY_SEQUENCE, ORDER_NUMBER_PREFIX, ORDER_SEQUENCE_WIDTH};
use crate::error::{Result, WorkflowError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

#[derive(Debug, Clone)]
pub struct OrderNumberAllocator {
    prefix: String,
}

impl Default for OrderNumberAllocator {
    fn default() -> Self {
        Self::new(ORDER_NUMBER_PREFIX)
    }
}

impl OrderNumberAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Prefix shared by every order number issued on `date`
    pub fn date_prefix(&self, date: NaiveDate) -> String {
        format!("{}{}", self.prefix, date.format("%y%m%d"))
    }

    /// Next order number for `date`, one past the highest suffix already issued
    pub fn allocate<S: AsRef<str>>(&self, date: NaiveDate, existing_today: &[S]) -> Result<String> {
        let date_prefix = self.date_prefix(date);
        let highest = existing_today
            .iter()
            .filter_map(|number| parse_sequence(number.as_ref(), &date_prefix))
            .max()
            .unwrap_or(0);

        let next = highest + 1;
        if next > MAX_DAILY_SEQUENCE {
            return Err(WorkflowError::SequenceExhausted { date });
        }

        Ok(format!(
            "{date_prefix}{next:0width$}",
            width = ORDER_SEQUENCE_WIDTH
        ))
    }
}

fn parse_sequence(number: &str, date_prefix: &str) -> Option<u32> {
    let suffix = number.strip_prefix(date_prefix)?;
    if suffix.len() != ORDER_SEQUENCE_WIDTH || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Local calendar day of `now` under the given UTC offset
pub fn local_date(now: DateTime<Utc>, utc_offset_minutes: i32) -> Result<NaiveDate> {
    let offset = fixed_offset(utc_offset_minutes)?;
    Ok(now.with_timezone(&offset).date_naive())
}

/// `[start, end)` bounds in UTC of the local calendar day
pub fn day_window(date: NaiveDate, utc_offset_minutes: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let offset = fixed_offset(utc_offset_minutes)?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| WorkflowError::InvalidInput(format!("Unrepresentable day {date}")))?;
    let start = offset
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| WorkflowError::InvalidInput(format!("Unrepresentable day {date}")))?
        .with_timezone(&Utc);
    Ok((start, start + Duration::days(1)))
}

fn fixed_offset(utc_offset_minutes: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        WorkflowError::Configuration(format!("Invalid UTC offset: {utc_offset_minutes} minutes"))
    })
}
