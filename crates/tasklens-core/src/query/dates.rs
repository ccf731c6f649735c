//! Due-date value parsing and bucket matching.
//!
//! Buckets stay symbolic in the filter and resolve against "today" only
//! at match time, so parsed filters survive midnight and can be cached.

use crate::query::filter::DueDateValue;
use crate::registry::DueBucket;
use crate::registry::patterns::{ISO_DATE_VALUE, RELATIVE_DAYS};
use chrono::{Days, NaiveDate};

/// Days covered by the "this week" bucket, today inclusive
pub const WEEK_HORIZON_DAYS: u64 = 7;

/// Last day of the "next week" bucket, relative to today
pub const NEXT_WEEK_HORIZON_DAYS: u64 = 14;

/// Parse one `due:` value: a bucket keyword, an ISO date, or a relative
/// day count (`in 3 days`, `3d`).
///
/// Returns `None` both for unknown words and for date-shaped strings that
/// are not real calendar dates; the caller decides which deserve a
/// warning.
pub fn parse_due_value(value: &str) -> Option<DueDateValue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(bucket) = DueBucket::parse_name(trimmed) {
        return Some(DueDateValue::Bucket(bucket));
    }
    if ISO_DATE_VALUE.is_match(trimmed) {
        return parse_iso(trimmed).map(DueDateValue::Date);
    }
    if let Some(caps) = RELATIVE_DAYS.captures(trimmed) {
        if let Ok(days) = caps[1].parse::<u32>() {
            return Some(DueDateValue::InDays(days));
        }
    }
    None
}

/// Parse an ISO date, zero padding optional. Calendar-invalid dates
/// (month 13, day 45) return `None`.
#[inline]
pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// `today + days`, saturating at the calendar boundary.
#[inline]
pub fn days_from(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether a due date falls into a bucket, evaluated against `today`.
///
/// A task without a due date only ever matches [`DueBucket::NoDate`]; in
/// particular it is never overdue.
pub fn bucket_matches(bucket: DueBucket, due: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(due) = due else {
        return bucket == DueBucket::NoDate;
    };
    match bucket {
        DueBucket::Today => due == today,
        DueBucket::Tomorrow => due == days_from(today, 1),
        DueBucket::Overdue => due < today,
        DueBucket::Week => due >= today && due <= days_from(today, WEEK_HORIZON_DAYS as u32),
        DueBucket::NextWeek => {
            due > days_from(today, WEEK_HORIZON_DAYS as u32)
                && due <= days_from(today, NEXT_WEEK_HORIZON_DAYS as u32)
        }
        DueBucket::Future => due > today,
        DueBucket::NoDate => false,
    }
}
