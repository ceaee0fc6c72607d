//! Server-side rental pricing.

use chrono::NaiveDate;

use readygo_core::error::AppError;
use readygo_core::result::AppResult;

/// Price of renting from `start` to `end` inclusive at `daily_rate`.
///
/// A same-day rental counts as one day.
pub fn quote(start: NaiveDate, end: NaiveDate, daily_rate: i64) -> AppResult<i64> {
    if end < start {
        return Err(AppError::validation(
            "End date must be on or after the start date",
        ));
    }
    if daily_rate < 0 {
        return Err(AppError::validation("Daily rate cannot be negative"));
    }
    let days = (end - start).num_days() + 1;
    days.checked_mul(daily_rate)
        .ok_or_else(|| AppError::validation("Booking price is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use readygo_core::error::ErrorKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inclusive_day_count() {
        assert_eq!(quote(day(2024, 1, 1), day(2024, 1, 3), 500).unwrap(), 1500);
        assert_eq!(quote(day(2024, 1, 1), day(2024, 1, 1), 500).unwrap(), 500);
        assert_eq!(quote(day(2024, 2, 28), day(2024, 3, 1), 10).unwrap(), 30);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = quote(day(2024, 1, 3), day(2024, 1, 1), 500).unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[test]
    fn test_overflow_is_validation_error() {
        let err = quote(day(2024, 1, 1), day(2024, 1, 2), i64::MAX).unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }
}
