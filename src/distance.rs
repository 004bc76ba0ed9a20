use chrono::{DateTime, TimeZone};
use std::time::{SystemTime, UNIX_EPOCH};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Anything that can be placed on the epoch-milliseconds time line.
pub trait IntoEpochMillis {
    fn into_epoch_millis(self) -> i64;
}

impl IntoEpochMillis for i64 {
    fn into_epoch_millis(self) -> i64 {
        self
    }
}

impl<Tz: TimeZone> IntoEpochMillis for DateTime<Tz> {
    fn into_epoch_millis(self) -> i64 {
        self.timestamp_millis()
    }
}

impl<Tz: TimeZone> IntoEpochMillis for &DateTime<Tz> {
    fn into_epoch_millis(self) -> i64 {
        self.timestamp_millis()
    }
}

impl IntoEpochMillis for SystemTime {
    fn into_epoch_millis(self) -> i64 {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => clamp_millis(after.as_millis()),
            Err(before) => -clamp_millis(before.duration().as_millis()),
        }
    }
}

fn clamp_millis(millis: u128) -> i64 {
    i64::try_from(millis).unwrap_or(i64::MAX)
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now().into_epoch_millis()
}

/// Integer division rounding half away from zero. `divisor` must be positive.
pub(crate) fn div_round(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;

    if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
        quotient + remainder.signum()
    } else {
        quotient
    }
}

/// Signed whole minutes from `target` to `now`: positive when `target` lies in
/// the past, negative when it lies in the future.
pub fn distance_in_minutes(target: impl IntoEpochMillis, now: impl IntoEpochMillis) -> i64 {
    let elapsed = now.into_epoch_millis().saturating_sub(target.into_epoch_millis());
    div_round(elapsed, MILLIS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_div_round_half_away_from_zero() {
        assert_eq!(div_round(90, 60), 2);
        assert_eq!(div_round(89, 60), 1);
        assert_eq!(div_round(30, 60), 1);
        assert_eq!(div_round(29, 60), 0);
        assert_eq!(div_round(-30, 60), -1);
        assert_eq!(div_round(-29, 60), 0);
        assert_eq!(div_round(-90, 60), -2);
        assert_eq!(div_round(0, 60), 0);
    }

    #[test]
    fn test_past_is_positive() {
        assert_eq!(distance_in_minutes(NOW - 5 * MILLIS_PER_MINUTE, NOW), 5);
    }

    #[test]
    fn test_future_is_negative() {
        assert_eq!(distance_in_minutes(NOW + 5 * MILLIS_PER_MINUTE, NOW), -5);
    }

    #[test]
    fn test_rounds_to_nearest_minute() {
        assert_eq!(distance_in_minutes(NOW - 29_999, NOW), 0);
        assert_eq!(distance_in_minutes(NOW - 30_000, NOW), 1);
        assert_eq!(distance_in_minutes(NOW + 30_000, NOW), -1);
        assert_eq!(distance_in_minutes(NOW + 29_999, NOW), 0);
        assert_eq!(distance_in_minutes(NOW - 89_999, NOW), 1);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert!(distance_in_minutes(i64::MIN, i64::MAX) > 0);
        assert!(distance_in_minutes(i64::MAX, i64::MIN) < 0);
    }

    #[test]
    fn test_chrono_and_system_time_agree() {
        let datetime = Utc.timestamp_millis_opt(NOW).unwrap();
        let system = UNIX_EPOCH + Duration::from_millis(NOW as u64);

        assert_eq!(datetime.into_epoch_millis(), NOW);
        assert_eq!(system.into_epoch_millis(), NOW);
    }

    #[test]
    fn test_system_time_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_millis(1_500);
        assert_eq!(before.into_epoch_millis(), -1_500);
    }
}
