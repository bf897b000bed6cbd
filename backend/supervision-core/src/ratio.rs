// src/ratio.rs
use chrono::Duration;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

const MILLIS_PER_HOUR: Decimal = dec!(3600000);

/// Division that resolves every invalid case to zero.
///
/// Used by every ratio the report exposes so a zero denominator never
/// surfaces as an error or a missing value.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Rounds half to even and clamps negatives to zero.
pub fn round_count(value: Decimal) -> u64 {
    value.round().to_u64().unwrap_or(0)
}

/// Sum of counts, pinned at `u64::MAX` instead of wrapping.
pub fn sum_counts<I>(values: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    values.into_iter().fold(0, u64::saturating_add)
}

/// Duration expressed in fractional hours.
pub fn hours(duration: Duration) -> Decimal {
    Decimal::from(duration.num_milliseconds()) / MILLIS_PER_HOUR
}

pub fn calls_per_day(answered: u64, days_worked: u64) -> u64 {
    round_count(safe_divide(
        Decimal::from(answered),
        Decimal::from(days_worked),
    ))
}

/// Answered calls per productive hour; zero unless there are productive hours.
pub fn calls_per_hour(answered: u64, productive_hours: Decimal) -> u64 {
    if productive_hours <= Decimal::ZERO {
        return 0;
    }
    round_count(safe_divide(Decimal::from(answered), productive_hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_resolves_to_zero() {
        assert_eq!(safe_divide(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(calls_per_day(30, 0), 0);
        assert_eq!(calls_per_hour(30, Decimal::ZERO), 0);
    }

    #[test]
    fn negative_productive_hours_give_zero() {
        assert_eq!(calls_per_hour(30, dec!(-1.5)), 0);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_count(dec!(2.5)), 2);
        assert_eq!(round_count(dec!(3.5)), 4);
        assert_eq!(round_count(dec!(2.51)), 3);
        assert_eq!(round_count(dec!(-4)), 0);
    }

    #[test]
    fn hours_from_duration() {
        assert_eq!(hours(Duration::minutes(90)), dec!(1.5));
        assert_eq!(calls_per_hour(20, hours(Duration::hours(1))), 20);
        assert_eq!(calls_per_day(25, 2), 12);
    }

    #[test]
    fn count_sums_saturate() {
        assert_eq!(sum_counts(vec![3, 4]), 7);
        assert_eq!(sum_counts(vec![u64::MAX, 5]), u64::MAX);
        assert_eq!(sum_counts(Vec::new()), 0);
    }
}
