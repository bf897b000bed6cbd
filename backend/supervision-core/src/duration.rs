// src/duration.rs
use chrono::{Duration, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serializer;

// --- Source Representations ---

/// A duration cell as it arrives from an export, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDuration {
    Typed(Duration),
    TimeOfDay(NaiveTime),
    Text(String),
    Missing,
}

impl From<&str> for RawDuration {
    fn from(value: &str) -> Self {
        RawDuration::Text(value.to_string())
    }
}

// "[N day[s][,]] H:MM[:SS[.fff]]", hours may exceed 24
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<days>\d{1,6})\s*days?,?\s*)?",
        r"(?P<h>\d{1,9}):(?P<m>\d{1,2})",
        r"(?::(?P<s>\d{1,2})(?:\.(?P<frac>\d{1,9}))?)?$",
    ))
    .expect("clock duration pattern is valid")
});

const UNIT_ALTERNATION: &str =
    "days|day|d|hours|hour|hrs|hr|h|minutes|minute|mins|min|m|seconds|second|secs|sec|s";

static UNITS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:\d{{1,9}}(?:\.\d+)?\s*(?:{UNIT_ALTERNATION})\s*)+$"
    ))
    .expect("unit duration pattern is valid")
});

static UNIT_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<value>\d{{1,9}}(?:\.\d+)?)\s*(?P<unit>{UNIT_ALTERNATION})"
    ))
    .expect("unit component pattern is valid")
});

// --- Normalization ---

/// Longest value a single cell may hold; anything above is treated as garbage.
const MAX_CELL_DAYS: i64 = 31;

/// Converts any source representation into a non-negative duration.
///
/// Absent, negative, unparsable and implausibly long values all become zero
/// so a dirty row contributes no activity instead of aborting the report.
pub fn normalize(value: &RawDuration) -> Duration {
    let parsed = match value {
        RawDuration::Typed(duration) => Some(*duration),
        RawDuration::TimeOfDay(time) => Some(
            Duration::seconds(i64::from(time.num_seconds_from_midnight()))
                + Duration::milliseconds(i64::from(time.nanosecond() / 1_000_000)),
        ),
        RawDuration::Text(text) => parse_text(text),
        RawDuration::Missing => None,
    };

    match parsed {
        Some(duration) if is_plausible(duration) => duration,
        _ => Duration::zero(),
    }
}

fn is_plausible(duration: Duration) -> bool {
    duration > Duration::zero() && duration <= Duration::days(MAX_CELL_DAYS)
}

/// Shorthand for normalizing an optional text cell.
pub fn normalize_text(value: Option<&str>) -> Duration {
    match value {
        Some(text) => normalize(&RawDuration::from(text)),
        None => Duration::zero(),
    }
}

fn parse_text(text: &str) -> Option<Duration> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    parse_clock(&text).or_else(|| parse_units(&text))
}

fn parse_clock(text: &str) -> Option<Duration> {
    let caps = CLOCK_RE.captures(text)?;
    let days: i64 = caps.name("days").map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let hours: i64 = caps["h"].parse().ok()?;
    let minutes: i64 = caps["m"].parse().ok()?;
    let seconds: i64 = caps.name("s").map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    if minutes > 59 || seconds > 59 {
        return None;
    }
    let millis = caps.name("frac").map_or(0, |m| {
        let digits: String = m.as_str().chars().chain("00".chars()).take(3).collect();
        digits.parse::<i64>().unwrap_or(0)
    });

    Some(
        Duration::days(days)
            + Duration::hours(hours)
            + Duration::minutes(minutes)
            + Duration::seconds(seconds)
            + Duration::milliseconds(millis),
    )
}

fn parse_units(text: &str) -> Option<Duration> {
    if !UNITS_RE.is_match(text) {
        return None;
    }
    let mut total_ms = 0_f64;
    for caps in UNIT_PART_RE.captures_iter(text) {
        let value: f64 = caps["value"].parse().ok()?;
        let unit_ms = match &caps["unit"] {
            "days" | "day" | "d" => 86_400_000.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000.0,
            "minutes" | "minute" | "mins" | "min" | "m" => 60_000.0,
            _ => 1_000.0,
        };
        total_ms += value * unit_ms;
    }
    if !total_ms.is_finite() || total_ms >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::milliseconds(total_ms.round() as i64))
}

// --- Arithmetic Helpers ---

/// `lhs + rhs`, pinned to the representable range instead of panicking.
pub fn saturating_add(lhs: Duration, rhs: Duration) -> Duration {
    lhs.checked_add(&rhs).unwrap_or(if rhs < Duration::zero() {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

/// Arithmetic mean of a set of durations, zero for an empty set.
pub fn mean_duration<I>(values: I) -> Duration
where
    I: IntoIterator<Item = Duration>,
{
    let (total_ms, count) = values
        .into_iter()
        .fold((0_i64, 0_i64), |(sum, n), d| {
            (sum.saturating_add(d.num_milliseconds()), n + 1)
        });
    if count == 0 {
        return Duration::zero();
    }
    Duration::milliseconds(total_ms / count)
}

/// Duration per unit of `count`, zero when there is nothing to divide by.
pub fn divide_duration(total: Duration, count: u64) -> Duration {
    match i64::try_from(count) {
        Ok(n) if n > 0 => Duration::milliseconds(total.num_milliseconds() / n),
        _ => Duration::zero(),
    }
}

// --- Presentation ---

/// `HH:MM:SS`, with hours free to exceed 24. Sub-second parts are truncated.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.abs();
    format!("{sign}{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn serialize_hms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_hms(*duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Duration {
        normalize(&RawDuration::from(s))
    }

    #[test]
    fn clock_text_parses_with_hours_past_a_day() {
        assert_eq!(text("00:40:00"), Duration::minutes(40));
        assert_eq!(text(" 27:05:09 "), Duration::seconds(27 * 3600 + 5 * 60 + 9));
        assert_eq!(text("1:30"), Duration::minutes(90));
    }

    #[test]
    fn pandas_style_day_prefix_is_accepted() {
        assert_eq!(text("0 days 02:00:00"), Duration::hours(2));
        assert_eq!(text("1 day, 01:00:00"), Duration::hours(25));
        assert_eq!(text("00:00:01.250"), Duration::milliseconds(1250));
    }

    #[test]
    fn unit_text_parses() {
        assert_eq!(text("2h"), Duration::hours(2));
        assert_eq!(text("1h30m"), Duration::minutes(90));
        assert_eq!(text("40 min"), Duration::minutes(40));
        assert_eq!(text("1.5 hours"), Duration::minutes(90));
        assert_eq!(text("45s"), Duration::seconds(45));
    }

    #[test]
    fn negative_missing_and_garbage_become_zero() {
        assert_eq!(text("-00:10:00"), Duration::zero());
        assert_eq!(text(""), Duration::zero());
        assert_eq!(text("n/a"), Duration::zero());
        assert_eq!(text("12:75:00"), Duration::zero());
        assert_eq!(text("120"), Duration::zero());
        assert_eq!(normalize(&RawDuration::Missing), Duration::zero());
        assert_eq!(
            normalize(&RawDuration::Typed(Duration::minutes(-5))),
            Duration::zero()
        );
        assert_eq!(normalize_text(None), Duration::zero());
    }

    #[test]
    fn time_of_day_counts_from_midnight() {
        let t = NaiveTime::from_hms_opt(1, 2, 3).unwrap();
        assert_eq!(normalize(&RawDuration::TimeOfDay(t)), Duration::seconds(3723));
    }

    #[test]
    fn format_hms_truncates_and_keeps_long_hours() {
        assert_eq!(format_hms(Duration::seconds(0)), "00:00:00");
        assert_eq!(format_hms(Duration::milliseconds(3_661_999)), "01:01:01");
        assert_eq!(format_hms(Duration::hours(30)), "30:00:00");
    }

    #[test]
    fn mean_and_division_are_zero_safe() {
        assert_eq!(mean_duration(Vec::new()), Duration::zero());
        assert_eq!(
            mean_duration(vec![Duration::hours(1), Duration::hours(2)]),
            Duration::minutes(90)
        );
        assert_eq!(divide_duration(Duration::minutes(40), 0), Duration::zero());
        assert_eq!(divide_duration(Duration::minutes(40), 20), Duration::minutes(2));
    }

    #[test]
    fn implausibly_long_cells_become_zero() {
        assert_eq!(text(&"999999999d ".repeat(120)), Duration::zero());
        assert_eq!(text("40 days"), Duration::zero());
        assert_eq!(text("999999 days 00:00:00"), Duration::zero());
        assert_eq!(text("31 days 00:00:00"), Duration::days(31));
        assert_eq!(
            normalize(&RawDuration::Typed(Duration::days(365))),
            Duration::zero()
        );
    }

    #[test]
    fn sums_and_means_saturate_instead_of_overflowing() {
        assert_eq!(saturating_add(Duration::MAX, Duration::hours(1)), Duration::MAX);
        assert_eq!(saturating_add(Duration::MIN, Duration::hours(-1)), Duration::MIN);
        assert_eq!(
            saturating_add(Duration::hours(1), Duration::minutes(30)),
            Duration::minutes(90)
        );
        assert_eq!(
            mean_duration(vec![Duration::MAX, Duration::MAX]),
            Duration::milliseconds(i64::MAX / 2)
        );
    }
}
