//! Parsing of numeric comparison values.
//!
//! A value is a bare number, a clock reading (`3:20`, `1:02:03`), a number
//! followed by a time or size unit (`10 seconds`, `2 weeks`, `5 mb`), one of
//! the literals `now` and `today`, or an ISO date (`2020-02-29`, `2020-02`).
//! Durations are seconds, sizes are bytes and instants are Unix timestamps.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::QueryError;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const KIB: f64 = 1_024.0;

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})(?:-(\d{1,2}))?$").unwrap_or_else(|err| {
        panic!("date regex must compile: {err}");
    })
});

/// A parsed comparison value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Quantity {
    Number(f64),
    Duration(f64),
    Size(f64),
    Instant(f64),
}

impl Quantity {
    pub(crate) fn value(self) -> f64 {
        match self {
            Self::Number(value) | Self::Duration(value) | Self::Size(value) | Self::Instant(value) => {
                value
            }
        }
    }
}

pub(crate) fn parse_quantity(raw: &str, now: f64) -> Result<Quantity, QueryError> {
    let text = raw.trim().to_lowercase();
    match text.as_str() {
        "now" => return Ok(Quantity::Instant(now)),
        "today" => return Ok(Quantity::Instant(start_of_day(now))),
        _ => {}
    }
    if let Some(instant) = parse_date(&text, raw)? {
        return Ok(Quantity::Instant(instant));
    }
    if text.contains(':') {
        return parse_clock(&text, raw);
    }

    let split = text
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| QueryError::InvalidNumber(raw.trim().to_owned()))?;
    let unit = unit.trim();
    let quantity = match unit {
        "" => Quantity::Number(value),
        "s" | "sec" | "secs" | "second" | "seconds" => Quantity::Duration(value),
        "m" | "min" | "mins" | "minute" | "minutes" => Quantity::Duration(value * MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Quantity::Duration(value * HOUR),
        "d" | "day" | "days" => Quantity::Duration(value * DAY),
        "w" | "week" | "weeks" => Quantity::Duration(value * 7.0 * DAY),
        "month" | "months" => Quantity::Duration(value * 30.0 * DAY),
        "y" | "year" | "years" => Quantity::Duration(value * 365.0 * DAY),
        "b" | "byte" | "bytes" => Quantity::Size(value),
        "k" | "kb" | "kib" => Quantity::Size(value * KIB),
        "mb" | "mib" => Quantity::Size(value * KIB * KIB),
        "gb" | "gib" => Quantity::Size(value * KIB * KIB * KIB),
        other => {
            return Err(QueryError::UnknownUnit {
                unit: other.to_owned(),
                value: raw.trim().to_owned(),
            });
        }
    };
    Ok(quantity)
}

fn parse_clock(text: &str, raw: &str) -> Result<Quantity, QueryError> {
    let invalid = || QueryError::InvalidNumber(raw.trim().to_owned());
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }
    let mut seconds = 0.0;
    for part in parts {
        let value: f64 = part.trim().parse().map_err(|_| invalid())?;
        if value < 0.0 {
            return Err(invalid());
        }
        seconds = seconds * MINUTE + value;
    }
    Ok(Quantity::Duration(seconds))
}

fn parse_date(text: &str, raw: &str) -> Result<Option<f64>, QueryError> {
    let Some(caps) = DATE.captures(text) else {
        return Ok(None);
    };
    let invalid = || QueryError::InvalidNumber(raw.trim().to_owned());
    let field = |index: usize| -> Result<Option<i64>, QueryError> {
        caps.get(index)
            .map(|m| m.as_str().parse::<i64>().map_err(|_| invalid()))
            .transpose()
    };
    let year = field(1)?.ok_or_else(invalid)?;
    let month = field(2)?.ok_or_else(invalid)?;
    let day = field(3)?.unwrap_or(1);
    if !(1..=12).contains(&month) || !(1..=days_in_month(year, month)).contains(&day) {
        return Err(invalid());
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "day counts are far below the f64 mantissa"
    )]
    let seconds = days_from_civil(year, month, day) as f64 * DAY;
    Ok(Some(seconds))
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[expect(
    clippy::integer_division_remainder_used,
    reason = "leap years are defined by divisibility"
)]
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days between 1970-01-01 and the given proleptic Gregorian date.
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "calendar arithmetic is defined on whole days"
)]
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = (month + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn start_of_day(now: f64) -> f64 {
    (now / DAY).floor() * DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NOW: f64 = 1_700_000_000.0;

    fn parse(raw: &str) -> Quantity {
        parse_quantity(raw, NOW).unwrap_or_else(|err| panic!("`{raw}` should parse: {err}"))
    }

    #[rstest]
    #[case("42", Quantity::Number(42.0))]
    #[case(" 2.5 ", Quantity::Number(2.5))]
    #[case("10 seconds", Quantity::Duration(10.0))]
    #[case("1 second", Quantity::Duration(1.0))]
    #[case("3 minutes", Quantity::Duration(180.0))]
    #[case("3min", Quantity::Duration(180.0))]
    #[case("2 hours", Quantity::Duration(7_200.0))]
    #[case("1 day", Quantity::Duration(86_400.0))]
    #[case("2 weeks", Quantity::Duration(1_209_600.0))]
    #[case("1 year", Quantity::Duration(31_536_000.0))]
    #[case("3:20", Quantity::Duration(200.0))]
    #[case("1:02:03", Quantity::Duration(3_723.0))]
    #[case("2 KB", Quantity::Size(2_048.0))]
    #[case("1 mb", Quantity::Size(1_048_576.0))]
    #[case("now", Quantity::Instant(NOW))]
    #[case("Today", Quantity::Instant(1_699_920_000.0))]
    #[case("1970-01-02", Quantity::Instant(86_400.0))]
    #[case("2000-03", Quantity::Instant(951_868_800.0))]
    #[case("2000-02-29", Quantity::Instant(951_782_400.0))]
    #[case("2021-12-31", Quantity::Instant(1_640_908_800.0))]
    fn parses_values(#[case] raw: &str, #[case] expected: Quantity) {
        assert_eq!(parse(raw), expected);
    }

    #[rstest]
    #[case("3 parsecs")]
    #[case("5 fortnights")]
    fn rejects_unknown_units(#[case] raw: &str) {
        let err = parse_quantity(raw, NOW).unwrap_err();
        assert!(matches!(err, QueryError::UnknownUnit { .. }), "{err}");
    }

    #[rstest]
    #[case("seconds")]
    #[case("1:2:3:4")]
    #[case("1:xx")]
    #[case("2020-13-01")]
    #[case("2020-02-30")]
    #[case("2020-02-31")]
    #[case("2019-02-29")]
    #[case("1900-02-29")]
    #[case("2021-04-31")]
    #[case("2021-01-00")]
    #[case("")]
    fn rejects_malformed_numbers(#[case] raw: &str) {
        let err = parse_quantity(raw, NOW).unwrap_err();
        assert!(matches!(err, QueryError::InvalidNumber(_)), "{err}");
    }

    #[test]
    fn computes_leap_day() {
        assert_eq!(days_from_civil(2020, 2, 29), 18_321);
        assert_eq!(days_from_civil(1970, 1, 1), 0);
    }
}
