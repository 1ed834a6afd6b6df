use crate::parse::IntervalUnit;

/// Format seconds as a compact interval expression, largest units first
/// (e.g. 59 -> "59s", 3_660 -> "1h1m", 39_312_000 -> "1Y3M").
///
/// The output always parses back to the same number of seconds.
pub fn format_interval(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0s".to_owned();
    }

    let mut remaining = total_seconds;
    let mut out = String::new();

    for unit in IntervalUnit::ALL {
        let count = remaining / unit.seconds();
        if count > 0 {
            out.push_str(&count.to_string());
            out.push(unit.letter());
            remaining %= unit.seconds();
        }
    }

    out
}

/// User-facing name of an interval unit, pluralized for `count`.
pub fn unit_display_name(unit: IntervalUnit, count: u64) -> String {
    let singular = match unit {
        IntervalUnit::Second => "second",
        IntervalUnit::Minute => "minute",
        IntervalUnit::Hour => "hour",
        IntervalUnit::Day => "day",
        IntervalUnit::Week => "week",
        IntervalUnit::Month => "month",
        IntervalUnit::Year => "year",
    };

    if count == 1 {
        singular.to_owned()
    } else {
        format!("{singular}s")
    }
}

/// Long form of [`format_interval`] (e.g. "1 year, 3 months").
pub fn describe_interval(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0 seconds".to_owned();
    }

    let mut remaining = total_seconds;
    let mut parts = Vec::new();

    for unit in IntervalUnit::ALL {
        let count = remaining / unit.seconds();
        if count > 0 {
            parts.push(format!("{} {}", count, unit_display_name(unit, count)));
            remaining %= unit.seconds();
        }
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::{describe_interval, format_interval, unit_display_name};
    use crate::parse::{IntervalUnit, interval_string_to_seconds};

    #[test]
    fn compact_interval_formatting() {
        assert_eq!(format_interval(0), "0s");
        assert_eq!(format_interval(59), "59s");
        assert_eq!(format_interval(60), "1m");
        assert_eq!(format_interval(3_660), "1h1m");
        assert_eq!(format_interval(86_400), "1D");
        assert_eq!(format_interval(604_800 + 1), "1W1s");
        assert_eq!(format_interval(39_312_000), "1Y3M");
    }

    #[test]
    fn formatted_intervals_parse_back() {
        for seconds in [1, 59, 61, 3_601, 90_061, 2_592_000, 39_312_000, 31_536_000 * 3 + 7] {
            let formatted = format_interval(seconds);
            assert_eq!(interval_string_to_seconds(&formatted), Ok(seconds), "{formatted}");
        }
    }

    #[test]
    fn unit_names_are_pluralized() {
        assert_eq!(unit_display_name(IntervalUnit::Day, 1), "day");
        assert_eq!(unit_display_name(IntervalUnit::Day, 2), "days");
        assert_eq!(unit_display_name(IntervalUnit::Month, 0), "months");
    }

    #[test]
    fn long_form_descriptions() {
        assert_eq!(describe_interval(0), "0 seconds");
        assert_eq!(describe_interval(1), "1 second");
        assert_eq!(describe_interval(39_312_000), "1 year, 3 months");
        assert_eq!(describe_interval(3_720), "1 hour, 2 minutes");
    }
}
