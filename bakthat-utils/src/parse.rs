use thiserror::Error;

/// Returned when an interval expression is not a run of `<count><unit>` segments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("bad interval format for {input}")]
pub struct FormatError {
    input: String,
}

impl FormatError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// The full expression that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// One unit letter of an interval expression.
///
/// Months and years are fixed approximations (30 and 365 days).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    /// Largest first.
    pub const ALL: [IntervalUnit; 7] = [
        IntervalUnit::Year,
        IntervalUnit::Month,
        IntervalUnit::Week,
        IntervalUnit::Day,
        IntervalUnit::Hour,
        IntervalUnit::Minute,
        IntervalUnit::Second,
    ];

    /// Case-sensitive: `m` is minutes, `M` is months.
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter {
            b's' => Some(Self::Second),
            b'm' => Some(Self::Minute),
            b'h' => Some(Self::Hour),
            b'D' => Some(Self::Day),
            b'W' => Some(Self::Week),
            b'M' => Some(Self::Month),
            b'Y' => Some(Self::Year),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Second => 's',
            Self::Minute => 'm',
            Self::Hour => 'h',
            Self::Day => 'D',
            Self::Week => 'W',
            Self::Month => 'M',
            Self::Year => 'Y',
        }
    }

    pub const fn seconds(self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => 60 * 60 * 24,
            Self::Week => 60 * 60 * 24 * 7,
            Self::Month => 60 * 60 * 24 * 30,
            Self::Year => 60 * 60 * 24 * 365,
        }
    }
}

/// Convert an interval expression like `1M`, `1Y3M` or `1M3W4h2s` to seconds.
///
/// Units: `s` seconds, `m` minutes, `h` hours, `D` days, `W` weeks,
/// `M` months, `Y` years. An empty expression is zero seconds.
pub fn interval_string_to_seconds(raw: &str) -> Result<u64, FormatError> {
    let bytes = raw.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor || cursor == bytes.len() {
            return Err(FormatError::new(raw));
        }

        let unit =
            IntervalUnit::from_letter(bytes[cursor]).ok_or_else(|| FormatError::new(raw))?;
        let count = raw[number_start..cursor]
            .parse::<u64>()
            .map_err(|_| FormatError::new(raw))?;
        cursor += 1;

        if count == 0 {
            return Err(FormatError::new(raw));
        }

        total_seconds = count
            .checked_mul(unit.seconds())
            .and_then(|part| total_seconds.checked_add(part))
            .ok_or_else(|| FormatError::new(raw))?;
    }

    Ok(total_seconds)
}

#[cfg(test)]
mod tests {
    use super::{FormatError, IntervalUnit, interval_string_to_seconds};

    #[test]
    fn single_units() {
        assert_eq!(interval_string_to_seconds("1s"), Ok(1));
        assert_eq!(interval_string_to_seconds("1m"), Ok(60));
        assert_eq!(interval_string_to_seconds("1h"), Ok(3_600));
        assert_eq!(interval_string_to_seconds("1D"), Ok(86_400));
        assert_eq!(interval_string_to_seconds("1W"), Ok(604_800));
        assert_eq!(interval_string_to_seconds("1M"), Ok(2_592_000));
        assert_eq!(interval_string_to_seconds("1Y"), Ok(31_536_000));
    }

    #[test]
    fn compound_expressions() {
        assert_eq!(interval_string_to_seconds("1Y3M"), Ok(39_312_000));
        assert_eq!(
            interval_string_to_seconds("1M3W4h2s"),
            Ok(2_592_000 + 3 * 604_800 + 4 * 3_600 + 2)
        );
        assert_eq!(interval_string_to_seconds("90m"), Ok(5_400));
        assert_eq!(interval_string_to_seconds("007s"), Ok(7));
    }

    #[test]
    fn repeated_and_unordered_units_are_summed() {
        assert_eq!(interval_string_to_seconds("1M1M"), Ok(2 * 2_592_000));
        assert_eq!(interval_string_to_seconds("2s1Y"), Ok(31_536_002));
    }

    #[test]
    fn empty_expression_is_zero() {
        assert_eq!(interval_string_to_seconds(""), Ok(0));
    }

    #[test]
    fn concatenation_adds_up() {
        let parts = ["1s", "2m", "3h", "4D", "5W", "6M", "7Y", "10m20s"];
        for a in parts {
            for b in parts {
                let joined = format!("{a}{b}");
                assert_eq!(
                    interval_string_to_seconds(&joined),
                    Ok(interval_string_to_seconds(a).unwrap()
                        + interval_string_to_seconds(b).unwrap()),
                    "{joined}"
                );
            }
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(interval_string_to_seconds("0s").is_err());
        assert!(interval_string_to_seconds("1h0m").is_err());
        assert!(interval_string_to_seconds("000D").is_err());
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        let cases = [
            "abc", "3x", "3", "1h3", "s", "1d", "1H", " 1s", "1s ", "1 s", "-1s", "1.5h",
        ];

        for raw in cases {
            assert_eq!(
                interval_string_to_seconds(raw),
                Err(FormatError::new(raw)),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn error_carries_the_whole_input() {
        let err = interval_string_to_seconds("1M3x").unwrap_err();
        assert_eq!(err.input(), "1M3x");
        assert_eq!(err.to_string(), "bad interval format for 1M3x");
    }

    #[test]
    fn overflow_is_a_format_error() {
        assert!(interval_string_to_seconds("99999999999999999999s").is_err());
        assert!(interval_string_to_seconds("18446744073709551615s1s").is_err());
    }

    #[test]
    fn unit_letters_round_trip() {
        for unit in IntervalUnit::ALL {
            assert_eq!(IntervalUnit::from_letter(unit.letter() as u8), Some(unit));
        }
        assert_eq!(IntervalUnit::from_letter(b'd'), None);
    }
}
