/// Interval formatting helpers.
pub mod formatting;
/// Interval expression parser.
pub mod parse;
/// Duration and clock helpers.
pub mod time;

pub use parse::{FormatError, IntervalUnit, interval_string_to_seconds};
pub use time::{DurationParts, TotalSeconds, duration_total_seconds};
