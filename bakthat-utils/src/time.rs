use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;
const MICROS_PER_SECOND: u128 = 1_000_000;

/// Anything that can report its total elapsed time in seconds.
pub trait TotalSeconds {
    fn total_seconds(&self) -> f64;
}

impl TotalSeconds for Duration {
    fn total_seconds(&self) -> f64 {
        micros_to_seconds(self.as_micros())
    }
}

/// A duration split into day, second and microsecond components, with no
/// native seconds accessor of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub days: u64,
    pub seconds: u64,
    pub microseconds: u64,
}

impl DurationParts {
    pub fn new(days: u64, seconds: u64, microseconds: u64) -> Self {
        Self {
            days,
            seconds,
            microseconds,
        }
    }
}

impl TotalSeconds for DurationParts {
    fn total_seconds(&self) -> f64 {
        let whole_seconds = u128::from(self.seconds) + u128::from(self.days) * u128::from(SECONDS_PER_DAY);
        micros_to_seconds(u128::from(self.microseconds) + whole_seconds * MICROS_PER_SECOND)
    }
}

/// Both representations round through here exactly once.
fn micros_to_seconds(micros: u128) -> f64 {
    micros as f64 / MICROS_PER_SECOND as f64
}

impl From<Duration> for DurationParts {
    fn from(duration: Duration) -> Self {
        let secs = duration.as_secs();
        Self {
            days: secs / SECONDS_PER_DAY,
            seconds: secs % SECONDS_PER_DAY,
            microseconds: u64::from(duration.subsec_micros()),
        }
    }
}

/// Total elapsed seconds of `duration`, whichever representation it uses.
pub fn duration_total_seconds<T: TotalSeconds + ?Sized>(duration: &T) -> f64 {
    duration.total_seconds()
}

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Unix timestamp `seconds` ago, clamped at the epoch.
pub fn unix_secs_before(seconds: u64) -> u64 {
    now_unix_secs().saturating_sub(seconds)
}
