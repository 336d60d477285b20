//! Time representation using integer milliseconds.
//! Timeline positions, source in/out points and durations all share this unit;
//! nothing in the editing core converts through floating point.

/// Time in milliseconds. Signed so out-of-range requests can be expressed
/// (and rejected) instead of wrapping.
pub type Millis = i64;

/// Time constants for conversions
pub mod constants {
    use super::Millis;

    pub const MILLIS_PER_SECOND: Millis = 1_000;
    pub const MILLIS_PER_MINUTE: Millis = 60 * MILLIS_PER_SECOND;
    pub const MILLIS_PER_HOUR: Millis = 60 * MILLIS_PER_MINUTE;
}

/// Time zero constant
pub const ZERO: Millis = 0;

/// Whole seconds to milliseconds
#[inline]
pub fn from_seconds(seconds: i64) -> Millis {
    seconds * constants::MILLIS_PER_SECOND
}

/// Format time as HH:MM:SS.mmm. Negative values get a leading `-`.
pub fn format_time(ms: Millis) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let hours = ms / constants::MILLIS_PER_HOUR as u64;
    let minutes = (ms % constants::MILLIS_PER_HOUR as u64) / constants::MILLIS_PER_MINUTE as u64;
    let seconds = (ms % constants::MILLIS_PER_MINUTE as u64) / constants::MILLIS_PER_SECOND as u64;
    let millis = ms % constants::MILLIS_PER_SECOND as u64;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}
