//! Parsers for media toolchain output.

use crate::config::ThumbnailSettings;
use crate::core::time::{constants, Millis};
use crate::export::plan::ExportProgress;

/// Parse a rational frame rate such as `"30/1"` or `"30000/1001"`
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.trim().split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 || !num.is_finite() || !den.is_finite() {
        return None;
    }
    Some(num / den)
}

/// Parse a toolchain timestamp `hh:mm:ss.xx` into milliseconds.
///
/// Fractional digits past the millisecond are truncated.
pub fn parse_ffmpeg_time(time: &str) -> Option<Millis> {
    let mut parts = time.trim().split(':');
    let hours = parse_whole(parts.next()?)?;
    let minutes = parse_whole(parts.next()?)?;
    let seconds = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (seconds, ""),
    };
    let whole = parse_whole(whole)?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |acc, digit| acc * 10 + Millis::from(digit - b'0'));

    hours
        .checked_mul(constants::MILLIS_PER_HOUR)?
        .checked_add(minutes.checked_mul(constants::MILLIS_PER_MINUTE)?)?
        .checked_add(whole.checked_mul(constants::MILLIS_PER_SECOND)?)?
        .checked_add(millis)
}

fn parse_whole(digits: &str) -> Option<Millis> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Turn one toolchain progress line (`... time=00:00:05.20 bitrate=...`) into
/// a concat progress event. Lines without a usable `time=` yield `None`.
pub fn progress_from_line(line: &str, total_ms: Millis) -> Option<ExportProgress> {
    let (_, rest) = line.split_once("time=")?;
    let stamp = rest.split_whitespace().next()?;
    let current_ms = parse_ffmpeg_time(stamp)?;
    Some(ExportProgress::concat(current_ms, total_ms))
}

/// Where to grab the thumbnail frame: a fraction of the duration, clamped
pub fn thumbnail_time_ms(duration_ms: Millis, settings: &ThumbnailSettings) -> Millis {
    let divisor = Millis::from(settings.divisor.max(1));
    (duration_ms / divisor).max(settings.min_ms).min(settings.max_ms)
}
