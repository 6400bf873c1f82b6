//! Human-readable elapsed time.

use std::time::Duration;

const SECONDS_PER_MINUTE: f64 = 60.0;
const MINUTES_PER_HOUR: u64 = 60;
const HOURS_PER_DAY: u64 = 24;

/// Formats a number of seconds for the run report.
///
/// Under a minute the seconds keep two decimals and a unit (`"5.00s"`).
/// From one minute up the seconds are rounded to a whole number and the
/// largest nonzero unit leads: `"1m:5"`, `"1h:1m:5"`, `"1d:1h:1m:5"`.
///
/// # Examples
///
/// ```
/// use alt_domain::format_duration;
///
/// assert_eq!(format_duration(45.0), "45.00s");
/// assert_eq!(format_duration(3665.0), "1h:1m:5");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };

    let minutes = (seconds / SECONDS_PER_MINUTE).floor();
    let remainder = seconds.rem_euclid(SECONDS_PER_MINUTE);

    if minutes < 1.0 {
        return format!("{remainder:.2}s");
    }

    // Whole seconds only once a minute has passed; ties go to even.
    let secs = remainder.round_ties_even() as u64;
    let minutes = minutes as u64;

    let (hours, minutes) = (minutes / MINUTES_PER_HOUR, minutes % MINUTES_PER_HOUR);
    if hours == 0 {
        return format!("{minutes}m:{secs}");
    }

    let (days, hours) = (hours / HOURS_PER_DAY, hours % HOURS_PER_DAY);
    if days == 0 {
        format!("{hours}h:{minutes}m:{secs}")
    } else {
        format!("{days}d:{hours}h:{minutes}m:{secs}")
    }
}

/// Formats a [`Duration`] with [`format_duration`].
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    format_duration(elapsed.as_secs_f64())
}
