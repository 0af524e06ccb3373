// libs/consultation-session-cell/src/services/countdown.rs
//! Pure formatting of countdown and elapsed strings.
//!
//! All functions floor to whole units and clamp negative deltas to zero.

use chrono::Duration;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;

fn whole_seconds(delta: Duration) -> i64 {
    delta.num_seconds().max(0)
}

/// `{hours}h {minutes}m`
pub fn format_hours_minutes(delta: Duration) -> String {
    let total = whole_seconds(delta);
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}

/// `{minutes}m {seconds}s`; minutes are not wrapped into hours.
pub fn format_minutes_seconds(delta: Duration) -> String {
    let total = whole_seconds(delta);
    let minutes = total / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;
    format!("{}m {}s", minutes, seconds)
}

/// Countdown shown before the join window opens. Falls back to the minute
/// form once less than an hour remains, so the hour field is never `0h`.
pub fn format_until_start(delta: Duration) -> String {
    if whole_seconds(delta) >= SECONDS_PER_HOUR {
        format_hours_minutes(delta)
    } else {
        format_minutes_seconds(delta)
    }
}

/// Elapsed call time: `{minutes}m {seconds}s`, with an `{hours}h ` prefix after an hour.
pub fn format_elapsed(delta: Duration) -> String {
    let total = whole_seconds(delta);
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_minutes_floors_partial_minutes() {
        let delta = Duration::hours(2) + Duration::minutes(5) + Duration::seconds(59);
        assert_eq!(format_hours_minutes(delta), "2h 5m");
    }

    #[test]
    fn minutes_seconds_keeps_minutes_past_an_hour() {
        assert_eq!(format_minutes_seconds(Duration::minutes(75)), "75m 0s");
        assert_eq!(format_minutes_seconds(Duration::seconds(241)), "4m 1s");
    }

    #[test]
    fn negative_deltas_clamp_to_zero() {
        assert_eq!(format_minutes_seconds(Duration::seconds(-30)), "0m 0s");
        assert_eq!(format_hours_minutes(Duration::minutes(-5)), "0h 0m");
        assert_eq!(format_elapsed(Duration::seconds(-1)), "0m 0s");
    }

    #[test]
    fn until_start_switches_form_at_one_hour() {
        assert_eq!(format_until_start(Duration::minutes(10)), "10m 0s");
        assert_eq!(format_until_start(Duration::minutes(59) + Duration::seconds(59)), "59m 59s");
        assert_eq!(format_until_start(Duration::hours(1)), "1h 0m");
        assert_eq!(format_until_start(Duration::hours(26) + Duration::minutes(3)), "26h 3m");
    }

    #[test]
    fn elapsed_adds_hour_prefix() {
        assert_eq!(format_elapsed(Duration::seconds(125)), "2m 5s");
        assert_eq!(format_elapsed(Duration::seconds(3_725)), "1h 2m 5s");
    }

    #[test]
    fn sub_second_precision_is_floored() {
        assert_eq!(format_minutes_seconds(Duration::milliseconds(59_999)), "0m 59s");
    }
}
