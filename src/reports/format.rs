//! Duration formatting. Minutes and hours are always floored from the total;
//! leftover seconds are dropped, never rounded.

/// `HH:MM:SS`, zero padded. Hours grow past two digits as needed.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// `1h 1min` for 3661 seconds. Always shows both parts.
pub fn format_hours_minutes(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    format!("{hours}h {minutes}min")
}

/// Like [`format_hours_minutes`] but omits the hour part under one hour.
pub fn format_duration(total_secs: u64) -> String {
    if total_secs >= 3600 {
        format_hours_minutes(total_secs)
    } else {
        format!("{}min", total_secs / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(90), "00:01:30");
        assert_eq!(format_clock(3661), "01:01:01");
    }

    #[test]
    fn clock_hours_are_unbounded() {
        assert_eq!(format_clock(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn hours_minutes_floor_the_total() {
        assert_eq!(format_hours_minutes(3661), "1h 1min");
        assert_eq!(format_hours_minutes(3599), "0h 59min");
        assert_eq!(format_hours_minutes(0), "0h 0min");
    }

    #[test]
    fn short_duration_drops_zero_hours() {
        assert_eq!(format_duration(59), "0min");
        assert_eq!(format_duration(1800), "30min");
        assert_eq!(format_duration(7260), "2h 1min");
    }
}
