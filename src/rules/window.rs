use chrono::Timelike;

/// Whether `now` falls inside the active window `[start, end)`.
///
/// Only the hour of each bound is compared; minutes are ignored. A start hour
/// later than the end hour wraps past midnight. An unparseable bound puts
/// `now` outside the window.
pub fn in_window<T: Timelike>(now: &T, start: &str, end: &str) -> bool {
    let (Some(start_hour), Some(end_hour)) = (hour_of(start), hour_of(end)) else {
        return false;
    };
    let hour = now.hour();

    if start_hour > end_hour {
        hour >= start_hour || hour < end_hour
    } else {
        hour >= start_hour && hour < end_hour
    }
}

/// Leading integer of the hour field, the way `"7:30"` or `"07"` read.
pub(crate) fn hour_of(hhmm: &str) -> Option<u32> {
    let field = hhmm.split(':').next()?.trim_start();
    let digits: String = field.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn overnight_window_wraps_midnight() {
        assert!(in_window(&at(23, 0), "22:00", "06:00"));
        assert!(in_window(&at(3, 0), "22:00", "06:00"));
        assert!(!in_window(&at(10, 0), "22:00", "06:00"));
        assert!(!in_window(&at(6, 0), "22:00", "06:00"));
    }

    #[test]
    fn daytime_window_is_half_open() {
        assert!(in_window(&at(9, 0), "08:00", "22:00"));
        assert!(!in_window(&at(22, 0), "08:00", "22:00"));
        assert!(!in_window(&at(7, 59), "08:00", "22:00"));
    }

    #[test]
    fn minutes_in_bounds_are_ignored() {
        // 08:45 start still opens at 08:00
        assert!(in_window(&at(8, 10), "08:45", "09:15"));
        assert!(!in_window(&at(9, 10), "08:45", "09:15"));
    }

    #[test]
    fn equal_hours_give_empty_window() {
        for hour in 0..24 {
            assert!(!in_window(&at(hour, 0), "05:00", "05:30"));
        }
    }

    #[test]
    fn malformed_bounds_are_outside() {
        assert!(!in_window(&at(12, 0), "noon", "22:00"));
        assert!(!in_window(&at(12, 0), "08:00", ""));
    }

    #[test]
    fn hour_parse_reads_leading_digits() {
        assert_eq!(hour_of("7:30"), Some(7));
        assert_eq!(hour_of(" 07"), Some(7));
        assert_eq!(hour_of("x7"), None);
    }
}
