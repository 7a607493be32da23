//! 12-hour wall-clock helpers shared by range parsing and schedule rendering.

use chrono::NaiveTime;

/// AM or PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Parse `AM`/`PM` in any letter case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("am") {
            Some(Self::Am)
        } else if s.eq_ignore_ascii_case("pm") {
            Some(Self::Pm)
        } else {
            None
        }
    }
}

/// Convert a 12-hour clock hour (1-12) to 24-hour (0-23).
///
/// 12 AM is midnight (0) and 12 PM is noon (12).
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    })
}

/// Build a time from 12-hour components.
pub fn from_12_hour(hour: u32, minute: u32, meridiem: Meridiem) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(to_24_hour(hour, meridiem)?, minute, 0)
}

/// Render as `H:MM AM` with no leading zero on the hour.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_meridiem_edges() {
        assert_eq!(to_24_hour(12, Meridiem::Am), Some(0));
        assert_eq!(to_24_hour(12, Meridiem::Pm), Some(12));
        assert_eq!(to_24_hour(1, Meridiem::Pm), Some(13));
        assert_eq!(to_24_hour(11, Meridiem::Am), Some(11));
        assert_eq!(to_24_hour(0, Meridiem::Am), None);
        assert_eq!(to_24_hour(13, Meridiem::Pm), None);
    }

    #[test]
    fn formats_without_leading_zero() {
        let t = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(format_clock(t), "8:00 AM");
        let t = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        assert_eq!(format_clock(t), "12:30 PM");
        let t = NaiveTime::from_hms_opt(0, 5, 0).unwrap();
        assert_eq!(format_clock(t), "12:05 AM");
        let t = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(format_clock(t), "11:00 PM");
    }

    #[test]
    fn parses_meridiem_case_insensitively() {
        assert_eq!(Meridiem::parse("pm"), Some(Meridiem::Pm));
        assert_eq!(Meridiem::parse("Am"), Some(Meridiem::Am));
        assert_eq!(Meridiem::parse("xm"), None);
    }

    #[test]
    fn builds_time_from_components() {
        assert_eq!(
            from_12_hour(9, 15, Meridiem::Pm),
            NaiveTime::from_hms_opt(21, 15, 0)
        );
        assert_eq!(from_12_hour(9, 60, Meridiem::Pm), None);
    }
}
