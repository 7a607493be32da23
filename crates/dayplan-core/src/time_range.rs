//! Availability window parsing.
//!
//! Accepts free text such as `8 AM–6 PM` or `9:30am to 5pm` and extracts the
//! two clock mentions as start and end hours. Parsing is best-effort: any
//! failure yields [`TimeRange::default`] (8 AM to 6 PM).

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{self, Meridiem};

/// Window length substituted when `end_hour <= start_hour`.
pub const DEFAULT_WINDOW_HOURS: u32 = 10;

static CLOCK_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*([ap]m)\b")
        .expect("clock mention pattern is valid")
});

/// A single-day availability window in whole 24-hour clock hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
        }
    }
}

impl TimeRange {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Parse free text, falling back to the default window on any failure.
    pub fn parse(text: &str) -> Self {
        match Self::try_parse(text) {
            Some(range) => range,
            None => {
                let range = Self::default();
                warn!(
                    text,
                    start_hour = range.start_hour,
                    end_hour = range.end_hour,
                    "could not parse time range, using default window"
                );
                range
            }
        }
    }

    /// Parse free text strictly.
    ///
    /// Returns `None` unless the text holds exactly two valid `H[:MM] AM|PM`
    /// mentions. Minutes are accepted and truncated to the hour.
    pub fn try_parse(text: &str) -> Option<Self> {
        let hours: Vec<u32> = CLOCK_MENTION
            .captures_iter(text)
            .map(|caps| {
                let hour = caps[1].parse().ok()?;
                let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
                let meridiem = Meridiem::parse(&caps[3])?;
                clock::from_12_hour(hour, minute, meridiem).map(|t| t.hour())
            })
            .collect::<Option<_>>()?;

        match hours.as_slice() {
            [start, end] => Some(Self::new(*start, *end)),
            _ => None,
        }
    }

    /// Hours available for scheduling.
    ///
    /// Returns [`DEFAULT_WINDOW_HOURS`] when the end is not after the start.
    pub fn total_hours(&self) -> u32 {
        if self.end_hour > self.start_hour {
            self.end_hour - self.start_hour
        } else {
            DEFAULT_WINDOW_HOURS
        }
    }

    /// Wall-clock start of the window.
    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour % 24, 0, 0).unwrap_or_default()
    }

    /// Wall-clock end of the window.
    pub fn end_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end_hour % 24, 0, 0).unwrap_or_default()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            clock::format_clock(self.start_time()),
            clock::format_clock(self.end_time())
        )
    }
}
