//! Time-of-day filter values and the window used to match trips against them.

use anyhow::{Result, bail};
use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Last minute of the day (23:59).
pub const LAST_MINUTE: u16 = 1439;

/// Trips within this many minutes of the filter (inclusive) are counted.
pub const WINDOW_MINUTES: u16 = 60;

/// Raw slider value meaning "any time".
pub const SLIDER_ANY: i32 = -1;

/// Minutes since midnight, always in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minute: u16) -> Option<Self> {
        (minute <= LAST_MINUTE).then_some(Self(minute))
    }

    /// Minute of day of a wall-clock time. Seconds are truncated.
    pub fn of_time(time: &NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Linear distance in minutes. 23:59 and 00:01 are 1438 apart.
    pub fn distance(self, other: MinuteOfDay) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    Any,
    At(MinuteOfDay),
}

impl TimeFilter {
    /// Interprets a raw slider value: `-1` is "any time", `0..=1439` a minute of day.
    pub fn from_slider(value: i32) -> Result<Self> {
        if value == SLIDER_ANY {
            return Ok(TimeFilter::Any);
        }

        match u16::try_from(value).ok().and_then(MinuteOfDay::new) {
            Some(minute) => Ok(TimeFilter::At(minute)),
            None => bail!("slider value {value} outside [-1, {LAST_MINUTE}]"),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TimeFilter::At(_))
    }

    /// Whether a timestamp at `minute` falls inside this filter's window.
    pub fn matches(&self, minute: MinuteOfDay) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::At(center) => center.distance(minute) <= WINDOW_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute(m: u16) -> MinuteOfDay {
        MinuteOfDay::new(m).unwrap()
    }

    #[test]
    fn test_minute_of_day_bounds() {
        assert!(MinuteOfDay::new(0).is_some());
        assert!(MinuteOfDay::new(1439).is_some());
        assert!(MinuteOfDay::new(1440).is_none());
    }

    #[test]
    fn test_from_slider() {
        assert_eq!(TimeFilter::from_slider(-1).unwrap(), TimeFilter::Any);
        assert_eq!(TimeFilter::from_slider(0).unwrap(), TimeFilter::At(minute(0)));
        assert_eq!(
            TimeFilter::from_slider(1439).unwrap(),
            TimeFilter::At(minute(1439))
        );
        assert!(TimeFilter::from_slider(-2).is_err());
        assert!(TimeFilter::from_slider(1440).is_err());
    }

    #[test]
    fn test_window_is_inclusive() {
        let filter = TimeFilter::At(minute(480));

        assert!(filter.matches(minute(420)));
        assert!(filter.matches(minute(540)));
        assert!(!filter.matches(minute(419)));
        assert!(!filter.matches(minute(541)));
    }

    #[test]
    fn test_window_does_not_wrap_at_midnight() {
        let filter = TimeFilter::At(minute(1439));

        assert!(!filter.matches(minute(1)));
        assert!(filter.matches(minute(1380)));
    }

    #[test]
    fn test_any_matches_everything() {
        assert!(TimeFilter::Any.matches(minute(0)));
        assert!(TimeFilter::Any.matches(minute(1439)));
        assert!(!TimeFilter::Any.is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(minute(485).to_string(), "08:05");
    }
}
