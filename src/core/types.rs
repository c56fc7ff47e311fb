//! Shared primitive types

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Row identifier assigned by the store (auto-incrementing, never reused
/// within a session). Matches the persistence collaborator's integer ids.
pub type Id = u32;

/// A wall-clock time of day without a date, used by plan time windows.
///
/// Serialized as `"HH:MM:SS"` to stay compatible with the snapshot format
/// the runtime consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    /// Seconds since midnight, plus optional whole days.
    pub fn as_seconds(&self, days: u32) -> u32 {
        days * 86_400 + self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let hour = parts.next()?.parse().ok()?;
        let minute = parts.next()?.parse().ok()?;
        let second = parts.next().unwrap_or("0").parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(hour, minute, second)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid time of day: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_seconds() {
        let t = TimeOfDay::new(8, 30, 15).unwrap();
        assert_eq!(t.as_seconds(0), 8 * 3600 + 30 * 60 + 15);
        assert_eq!(t.as_seconds(2), 2 * 86_400 + 8 * 3600 + 30 * 60 + 15);
    }

    #[test]
    fn test_time_parse_and_display() {
        let t = TimeOfDay::parse("23:05:00").unwrap();
        assert_eq!(t.to_string(), "23:05:00");
        assert!(TimeOfDay::parse("24:00:00").is_none());
        assert!(TimeOfDay::parse("12:61:00").is_none());
    }
}
