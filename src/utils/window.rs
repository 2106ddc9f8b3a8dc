use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;
use chrono::Duration;

/// Positive number of days a report looks back over. Zero-day windows are rejected at
/// construction, so the daily average never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowDays(u32);

impl WindowDays {
    pub fn new_opt(value: u32) -> Option<WindowDays> {
        if value == 0 {
            None
        } else {
            Some(WindowDays(value))
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::days(self.0 as i64)
    }
}

impl Default for WindowDays {
    fn default() -> Self {
        WindowDays(7)
    }
}

impl Display for WindowDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowDays {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.parse::<u32>()?;
        WindowDays::new_opt(v).ok_or_else(|| anyhow!("A window has to cover at least 1 day"))
    }
}

impl Deref for WindowDays {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::WindowDays;

    #[test]
    fn parses_positive_day_counts() {
        assert_eq!("30".parse::<WindowDays>().unwrap(), WindowDays::new_opt(30).unwrap());
        assert_eq!(*WindowDays::default(), 7);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!("0".parse::<WindowDays>().is_err());
        assert!("-3".parse::<WindowDays>().is_err());
        assert!("week".parse::<WindowDays>().is_err());
    }
}
