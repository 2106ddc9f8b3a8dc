use chrono::{DateTime, Local, Utc};

use super::window::WindowDays;

/// This is the standard way of displaying a moment in lifelog.
pub fn display_moment(moment: DateTime<Utc>) -> String {
    moment.with_timezone(&Local).format("%x %H:%M").to_string()
}

/// Start of the trailing window that ends at `now`.
pub fn window_start(now: DateTime<Utc>, window: WindowDays) -> DateTime<Utc> {
    now - window.as_duration()
}
