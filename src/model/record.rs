use std::{fmt::Display, sync::Arc};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single journal entry as it is stored. The payload is an open document whose expected shape
/// depends on the category; flows that need the fields go through
/// [super::details::ActivityDetails].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub owner: Uuid,
    pub category: Arc<str>,
    pub kind: Arc<str>,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Display title of the entry: its `title` field, falling back to `name`, falling back to a
    /// generic label. Empty strings count as absent.
    pub fn title(&self) -> &str {
        self.text_field("title")
            .or_else(|| self.text_field("name"))
            .unwrap_or("Activity")
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.payload
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Everything the caller decides about a new entry. The store assigns the id and the timestamp.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub category: Arc<str>,
    pub kind: Arc<str>,
    pub payload: Map<String, Value>,
}

/// The built-in categories. Stored records keep the category as an open string, so journals
/// written by other frontends can carry tags outside this set and still aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Physical,
    Mental,
    Health,
    Routine,
    Work,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Physical => "physical",
            Category::Mental => "mental",
            Category::Health => "health",
            Category::Routine => "routine",
            Category::Work => "work",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Category> {
        match tag {
            "physical" => Some(Category::Physical),
            "mental" => Some(Category::Mental),
            "health" => Some(Category::Health),
            "routine" => Some(Category::Routine),
            "work" => Some(Category::Work),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
