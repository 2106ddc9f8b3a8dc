use std::fmt::Display;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::record::{ActivityRecord, Category};

/// Typed view of a record payload, keyed by the record's category.
///
/// Parsing happens where a flow needs the fields, not when the journal is read: a payload that
/// doesn't match its category's shape, or a category this build doesn't know, lands in [Other]
/// with the document intact.
///
/// [Other]: ActivityDetails::Other
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityDetails {
    Physical(PhysicalDetails),
    Mental(MentalDetails),
    Health(HealthDetails),
    Routine(RoutineDetails),
    Work(WorkDetails),
    Other(Map<String, Value>),
}

impl ActivityDetails {
    pub fn from_record(record: &ActivityRecord) -> ActivityDetails {
        Self::from_payload(&record.category, &record.payload)
    }

    pub fn from_payload(category: &str, payload: &Map<String, Value>) -> ActivityDetails {
        let document = Value::Object(payload.clone());
        let parsed = match Category::from_tag(category) {
            Some(Category::Physical) => {
                serde_json::from_value(document).map(ActivityDetails::Physical)
            }
            Some(Category::Mental) => serde_json::from_value(document).map(ActivityDetails::Mental),
            Some(Category::Health) => serde_json::from_value(document).map(ActivityDetails::Health),
            Some(Category::Routine) => {
                serde_json::from_value(document).map(ActivityDetails::Routine)
            }
            Some(Category::Work) => serde_json::from_value(document).map(ActivityDetails::Work),
            None => return ActivityDetails::Other(payload.clone()),
        };

        match parsed {
            Ok(v) => v,
            Err(e) => {
                warn!("A {category} payload doesn't match the expected shape, keeping it raw: {e}");
                ActivityDetails::Other(payload.clone())
            }
        }
    }

    /// The payload document this typed form persists as.
    pub fn into_payload(self) -> Map<String, Value> {
        let document = match self {
            ActivityDetails::Physical(v) => serde_json::to_value(v),
            ActivityDetails::Mental(v) => serde_json::to_value(v),
            ActivityDetails::Health(v) => serde_json::to_value(v),
            ActivityDetails::Routine(v) => serde_json::to_value(v),
            ActivityDetails::Work(v) => serde_json::to_value(v),
            ActivityDetails::Other(map) => return map,
        };
        match document.expect("detail structs serialize without custom failures") {
            Value::Object(map) => map,
            _ => unreachable!("detail structs serialize to json objects"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub target_frequency: Frequency,
}

impl RoutineDetails {
    /// Flips completion and moves the streak with it. Finishing extends the streak, backing out
    /// takes one off, never below zero.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        if self.completed {
            self.streak += 1;
        } else {
            self.streak = self.streak.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Todo => write!(f, "todo"),
            WorkStatus::InProgress => write!(f, "in_progress"),
            WorkStatus::Completed => write!(f, "completed"),
        }
    }
}
