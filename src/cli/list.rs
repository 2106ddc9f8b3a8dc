use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use now::DateTimeNow;
use uuid::Uuid;

use crate::{
    model::{details::ActivityDetails, record::Category},
    store::activity_store::{ActivityQuery, ActivityStore},
    utils::time::display_moment,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ListCommand {
    #[arg(help = "Category to list")]
    category: Category,
    #[arg(
        long,
        short,
        help = "Only show entries from this moment on. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\""
    )]
    since: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(
        long = "days",
        default_value_t = false,
        help = "Treat --since as a whole day, counting from its midnight"
    )]
    treat_as_days: bool,
    #[arg(long, short, help = "Show at most this many entries")]
    limit: Option<usize>,
}

/// Command to print one category of the journal, newest entries first.
pub async fn process_list_command(
    ListCommand {
        category,
        since,
        date_style,
        treat_as_days,
        limit,
    }: ListCommand,
    store: &impl ActivityStore,
    owner: Uuid,
) -> Result<()> {
    let since = parse_since(since, date_style, treat_as_days)?;

    let records = store
        .fetch(
            owner,
            ActivityQuery {
                category: Some(category.as_str().into()),
                since,
            },
        )
        .await?;

    if records.is_empty() {
        println!("No {category} entries yet");
        return Ok(());
    }

    for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            display_moment(record.created_at),
            record.id,
            record.kind,
            record.title(),
            describe_details(&ActivityDetails::from_record(record)),
        );
    }
    Ok(())
}

fn parse_since(
    since: Option<String>,
    date_style: DateStyle,
    treat_as_days: bool,
) -> Result<Option<DateTime<Utc>>> {
    let Some(since) = since else {
        return Ok(None);
    };

    let now = Local::now();
    let mut parsed = match parse_date_string(&since, now, date_style.into()) {
        Ok(v) => v.with_timezone(&Local),
        Err(e) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate the start date {e}"),
                )
                .into());
        }
    };
    if treat_as_days {
        parsed = parsed.beginning_of_day();
    }
    Ok(Some(parsed.with_timezone(&Utc)))
}

/// One-line extras per entry, whatever its payload carries.
fn describe_details(details: &ActivityDetails) -> String {
    let mut parts: Vec<String> = vec![];
    match details {
        ActivityDetails::Physical(v) => {
            if let Some(duration) = v.duration {
                parts.push(format!("{duration}m"));
            }
            if let Some(calories) = v.calories {
                parts.push(format!("{calories}kcal"));
            }
            if let Some(weight) = v.weight {
                parts.push(format!("{weight}kg"));
            }
        }
        ActivityDetails::Mental(v) => {
            if let Some(duration) = v.duration {
                parts.push(format!("{duration}m"));
            }
            if let Some(pages) = v.pages {
                parts.push(format!("{pages} pages"));
            }
            if let Some(progress) = v.progress {
                parts.push(format!("{progress}%"));
            }
        }
        ActivityDetails::Health(v) => {
            if let Some(value) = &v.value {
                match &v.unit {
                    Some(unit) => parts.push(format!("{value} {unit}")),
                    None => parts.push(value.clone()),
                }
            }
            if let Some(severity) = v.severity {
                parts.push(format!("severity {severity}"));
            }
        }
        ActivityDetails::Routine(v) => {
            parts.push(if v.completed { "done" } else { "not done" }.to_string());
            parts.push(format!("streak {}", v.streak));
            parts.push(v.target_frequency.to_string());
        }
        ActivityDetails::Work(v) => {
            parts.push(v.status.to_string());
            parts.push(v.priority.to_string());
            if let Some(due_date) = v.due_date {
                parts.push(format!("due {due_date}"));
            }
        }
        ActivityDetails::Other(_) => {}
    }
    parts.join(", ")
}
