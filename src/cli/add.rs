use anyhow::Result;
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use uuid::Uuid;

use crate::{
    model::{
        details::{
            ActivityDetails, Frequency, HealthDetails, MentalDetails, PhysicalDetails, Priority,
            RoutineDetails, WorkDetails, WorkStatus,
        },
        record::{Category, NewActivity},
    },
    store::activity_store::ActivityStore,
};

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    #[command(about = "Record a workout, some movement or a body measurement")]
    Physical {
        kind: PhysicalKind,
        #[arg(value_parser = non_empty_text, help = "What it was, e.g. \"Morning run\"")]
        name: String,
        #[arg(long, help = "Duration in minutes")]
        duration: Option<u32>,
        #[arg(long)]
        calories: Option<u32>,
        #[arg(long, help = "Weight in kg, for measurements")]
        weight: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(about = "Record reading, learning, creative time or meditation")]
    Mental {
        kind: MentalKind,
        #[arg(value_parser = non_empty_text, help = "What it was, e.g. \"War and Peace\"")]
        title: String,
        #[arg(long, help = "Duration in minutes")]
        duration: Option<u32>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long, help = "Progress in percent")]
        progress: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(about = "Record vitals, symptoms, medication or an appointment")]
    Health {
        kind: HealthKind,
        #[arg(value_parser = non_empty_text, help = "What it was, e.g. \"Blood pressure\"")]
        title: String,
        #[arg(long, help = "Measured value, e.g. \"120/80\"")]
        value: Option<String>,
        #[arg(long, help = "Unit of the value, e.g. \"mmHg\"")]
        unit: Option<String>,
        #[arg(long, help = "How bad it is from 1 to 10")]
        severity: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(about = "Add an item to the daily routine")]
    Routine {
        kind: RoutineKind,
        #[arg(value_parser = non_empty_text, help = "What it is, e.g. \"Meditation\"")]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = Frequency::Daily, help = "How often it should happen")]
        frequency: Frequency,
    },
    #[command(about = "Add a work item. New items start in the todo status")]
    Work {
        kind: WorkKind,
        #[arg(value_parser = non_empty_text, help = "What it is, e.g. \"Quarterly report\"")]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long, help = "Expected duration in minutes")]
        duration: Option<u32>,
        #[arg(long, help = "Due date as year-month-day, e.g. 2026-03-15")]
        due_date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhysicalKind {
    Workout,
    Movement,
    Measurement,
}

impl PhysicalKind {
    fn as_str(self) -> &'static str {
        match self {
            PhysicalKind::Workout => "workout",
            PhysicalKind::Movement => "movement",
            PhysicalKind::Measurement => "measurement",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MentalKind {
    Reading,
    Learning,
    Creative,
    Meditation,
}

impl MentalKind {
    fn as_str(self) -> &'static str {
        match self {
            MentalKind::Reading => "reading",
            MentalKind::Learning => "learning",
            MentalKind::Creative => "creative",
            MentalKind::Meditation => "meditation",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HealthKind {
    Vitals,
    Symptoms,
    Medication,
    Appointment,
}

impl HealthKind {
    fn as_str(self) -> &'static str {
        match self {
            HealthKind::Vitals => "vitals",
            HealthKind::Symptoms => "symptoms",
            HealthKind::Medication => "medication",
            HealthKind::Appointment => "appointment",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoutineKind {
    Morning,
    Evening,
    Habit,
    Task,
}

impl RoutineKind {
    fn as_str(self) -> &'static str {
        match self {
            RoutineKind::Morning => "morning",
            RoutineKind::Evening => "evening",
            RoutineKind::Habit => "habit",
            RoutineKind::Task => "task",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WorkKind {
    Task,
    Project,
    Meeting,
    Focus,
    Goal,
}

impl WorkKind {
    fn as_str(self) -> &'static str {
        match self {
            WorkKind::Task => "task",
            WorkKind::Project => "project",
            WorkKind::Meeting => "meeting",
            WorkKind::Focus => "focus",
            WorkKind::Goal => "goal",
        }
    }
}

pub async fn process_add_command(
    command: AddCommand,
    store: &impl ActivityStore,
    owner: Uuid,
) -> Result<()> {
    let (category, kind, details) = match command {
        AddCommand::Physical {
            kind,
            name,
            duration,
            calories,
            weight,
            notes,
        } => (
            Category::Physical,
            kind.as_str(),
            ActivityDetails::Physical(PhysicalDetails {
                name,
                duration,
                calories,
                weight,
                notes,
            }),
        ),
        AddCommand::Mental {
            kind,
            title,
            duration,
            pages,
            progress,
            notes,
        } => (
            Category::Mental,
            kind.as_str(),
            ActivityDetails::Mental(MentalDetails {
                title,
                duration,
                pages,
                progress,
                notes,
            }),
        ),
        AddCommand::Health {
            kind,
            title,
            value,
            unit,
            severity,
            notes,
        } => (
            Category::Health,
            kind.as_str(),
            ActivityDetails::Health(HealthDetails {
                title,
                value,
                unit,
                severity,
                notes,
            }),
        ),
        AddCommand::Routine {
            kind,
            title,
            description,
            frequency,
        } => (
            Category::Routine,
            kind.as_str(),
            ActivityDetails::Routine(RoutineDetails {
                title,
                description,
                completed: false,
                streak: 0,
                target_frequency: frequency,
            }),
        ),
        AddCommand::Work {
            kind,
            title,
            description,
            priority,
            duration,
            due_date,
        } => (
            Category::Work,
            kind.as_str(),
            ActivityDetails::Work(WorkDetails {
                title,
                description,
                priority,
                status: WorkStatus::Todo,
                duration,
                due_date,
            }),
        ),
    };

    let record = store
        .insert(
            owner,
            NewActivity {
                category: category.as_str().into(),
                kind: kind.into(),
                payload: details.into_payload(),
            },
        )
        .await?;

    println!(
        "Recorded {} {} \"{}\" ({})",
        record.category,
        record.kind,
        record.title(),
        record.id
    );
    Ok(())
}

fn non_empty_text(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("can't be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}
