use ansi_term::Style;
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use uuid::Uuid;

use crate::{
    analytics::{summarize, AnalyticsSummary},
    store::activity_store::{ActivityQuery, ActivityStore},
    utils::{
        percentage::count_percentage,
        time::{display_moment, window_start},
        window::WindowDays,
    },
};

const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(
        long,
        short = 'd',
        default_value_t = WindowDays::default(),
        help = "Trailing window in days. The dashboard presets are 7, 30 and 90"
    )]
    days: WindowDays,
    #[arg(long, help = "Print the summary as json instead of text")]
    json: bool,
}

/// Command to aggregate the trailing window of the journal into one report.
pub async fn process_report_command(
    ReportCommand { days, json }: ReportCommand,
    store: &impl ActivityStore,
    owner: Uuid,
) -> Result<()> {
    let records = store
        .fetch(
            owner,
            ActivityQuery {
                category: None,
                since: Some(window_start(Utc::now(), days)),
            },
        )
        .await?;

    let summary = summarize(&records, days);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    render_summary(&summary, days);
    Ok(())
}

fn render_summary(summary: &AnalyticsSummary, days: WindowDays) {
    if summary.is_empty() {
        println!("No activity in the last {days} days. Record something with lifelog add");
        return;
    }

    let heading = Style::new().bold();

    println!(
        "{} entries in the last {days} days, about {} per day across {} categories",
        heading.paint(summary.total_count.to_string()),
        summary.daily_average(days),
        summary.active_categories(),
    );
    if let Some((category, count)) = summary.most_active() {
        println!("Most active: {} with {count} entries", heading.paint(category.as_ref()));
    }
    println!("Best streak: {}", summary.best_streak());

    println!();
    let mut counts = summary.counts_by_category.iter().collect::<Vec<_>>();
    counts.sort_by(|a, b| a.1.cmp(b.1));
    counts.reverse();
    for (category, count) in counts {
        println!(
            "{category}\t{count}\t{}\tstreak {}",
            count_percentage(*count, summary.total_count),
            summary.streaks_by_category.get(category).copied().unwrap_or(0),
        );
    }

    println!();
    println!("{}", heading.paint("Recent"));
    for recent in &summary.recent_activities {
        println!(
            "{}\t{}\t{}\t{}",
            display_moment(recent.created_at),
            recent.category,
            recent.kind,
            recent.title,
        );
    }

    println!();
    println!("{}", heading.paint("Weekly rhythm"));
    println!("\t{}", WEEKDAY_LABELS.join("\t"));
    for (category, cells) in &summary.weekly_trends_by_category {
        let row = cells
            .iter()
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        println!("{category}\t{row}");
    }
}
