//! Read-only aggregation behind the report screen. One pass over the fetched records produces
//! everything the dashboard shows; nothing here touches storage or mutates a record.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{model::record::ActivityRecord, utils::window::WindowDays};

/// How many entries the "recent" list keeps.
pub const RECENT_LIMIT: usize = 5;

/// A streak level is earned for every full week's worth of entries in the window.
const STREAK_WEEK: u64 = 7;

/// Projection of a record for the recent list. Carries just enough to render a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub category: Arc<str>,
    pub kind: Arc<str>,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Everything the report shows, computed by [summarize]. Maps are ordered so the same records
/// always serialize to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_count: u64,
    pub counts_by_category: BTreeMap<Arc<str>, u64>,
    pub recent_activities: Vec<RecentActivity>,
    pub streaks_by_category: BTreeMap<Arc<str>, u64>,
    pub weekly_trends_by_category: BTreeMap<Arc<str>, [u64; 7]>,
}

impl AnalyticsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Entries per day over the report window, rounded to the nearest whole entry.
    pub fn daily_average(&self, window: WindowDays) -> u64 {
        (self.total_count as f64 / *window as f64).round() as u64
    }

    /// The longest of the per-category streaks, 0 when nothing was recorded.
    pub fn best_streak(&self) -> u64 {
        self.streaks_by_category.values().copied().max().unwrap_or(0)
    }

    pub fn active_categories(&self) -> usize {
        self.counts_by_category.len()
    }

    /// The category with the most entries. The first tag in map order wins a tie.
    pub fn most_active(&self) -> Option<(Arc<str>, u64)> {
        let mut best: Option<(Arc<str>, u64)> = None;
        for (category, count) in &self.counts_by_category {
            match &best {
                Some((_, top)) if *top >= *count => {}
                _ => best = Some((category.clone(), *count)),
            }
        }
        best
    }
}

/// Aggregates `records` into the report summary in one pass, preserving the caller's record
/// order for the recent list.
///
/// The caller decides what the window contains; `window` itself only feeds the derived daily
/// average. Categories outside the built-in set aggregate under their own tag, and a summary of
/// no records is simply empty.
pub fn summarize(records: &[ActivityRecord], window: WindowDays) -> AnalyticsSummary {
    debug!("Summarizing {} records over {window} days", records.len());

    let mut summary = AnalyticsSummary::default();

    for record in records {
        summary.total_count += 1;

        *summary
            .counts_by_category
            .entry(record.category.clone())
            .or_insert(0) += 1;

        if summary.recent_activities.len() < RECENT_LIMIT {
            summary.recent_activities.push(RecentActivity {
                category: record.category.clone(),
                kind: record.kind.clone(),
                title: record.title().to_string(),
                created_at: record.created_at,
            });
        }

        // Buckets follow the stored UTC moment, with Sunday at index 0.
        let weekday = record.created_at.weekday().num_days_from_sunday() as usize;
        summary
            .weekly_trends_by_category
            .entry(record.category.clone())
            .or_insert([0; 7])[weekday] += 1;
    }

    for (category, count) in &summary.counts_by_category {
        summary
            .streaks_by_category
            .insert(category.clone(), count / STREAK_WEEK);
    }

    summary
}
