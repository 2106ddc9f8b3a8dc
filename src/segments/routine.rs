use anyhow::{bail, Context, Result};
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{
        details::{ActivityDetails, RoutineDetails},
        record::Category,
    },
    store::activity_store::{ActivityQuery, ActivityStore},
};

/// Flips a routine between done and not done, carrying its completion streak along. Returns the
/// state that was written.
pub async fn toggle_completion(
    store: &impl ActivityStore,
    owner: Uuid,
    id: Uuid,
) -> Result<RoutineDetails> {
    let records = store
        .fetch(
            owner,
            ActivityQuery {
                category: Some(Category::Routine.as_str().into()),
                since: None,
            },
        )
        .await?;

    let record = records
        .iter()
        .find(|record| record.id == id)
        .with_context(|| format!("No routine with id {id}"))?;

    let ActivityDetails::Routine(mut details) = ActivityDetails::from_record(record) else {
        bail!("Record {id} doesn't have a routine payload");
    };

    details.toggle();
    debug!(
        "Toggled routine {id}: completed={} streak={}",
        details.completed, details.streak
    );

    store
        .update_payload(
            owner,
            id,
            ActivityDetails::Routine(details.clone()).into_payload(),
        )
        .await?;

    Ok(details)
}
