use anyhow::{bail, Context, Result};
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{
        details::{ActivityDetails, WorkDetails, WorkStatus},
        record::Category,
    },
    store::activity_store::{ActivityQuery, ActivityStore},
};

/// Moves a work entry to another status. Returns the state that was written.
pub async fn set_status(
    store: &impl ActivityStore,
    owner: Uuid,
    id: Uuid,
    status: WorkStatus,
) -> Result<WorkDetails> {
    let records = store
        .fetch(
            owner,
            ActivityQuery {
                category: Some(Category::Work.as_str().into()),
                since: None,
            },
        )
        .await?;

    let record = records
        .iter()
        .find(|record| record.id == id)
        .with_context(|| format!("No work entry with id {id}"))?;

    let ActivityDetails::Work(mut details) = ActivityDetails::from_record(record) else {
        bail!("Record {id} doesn't have a work payload");
    };

    details.status = status;
    debug!("Moved work entry {id} to {status}");

    store
        .update_payload(
            owner,
            id,
            ActivityDetails::Work(details.clone()).into_payload(),
        )
        .await?;

    Ok(details)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;
    use uuid::Uuid;

    use crate::{
        model::{details::WorkStatus, record::NewActivity},
        store::activity_store::{ActivityQuery, ActivityStore, JournalStore},
        utils::clock::DefaultClock,
    };

    use super::set_status;

    #[tokio::test]
    async fn status_change_is_persisted() -> Result<()> {
        let dir = tempdir()?;
        let store = JournalStore::new(dir.path().to_path_buf(), Box::new(DefaultClock))?;
        let owner = Uuid::new_v4();

        let stored = store
            .insert(
                owner,
                NewActivity {
                    category: "work".into(),
                    kind: "task".into(),
                    payload: serde_json::from_value(json!({
                        "title": "Quarterly report",
                        "priority": "high",
                        "status": "todo"
                    }))
                    .unwrap(),
                },
            )
            .await?;

        let moved = set_status(&store, owner, stored.id, WorkStatus::Completed).await?;
        assert_eq!(moved.status, WorkStatus::Completed);
        assert_eq!(moved.title, "Quarterly report");

        let records = store.fetch(owner, ActivityQuery::default()).await?;
        assert_eq!(records[0].payload.get("status"), Some(&json!("completed")));
        assert_eq!(records[0].payload.get("priority"), Some(&json!("high")));
        Ok(())
    }

    #[tokio::test]
    async fn missing_entries_are_reported() -> Result<()> {
        let dir = tempdir()?;
        let store = JournalStore::new(dir.path().to_path_buf(), Box::new(DefaultClock))?;

        let result = set_status(&store, Uuid::new_v4(), Uuid::new_v4(), WorkStatus::Todo).await;

        assert!(result.is_err());
        Ok(())
    }
}
