use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use fs4::tokio::AsyncFileExt;
use serde_json::{Map, Value};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    model::record::{ActivityRecord, NewActivity},
    utils::clock::Clock,
};

/// Narrowing applied to a fetch. The default is everything the owner ever recorded.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub category: Option<Arc<str>>,
    /// Keep records created at or after this moment.
    pub since: Option<DateTime<Utc>>,
}

/// Interface for abstracting where journal entries live. Every operation is scoped to an owner;
/// records of other owners are invisible to it.
pub trait ActivityStore {
    /// Records matching `query`, newest first.
    fn fetch(
        &self,
        owner: Uuid,
        query: ActivityQuery,
    ) -> impl Future<Output = Result<Vec<ActivityRecord>>> + Send;

    /// Persists a new entry, assigning its id and creation moment. Returns the stored record.
    fn insert(
        &self,
        owner: Uuid,
        activity: NewActivity,
    ) -> impl Future<Output = Result<ActivityRecord>> + Send;

    /// Replaces the payload of the record with the given id, keeping everything else. There is
    /// no compare-and-swap here: two racing updates resolve to whichever wrote last.
    fn update_payload(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: Map<String, Value>,
    ) -> impl Future<Output = Result<ActivityRecord>> + Send;

    /// Removes the record with the given id.
    fn delete(&self, owner: Uuid, id: Uuid) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref> ActivityStore for T
where
    T::Target: ActivityStore,
{
    fn fetch(
        &self,
        owner: Uuid,
        query: ActivityQuery,
    ) -> impl Future<Output = Result<Vec<ActivityRecord>>> + Send {
        self.deref().fetch(owner, query)
    }

    fn insert(
        &self,
        owner: Uuid,
        activity: NewActivity,
    ) -> impl Future<Output = Result<ActivityRecord>> + Send {
        self.deref().insert(owner, activity)
    }

    fn update_payload(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: Map<String, Value>,
    ) -> impl Future<Output = Result<ActivityRecord>> + Send {
        self.deref().update_payload(owner, id, payload)
    }

    fn delete(&self, owner: Uuid, id: Uuid) -> impl Future<Output = Result<()>> + Send {
        self.deref().delete(owner, id)
    }
}

const JOURNAL_FILE: &str = "journal.jsonl";

/// The main realization of [ActivityStore].
pub struct JournalStore {
    journal_path: PathBuf,
    clock: Box<dyn Clock>,
}

impl JournalStore {
    pub fn new(application_dir: PathBuf, clock: Box<dyn Clock>) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&application_dir)?;

        Ok(Self {
            journal_path: application_dir.join(JOURNAL_FILE),
            clock,
        })
    }

    /// Number of lines the journal can currently parse. Diagnostics only, so it deliberately
    /// ignores owners.
    pub async fn record_count(&self) -> Result<usize> {
        Ok(self.read_all().await?.len())
    }

    async fn read_all(&self) -> Result<Vec<ActivityRecord>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<ActivityRecord>, std::io::Error> {
            debug!("Reading journal {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut records = vec![];
            while let Ok(Some(line)) = lines.next_line().await {
                match serde_json::from_str::<ActivityRecord>(&line) {
                    Ok(v) => records.push(v),
                    Err(e) => {
                        // ignore illegal lines. Might happen after shutdowns
                        warn!("Skipping a journal line that isn't a record: {e}")
                    }
                }
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(records)
        }

        match extract(&self.journal_path).await {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }

    async fn append_record(&self, record: &ActivityRecord) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&self.journal_path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::append_with_file(&mut file, record).await;
        file.unlock_async().await?;
        result
    }

    async fn append_with_file(file: &mut File, record: &ActivityRecord) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');

        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }

    /// Runs `mutate` over the parsed journal and writes the result back in place, all under one
    /// exclusive lock. When `mutate` fails the journal is left untouched.
    async fn rewrite<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<ActivityRecord>) -> Result<R>,
    ) -> Result<R> {
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.journal_path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::rewrite_with_file(&mut file, mutate).await;
        file.unlock_async().await?;
        result
    }

    async fn rewrite_with_file<R>(
        file: &mut File,
        mutate: impl FnOnce(&mut Vec<ActivityRecord>) -> Result<R>,
    ) -> Result<R> {
        let mut content = String::new();
        file.read_to_string(&mut content).await?;

        let mut records = content
            .lines()
            .filter_map(|line| match serde_json::from_str::<ActivityRecord>(line) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Dropping a journal line that isn't a record: {e}");
                    None
                }
            })
            .collect::<Vec<_>>();

        let result = mutate(&mut records)?;

        let mut buffer = Vec::<u8>::new();
        for record in &records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }

        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        Ok(result)
    }
}

impl ActivityStore for JournalStore {
    async fn fetch(&self, owner: Uuid, query: ActivityQuery) -> Result<Vec<ActivityRecord>> {
        let mut records = self.read_all().await?;
        records.retain(|record| {
            record.owner == owner
                && query
                    .category
                    .as_ref()
                    .map_or(true, |category| record.category == *category)
                && query
                    .since
                    .map_or(true, |threshold| record.created_at >= threshold)
        });
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert(&self, owner: Uuid, activity: NewActivity) -> Result<ActivityRecord> {
        let record = ActivityRecord {
            id: Uuid::new_v4(),
            owner,
            category: activity.category,
            kind: activity.kind,
            payload: activity.payload,
            created_at: self.clock.time(),
        };

        self.append_record(&record).await?;
        debug!("Inserted {} record {}", record.category, record.id);
        Ok(record)
    }

    async fn update_payload(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: Map<String, Value>,
    ) -> Result<ActivityRecord> {
        self.rewrite(move |records| {
            let record = records
                .iter_mut()
                .find(|record| record.owner == owner && record.id == id)
                .with_context(|| format!("No record with id {id}"))?;
            record.payload = payload;
            Ok(record.clone())
        })
        .await
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        self.rewrite(move |records| {
            let before = records.len();
            records.retain(|record| !(record.owner == owner && record.id == id));
            if records.len() == before {
                bail!("No record with id {id}");
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::atomic::{AtomicI64, Ordering},
    };

    use anyhow::Result;
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use serde_json::json;
    use tempfile::tempdir;
    use uuid::Uuid;

    use crate::{
        model::record::NewActivity,
        store::activity_store::{ActivityQuery, ActivityStore, JournalStore},
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    /// Advances one second on every read so inserts get distinct, ordered timestamps.
    struct SteppingClock {
        step: AtomicI64,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                step: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn time(&self) -> DateTime<Utc> {
            let step = self.step.fetch_add(1, Ordering::Relaxed);
            Utc.from_utc_datetime(&TEST_START_DATE) + Duration::seconds(step)
        }
    }

    fn new_activity(category: &str, kind: &str, payload: serde_json::Value) -> NewActivity {
        NewActivity {
            category: category.into(),
            kind: kind.into(),
            payload: serde_json::from_value(payload).unwrap(),
        }
    }

    fn test_store(dir: &std::path::Path) -> Result<JournalStore> {
        Ok(JournalStore::new(
            dir.to_path_buf(),
            Box::new(SteppingClock::new()),
        )?)
    }

    #[tokio::test]
    async fn insert_then_fetch_roundtrips() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        let first = store
            .insert(owner, new_activity("physical", "workout", json!({ "name": "Run" })))
            .await?;
        let second = store
            .insert(owner, new_activity("mental", "reading", json!({ "title": "Novel" })))
            .await?;

        let records = store.fetch(owner, ActivityQuery::default()).await?;

        assert_eq!(records, vec![second, first]);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_only_sees_the_owner() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();

        store
            .insert(me, new_activity("work", "task", json!({ "title": "Mine" })))
            .await?;
        store
            .insert(
                someone_else,
                new_activity("work", "task", json!({ "title": "Theirs" })),
            )
            .await?;

        let records = store.fetch(me, ActivityQuery::default()).await?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Mine");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_filters_by_category_and_threshold() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        store
            .insert(owner, new_activity("work", "task", json!({ "title": "Early" })))
            .await?;
        store
            .insert(owner, new_activity("health", "vitals", json!({ "title": "Pulse" })))
            .await?;
        let late = store
            .insert(owner, new_activity("work", "focus", json!({ "title": "Late" })))
            .await?;

        let work = store
            .fetch(
                owner,
                ActivityQuery {
                    category: Some("work".into()),
                    since: None,
                },
            )
            .await?;
        assert_eq!(work.len(), 2);
        assert_eq!(work[0].title(), "Late");
        assert_eq!(work[1].title(), "Early");

        // The threshold is inclusive.
        let recent = store
            .fetch(
                owner,
                ActivityQuery {
                    category: Some("work".into()),
                    since: Some(late.created_at),
                },
            )
            .await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title(), "Late");
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_only_the_payload() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        let stored = store
            .insert(
                owner,
                new_activity("routine", "habit", json!({ "title": "Stretch", "completed": false })),
            )
            .await?;

        let updated = store
            .update_payload(
                owner,
                stored.id,
                serde_json::from_value(json!({ "title": "Stretch", "completed": true }))?,
            )
            .await?;

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.payload.get("completed"), Some(&json!(true)));

        let records = store.fetch(owner, ActivityQuery::default()).await?;
        assert_eq!(records, vec![updated]);
        Ok(())
    }

    #[tokio::test]
    async fn update_of_a_foreign_or_missing_id_fails() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        let stored = store
            .insert(owner, new_activity("work", "task", json!({ "title": "Mine" })))
            .await?;

        let missing = store
            .update_payload(owner, Uuid::new_v4(), stored.payload.clone())
            .await;
        assert!(missing.is_err());

        let foreign = store
            .update_payload(Uuid::new_v4(), stored.id, stored.payload.clone())
            .await;
        assert!(foreign.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        let keep = store
            .insert(owner, new_activity("health", "vitals", json!({ "title": "Pulse" })))
            .await?;
        let gone = store
            .insert(owner, new_activity("health", "symptoms", json!({ "title": "Headache" })))
            .await?;

        store.delete(owner, gone.id).await?;

        let records = store.fetch(owner, ActivityQuery::default()).await?;
        assert_eq!(records, vec![keep]);

        assert!(store.delete(owner, gone.id).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn fetch_on_a_fresh_directory_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;

        let records = store.fetch(Uuid::new_v4(), ActivityQuery::default()).await?;

        assert!(records.is_empty());
        assert_eq!(store.record_count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_lines_are_skipped() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let owner = Uuid::new_v4();

        store
            .insert(owner, new_activity("work", "task", json!({ "title": "Before" })))
            .await?;

        let mut journal = std::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join("journal.jsonl"))?;
        journal.write_all(b"{\"cut off by a shut")?;
        journal.write_all(b"\n")?;
        drop(journal);

        store
            .insert(owner, new_activity("work", "task", json!({ "title": "After" })))
            .await?;

        let records = store.fetch(owner, ActivityQuery::default()).await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "After");
        assert_eq!(records[1].title(), "Before");
        Ok(())
    }
}
