use chrono::Utc;

use crate::models::{EvaluationResult, Record};
use crate::store::{KeyValueStore, StoreError, StoreResult};

pub const RECORDS_KEY: &str = "gwaRecords";

type Clock = Box<dyn Fn() -> u64 + Send + Sync>;

fn wall_clock_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Owns the persisted record list. Every mutation reads the whole list,
/// changes it and writes it back under [`RECORDS_KEY`].
pub struct RecordStore<S> {
    store: S,
    clock: Clock,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(wall_clock_millis),
        }
    }

    pub fn with_clock(store: S, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn backing_store(&self) -> &S {
        &self.store
    }

    /// Missing or unreadable storage counts as an empty list. Mutations do
    /// not get this fallback: they fail instead of overwriting.
    pub async fn list(&self) -> Vec<Record> {
        match self.load().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, "treating unreadable record list as empty");
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: u64) -> Option<Record> {
        self.list().await.into_iter().find(|record| record.id == id)
    }

    /// `subject` must already be trimmed and non-empty; see
    /// `validation::validate_subject`.
    pub async fn append(&self, evaluation: EvaluationResult, subject: &str) -> StoreResult<Record> {
        let mut records = self.load().await?;
        let record = Record {
            id: self.next_id(&records)?,
            subject: subject.to_string(),
            evaluation,
        };

        records.push(record.clone());
        self.save(&records).await?;
        tracing::info!(id = record.id, subject = %record.subject, "saved record");
        Ok(record)
    }

    /// Rewrites the list even when `id` is unknown.
    pub async fn remove(&self, id: u64) -> StoreResult<Vec<Record>> {
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|record| record.id != id);
        self.save(&records).await?;
        tracing::info!(id, removed = before - records.len(), "removed record");
        Ok(records)
    }

    fn next_id(&self, records: &[Record]) -> StoreResult<u64> {
        let now = (self.clock)();
        match records.iter().map(|record| record.id).max() {
            Some(last) if last >= now => {
                last.checked_add(1).ok_or(StoreError::IdsExhausted { last })
            }
            _ => Ok(now),
        }
    }

    async fn load(&self) -> StoreResult<Vec<Record>> {
        let Some(raw) = self.store.get(RECORDS_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: RECORDS_KEY.to_string(),
            source,
        })
    }

    async fn save(&self, records: &[Record]) -> StoreResult<()> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Serialization {
            key: RECORDS_KEY.to_string(),
            source,
        })?;
        self.store.set(RECORDS_KEY, &raw).await
    }
}
