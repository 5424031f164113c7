//! In-memory record store keeping every write in order.
use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use uuid::Uuid;

use fiscal_seeder::{
    BatchError,
    core::item::{ItemWriterResult, Record, RecordKind, RecordWriter},
    entity::{line_item, receipt},
};

#[derive(Default)]
pub struct RecordingWriter {
    records: Mutex<Vec<Record>>,
    migrated: Mutex<Vec<RecordKind>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    fail_kind: Option<RecordKind>,
    delay: Option<Duration>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write of `kind` fails.
    pub fn failing_on(kind: RecordKind) -> Self {
        Self {
            fail_kind: Some(kind),
            ..Self::default()
        }
    }

    /// Every write takes at least `delay`, so concurrent writes overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn migrated(&self) -> Vec<RecordKind> {
        self.migrated.lock().unwrap().clone()
    }

    pub fn receipts(&self) -> Vec<receipt::Model> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::Receipt(model) => Some(model),
                _ => None,
            })
            .collect()
    }

    pub fn line_items(&self) -> Vec<line_item::Model> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::LineItem(model) => Some(model),
                _ => None,
            })
            .collect()
    }

    pub fn subtype_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|record| matches!(record, Record::Subtype(_)))
            .count()
    }

    /// Highest number of writes that were in progress at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordWriter for RecordingWriter {
    async fn migrate(&self, kinds: &[RecordKind]) -> ItemWriterResult {
        self.migrated.lock().unwrap().extend_from_slice(kinds);
        Ok(())
    }

    async fn create(&self, record: Record) -> ItemWriterResult<Uuid> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let kind = record.kind();
        let id = record.id();
        let result = if self.fail_kind == Some(kind) {
            Err(BatchError::ItemWriter {
                kind,
                id,
                message: "injected failure".to_string(),
            })
        } else {
            self.records.lock().unwrap().push(record);
            Ok(id)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
