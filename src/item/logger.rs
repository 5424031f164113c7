use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use crate::core::item::{ItemWriterResult, Record, RecordKind, RecordWriter};

/// Writes nothing: logs every record and echoes its id. Used for dry runs.
#[derive(Default)]
pub struct LoggerWriter {}

#[async_trait]
impl RecordWriter for LoggerWriter {
    async fn migrate(&self, kinds: &[RecordKind]) -> ItemWriterResult {
        kinds
            .iter()
            .for_each(|kind| info!("Table:{}", kind.table_name()));
        Ok(())
    }

    async fn create(&self, record: Record) -> ItemWriterResult<Uuid> {
        info!("Record:{:?}", record);
        Ok(record.id())
    }
}
