//! Mock version of the record store.
use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use fiscal_seeder::{
    BatchError,
    core::item::{Record, RecordKind, RecordWriter},
};

mock! {
    pub Writer {}
    #[async_trait]
    impl RecordWriter for Writer {
        async fn migrate(&self, kinds: &[RecordKind]) -> Result<(), BatchError>;
        async fn create(&self, record: Record) -> Result<Uuid, BatchError>;
    }
}
