use uuid::Uuid;

pub mod gate;

pub mod item;

pub mod job;

pub mod launcher;

pub mod step;

/// Jobs allowed to run at the same time in the outer region.
pub const JOB_CONCURRENCY: usize = 1;

/// Item workers allowed to write at the same time for one receipt.
pub const ITEM_CONCURRENCY: usize = 10;

/// Sequential receipt-generation cycles performed by each job.
pub const RECEIPTS_PER_JOB: usize = 2;

/// Jobs launched by a batch unless configured otherwise.
pub const DEFAULT_JOBS: usize = 1;

/// Generates a short random name for unnamed jobs and steps.
///
/// # Returns
///
/// A `String` of eight hexadecimal characters.
fn build_name() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_owned()
}
