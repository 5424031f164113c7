use std::time::{Duration, Instant};

use log::info;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    BatchError,
    item::fake::{clock_seed, seeded_rng},
};

use super::{
    RECEIPTS_PER_JOB, build_name,
    step::{ReceiptStep, StepExecution, StepStatus},
};

/// Represents the execution of a job.
///
/// A `JobExecution` contains the result of every receipt cycle the job ran,
/// in the order they ran, plus timing information:
/// - When it started
/// - When it ended
/// - How long it took to execute
#[derive(Debug)]
pub struct JobExecution {
    /// Unique identifier of the job instance that produced this execution
    pub id: Uuid,
    /// Human-readable name of the job
    pub name: String,
    /// One entry per receipt cycle, in execution order
    pub steps: Vec<StepExecution>,
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
}

impl JobExecution {
    /// Number of receipts the job wrote.
    pub fn receipt_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.receipt_id.is_some())
            .count()
    }

    pub fn subtype_write_count(&self) -> usize {
        self.steps.iter().map(|step| step.subtype_write_count).sum()
    }

    pub fn line_item_write_count(&self) -> usize {
        self.steps.iter().map(|step| step.line_item_write_count).sum()
    }

    /// Every error collected by the job's cycles.
    pub fn errors(&self) -> impl Iterator<Item = &BatchError> {
        self.steps.iter().flat_map(|step| step.errors.iter())
    }

    pub fn was_stopped(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.status == StepStatus::Stopped)
    }
}

/// Represents an instance of a job.
///
/// A job runs the same [`ReceiptStep`] a fixed number of times, one cycle
/// after the other. Cycle `n + 1` starts only after every worker of cycle
/// `n` has finished.
///
/// # Lifecycle
///
/// A job instance is created through the `JobBuilder` and executed by calling
/// the `run` method.
pub struct JobInstance {
    /// Unique identifier for this job instance
    id: Uuid,
    /// Human-readable name for the job
    name: String,
    /// The receipt-generation cycle run by this job
    step: ReceiptStep,
    /// How many cycles to run
    cycles: usize,
    /// Seed of the job's random generator
    seed: u64,
}

impl JobInstance {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Runs the job by executing its cycles in sequence.
    ///
    /// This method:
    /// 1. Seeds the job's random generator
    /// 2. Executes each cycle in sequence
    /// 3. Stops early when a cycle was cancelled
    /// 4. Returns the execution details of every cycle that ran
    ///
    /// A failed cycle does not stop the job; its errors are kept in the
    /// returned execution.
    pub async fn run(&self, cancel: &CancellationToken) -> JobExecution {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        let mut rng = seeded_rng(self.seed);
        let mut steps = Vec::with_capacity(self.cycles);

        for _ in 0..self.cycles {
            let step_execution = self.step.execute(&mut rng, cancel).await;
            let stopped = step_execution.status == StepStatus::Stopped;
            steps.push(step_execution);

            if stopped {
                break;
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        JobExecution {
            id: self.id,
            name: self.name.clone(),
            steps,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        }
    }
}

/// Builder for creating a job instance.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use fiscal_seeder::core::{job::JobBuilder, step::ReceiptStepBuilder};
/// use fiscal_seeder::item::logger::LoggerWriter;
///
/// let step = ReceiptStepBuilder::new(Arc::new(LoggerWriter::default())).build();
/// let job = JobBuilder::new(step)
///     .name("seed-receipts")
///     .cycles(2)
///     .seed(42)
///     .build();
/// ```
pub struct JobBuilder {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    step: ReceiptStep,
    cycles: usize,
    /// Optional seed (taken from the clock if not specified)
    seed: Option<u64>,
}

impl JobBuilder {
    /// Creates a new `JobBuilder` running `step`.
    pub fn new(step: ReceiptStep) -> Self {
        Self {
            name: None,
            step,
            cycles: RECEIPTS_PER_JOB,
            seed: None,
        }
    }

    /// Sets the name of the job.
    pub fn name(mut self, name: impl Into<String>) -> JobBuilder {
        self.name = Some(name.into());
        self
    }

    /// Sets how many receipt cycles the job runs.
    pub fn cycles(mut self, cycles: usize) -> JobBuilder {
        self.cycles = cycles;
        self
    }

    pub fn seed(mut self, seed: u64) -> JobBuilder {
        self.seed = Some(seed);
        self
    }

    /// Builds and returns a `JobInstance` based on the configured parameters.
    pub fn build(self) -> JobInstance {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            step: self.step,
            cycles: self.cycles,
            seed: self.seed.unwrap_or_else(clock_seed),
        }
    }
}
