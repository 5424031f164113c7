use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use log::{error, info};
use tokio_util::sync::CancellationToken;

use super::{
    DEFAULT_JOBS, ITEM_CONCURRENCY, JOB_CONCURRENCY, RECEIPTS_PER_JOB,
    gate::{AdmissionGate, CompletionBarrier},
    item::{Category, RecordWriter},
    job::{JobBuilder, JobExecution},
    step::{FanOutMode, ReceiptStepBuilder},
};
use crate::{
    BatchError,
    item::fake::{clock_seed, draw_seed, seeded_rng},
};

/// Outcome of a whole batch: every job that ran, plus the errors of jobs
/// that could not report (cancelled before admission, panicked).
#[derive(Debug)]
pub struct BatchReport {
    pub jobs: Vec<JobExecution>,
    pub errors: Vec<BatchError>,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

impl BatchReport {
    pub fn receipt_count(&self) -> usize {
        self.jobs.iter().map(JobExecution::receipt_count).sum()
    }

    pub fn subtype_write_count(&self) -> usize {
        self.jobs.iter().map(JobExecution::subtype_write_count).sum()
    }

    pub fn line_item_write_count(&self) -> usize {
        self.jobs.iter().map(JobExecution::line_item_write_count).sum()
    }

    /// Every error of the batch, job errors first.
    pub fn failures(&self) -> impl Iterator<Item = &BatchError> {
        self.jobs
            .iter()
            .flat_map(JobExecution::errors)
            .chain(self.errors.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn was_cancelled(&self) -> bool {
        self.failures()
            .any(|failure| matches!(failure, BatchError::Cancelled))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jobs, {} receipts, {} subtype records, {} line items written in {:?}; {} failures",
            self.jobs.len(),
            self.receipt_count(),
            self.subtype_write_count(),
            self.line_item_write_count(),
            self.duration,
            self.failure_count()
        )
    }
}

/// Runs a batch of jobs, at most `job_concurrency` of them at once, and waits
/// for all of them.
pub struct BatchLauncher {
    writer: Arc<dyn RecordWriter>,
    jobs: usize,
    job_concurrency: usize,
    cycles_per_job: usize,
    item_concurrency: usize,
    fan_out: FanOutMode,
    mix: Option<Vec<Category>>,
    seed: u64,
}

impl BatchLauncher {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub async fn launch(&self, cancel: &CancellationToken) -> BatchReport {
        let start = Instant::now();

        info!(
            "Launching {} jobs of {} receipts (seed {}, fan-out {:?})",
            self.jobs, self.cycles_per_job, self.seed, self.fan_out
        );

        let gate = AdmissionGate::new("job", self.job_concurrency);
        let mut rng = seeded_rng(self.seed);
        let mut barrier = CompletionBarrier::new();

        for index in 0..self.jobs {
            let mut step = ReceiptStepBuilder::new(Arc::clone(&self.writer))
                .name(format!("receipt-batch-{}", index + 1))
                .item_concurrency(self.item_concurrency)
                .fan_out(self.fan_out);
            if let Some(mix) = &self.mix {
                step = step.mix(mix.clone());
            }

            let job = JobBuilder::new(step.build())
                .name(format!("job-{}", index + 1))
                .cycles(self.cycles_per_job)
                .seed(draw_seed(&mut rng))
                .build();

            let gate = gate.clone();
            let cancel = cancel.clone();
            barrier.spawn(async move {
                let _permit = gate.admit(&cancel).await?;
                Ok::<JobExecution, BatchError>(job.run(&cancel).await)
            });
        }

        let mut jobs = Vec::with_capacity(self.jobs);
        let mut errors = Vec::new();
        for result in barrier.wait().await {
            match result {
                Ok(Ok(job)) => jobs.push(job),
                Ok(Err(err)) | Err(err) => {
                    error!("Job did not run to completion: {}", err);
                    errors.push(err);
                }
            }
        }

        let report = BatchReport {
            jobs,
            errors,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        };

        info!("End of batch: {}", report);
        report
    }
}

pub struct BatchLauncherBuilder {
    writer: Arc<dyn RecordWriter>,
    jobs: usize,
    job_concurrency: usize,
    cycles_per_job: usize,
    item_concurrency: usize,
    fan_out: FanOutMode,
    mix: Option<Vec<Category>>,
    seed: Option<u64>,
}

impl BatchLauncherBuilder {
    pub fn new(writer: Arc<dyn RecordWriter>) -> Self {
        Self {
            writer,
            jobs: DEFAULT_JOBS,
            job_concurrency: JOB_CONCURRENCY,
            cycles_per_job: RECEIPTS_PER_JOB,
            item_concurrency: ITEM_CONCURRENCY,
            fan_out: FanOutMode::default(),
            mix: None,
            seed: None,
        }
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn job_concurrency(mut self, job_concurrency: usize) -> Self {
        self.job_concurrency = job_concurrency;
        self
    }

    pub fn cycles_per_job(mut self, cycles_per_job: usize) -> Self {
        self.cycles_per_job = cycles_per_job;
        self
    }

    pub fn item_concurrency(mut self, item_concurrency: usize) -> Self {
        self.item_concurrency = item_concurrency;
        self
    }

    pub fn fan_out(mut self, fan_out: FanOutMode) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn mix(mut self, mix: Vec<Category>) -> Self {
        self.mix = Some(mix);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> BatchLauncher {
        BatchLauncher {
            writer: self.writer,
            jobs: self.jobs,
            job_concurrency: self.job_concurrency,
            cycles_per_job: self.cycles_per_job,
            item_concurrency: self.item_concurrency,
            fan_out: self.fan_out,
            mix: self.mix,
            seed: self.seed.unwrap_or_else(clock_seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use super::BatchLauncherBuilder;
    use crate::{BatchError, core::item::Category, item::logger::LoggerWriter};

    #[tokio::test]
    async fn default_batch_is_one_job_of_two_receipts() {
        let launcher = BatchLauncherBuilder::new(Arc::new(LoggerWriter::default()))
            .mix(vec![Category::Film])
            .seed(42)
            .build();

        let report = launcher.launch(&CancellationToken::new()).await;

        assert_eq!(report.jobs.len(), 1);
        assert_eq!(report.receipt_count(), 2);
        assert_eq!(report.subtype_write_count(), 2);
        assert_eq!(report.line_item_write_count(), 2);
        assert!(report.is_clean());
        assert_eq!(launcher.seed(), 42);
    }

    #[tokio::test]
    async fn cancelled_batch_reports_cancellation() {
        let launcher = BatchLauncherBuilder::new(Arc::new(LoggerWriter::default()))
            .jobs(3)
            .seed(1)
            .build();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = launcher.launch(&cancel).await;

        assert!(report.jobs.is_empty());
        assert_eq!(report.errors, vec![BatchError::Cancelled; 3]);
        assert!(report.was_cancelled());
        assert!(!report.is_clean());
        assert_eq!(report.receipt_count(), 0);
    }

    #[tokio::test]
    async fn summary_mentions_counts() {
        let launcher = BatchLauncherBuilder::new(Arc::new(LoggerWriter::default()))
            .mix(vec![Category::Toy, Category::Toy])
            .cycles_per_job(1)
            .seed(3)
            .build();

        let summary = launcher.launch(&CancellationToken::new()).await.to_string();

        assert!(summary.starts_with("1 jobs, 1 receipts, 2 subtype records, 2 line items"));
        assert!(summary.ends_with("; 0 failures"));
    }
}
