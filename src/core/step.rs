use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use clap::ValueEnum;
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{
    ITEM_CONCURRENCY, build_name,
    gate::{AdmissionGate, CompletionBarrier},
    item::{Category, Record, RecordWriter},
};
use crate::{
    BatchError,
    item::{
        assembler::new_line_item,
        fake::{
            SeedRng, draw_seed,
            planner::{ItemPlan, draw_mix_size, plan_items, plan_mix},
            seeded_rng,
            subtype_factory::{new_receipt, new_subtype},
        },
    },
};

/// How the planned mix of a receipt is spread over workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FanOutMode {
    /// One worker per planned item.
    #[default]
    PerItem,
    /// One worker per planned item, each writing the whole mix. Writes
    /// `n * n` items for a mix of `n`; kept to reproduce historical volumes.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    /// Every worker finished but some records were not written.
    CompletedWithErrors,
    /// The receipt itself could not be written.
    Failed,
    /// Cancelled before every worker could run.
    Stopped,
}

#[derive(Debug)]
pub struct StepExecution {
    pub id: Uuid,
    pub name: String,
    pub status: StepStatus,
    pub receipt_id: Option<Uuid>,
    pub planned_count: usize,
    pub subtype_write_count: usize,
    pub line_item_write_count: usize,
    pub errors: Vec<BatchError>,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

impl StepExecution {
    fn new(name: &str) -> Self {
        let start = Instant::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            status: StepStatus::Completed,
            receipt_id: None,
            planned_count: 0,
            subtype_write_count: 0,
            line_item_write_count: 0,
            errors: Vec::new(),
            start,
            end: start,
            duration: Duration::ZERO,
        }
    }

    fn finish(mut self, status: StepStatus) -> Self {
        self.status = status;
        self.end = Instant::now();
        self.duration = self.start.elapsed();
        self
    }
}

#[derive(Debug, Default)]
struct WorkerOutcome {
    subtype_writes: usize,
    line_item_writes: usize,
    errors: Vec<BatchError>,
    cancelled: bool,
}

/// One receipt-generation cycle: writes a receipt, plans its items and fans
/// the item writes out over workers bounded by an [`AdmissionGate`].
#[derive(Clone)]
pub struct ReceiptStep {
    name: String,
    writer: Arc<dyn RecordWriter>,
    item_concurrency: usize,
    fan_out: FanOutMode,
    mix: Option<Vec<Category>>,
}

impl ReceiptStep {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn fan_out(&self) -> FanOutMode {
        self.fan_out
    }

    /// Runs one cycle. Returns once every worker of the cycle has finished.
    ///
    /// Write failures do not stop sibling workers; they are collected into
    /// the returned [`StepExecution`]. A subtype record that fails to write
    /// skips its line item.
    pub async fn execute(&self, rng: &mut SeedRng, cancel: &CancellationToken) -> StepExecution {
        let mut execution = StepExecution::new(&self.name);

        info!("Start of step: {}, id: {}", execution.name, execution.id);

        if cancel.is_cancelled() {
            return self.stopped(execution);
        }

        let receipt = new_receipt(rng);
        let receipt_id = match self.writer.create(Record::Receipt(receipt)).await {
            Ok(id) => id,
            Err(err) => {
                error!("Unable to write receipt: {}", err);
                execution.errors.push(err);
                return execution.finish(StepStatus::Failed);
            }
        };

        let mix = match &self.mix {
            Some(mix) => mix.clone(),
            None => {
                let size = draw_mix_size(rng);
                plan_mix(rng, size)
            }
        };

        let gate = AdmissionGate::new("item", self.item_concurrency);
        let mut barrier = CompletionBarrier::new();

        match self.fan_out {
            FanOutMode::PerItem => {
                for plan in plan_items(rng, &mix) {
                    barrier.spawn(write_items(
                        Arc::clone(&self.writer),
                        gate.clone(),
                        cancel.clone(),
                        receipt_id,
                        vec![plan],
                    ));
                }
            }
            FanOutMode::Legacy => {
                for _ in 0..mix.len() {
                    let plans = plan_items(&mut seeded_rng(draw_seed(rng)), &mix);
                    barrier.spawn(write_items(
                        Arc::clone(&self.writer),
                        gate.clone(),
                        cancel.clone(),
                        receipt_id,
                        plans,
                    ));
                }
            }
        }

        debug!(
            "Receipt {} fanned out to {} workers ({} admitted at once)",
            receipt_id,
            barrier.len(),
            gate.capacity()
        );

        execution.receipt_id = Some(receipt_id);
        execution.planned_count = mix.len();

        let mut cancelled = false;
        for result in barrier.wait().await {
            match result {
                Ok(outcome) => {
                    execution.subtype_write_count += outcome.subtype_writes;
                    execution.line_item_write_count += outcome.line_item_writes;
                    execution.errors.extend(outcome.errors);
                    cancelled |= outcome.cancelled;
                }
                Err(err) => {
                    error!("Item worker of receipt {} failed: {}", receipt_id, err);
                    execution.errors.push(err);
                }
            }
        }

        if cancelled {
            return self.stopped(execution);
        }

        let status = if execution.errors.is_empty() {
            StepStatus::Completed
        } else {
            StepStatus::CompletedWithErrors
        };

        info!(
            "End of step: {}, id: {}, receipt: {}, items: {}, errors: {}",
            execution.name,
            execution.id,
            receipt_id,
            execution.line_item_write_count,
            execution.errors.len()
        );

        execution.finish(status)
    }

    fn stopped(&self, mut execution: StepExecution) -> StepExecution {
        warn!("Step {} stopped by cancellation", execution.name);
        execution.errors.push(BatchError::Cancelled);
        execution.finish(StepStatus::Stopped)
    }
}

/// Body of one fan-out worker: for every plan, write the subtype record then
/// the line item pointing at it.
async fn write_items(
    writer: Arc<dyn RecordWriter>,
    gate: AdmissionGate,
    cancel: CancellationToken,
    receipt_id: Uuid,
    plans: Vec<ItemPlan>,
) -> WorkerOutcome {
    let mut outcome = WorkerOutcome::default();

    let _permit = match gate.admit(&cancel).await {
        Ok(permit) => permit,
        Err(BatchError::Cancelled) => {
            outcome.cancelled = true;
            return outcome;
        }
        Err(err) => {
            outcome.errors.push(err);
            return outcome;
        }
    };

    for plan in plans {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let mut rng = seeded_rng(plan.seed);
        let subtype = new_subtype(&mut rng, plan.category, plan.price);

        match writer.create(Record::Subtype(subtype.clone())).await {
            Ok(id) => {
                debug!("Wrote {} {}", plan.category, id);
                outcome.subtype_writes += 1;
            }
            Err(err) => {
                warn!("Skipping line item of {}: {}", plan.category, err);
                outcome.errors.push(err);
                continue;
            }
        }

        let line_item = new_line_item(&mut rng, plan.price, plan.amount, receipt_id, &subtype);
        match writer.create(Record::LineItem(line_item)).await {
            Ok(_) => outcome.line_item_writes += 1,
            Err(err) => {
                warn!("Line item of receipt {} not written: {}", receipt_id, err);
                outcome.errors.push(err);
            }
        }
    }

    outcome
}

pub struct ReceiptStepBuilder {
    name: Option<String>,
    writer: Arc<dyn RecordWriter>,
    item_concurrency: usize,
    fan_out: FanOutMode,
    mix: Option<Vec<Category>>,
}

impl ReceiptStepBuilder {
    pub fn new(writer: Arc<dyn RecordWriter>) -> Self {
        Self {
            name: None,
            writer,
            item_concurrency: ITEM_CONCURRENCY,
            fan_out: FanOutMode::default(),
            mix: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

    /// Uses `mix` for every receipt instead of a random plan.
    pub fn mix(mut self, mix: Vec<Category>) -> Self {
        self.mix = Some(mix);
        self
    }

    pub fn build(self) -> ReceiptStep {
        ReceiptStep {
            name: self.name.unwrap_or_else(build_name),
            writer: self.writer,
            item_concurrency: self.item_concurrency,
            fan_out: self.fan_out,
            mix: self.mix,
        }
    }
}
