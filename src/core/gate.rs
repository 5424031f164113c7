use std::{future::Future, sync::Arc};

use log::debug;
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::BatchError;

/// Caps how many workers may be active at once.
///
/// A worker holds the permit returned by [`AdmissionGate::admit`] for as long
/// as it runs; dropping the permit lets the next waiting worker in.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    name: &'static str,
    capacity: usize,
    permits: Arc<Semaphore>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `capacity` workers (at least one).
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Label used in logs and errors (`"job"`, `"item"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum number of workers admitted at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits for a free slot, or gives up with [`BatchError::Cancelled`] once
    /// `cancel` fires.
    pub async fn admit(
        &self,
        cancel: &CancellationToken,
    ) -> Result<OwnedSemaphorePermit, BatchError> {
        if cancel.is_cancelled() {
            return Err(BatchError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BatchError::Cancelled),
            permit = Arc::clone(&self.permits).acquire_owned() => {
                debug!("Admitted through {} gate", self.name);
                permit.map_err(|_| BatchError::Worker(format!("{} gate closed", self.name)))
            }
        }
    }
}

/// Spawns workers and waits for every one of them to finish.
///
/// Results come back in completion order. A worker that panicked or was
/// aborted is reported as [`BatchError::Worker`] instead of its output.
pub struct CompletionBarrier<T> {
    tasks: JoinSet<T>,
}

impl<T> Default for CompletionBarrier<T> {
    fn default() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }
}

impl<T: Send + 'static> CompletionBarrier<T> {
    /// Creates a barrier with no workers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `worker` on the runtime right away.
    ///
    /// The worker is expected to go through an [`AdmissionGate`] itself if
    /// it must be bounded.
    pub fn spawn<F>(&mut self, worker: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.tasks.spawn(worker);
    }

    /// Workers spawned and not yet collected.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no worker is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Blocks until all spawned workers completed.
    pub async fn wait(mut self) -> Vec<Result<T, BatchError>> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            results.push(joined.map_err(|err| BatchError::Worker(err.to_string())));
        }
        results
    }
}
