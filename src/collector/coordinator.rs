//! Bounded-concurrency plan collection.
//!
//! One task is spawned per artifact. A semaphore caps how many converters run
//! at once and every task reports through a single channel. The consumer
//! drains exactly as many results as there are artifacts; the first failure
//! ends the run and dropping the task set aborts the remaining workers.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::analysis::ConsolidatedResult;
use crate::error::{CollectError, ReporterError, Result};

use super::extractor::PlanExtractor;
use super::plan::TerraformPlan;

/// Result delivered by one worker.
type Delivery = (PathBuf, Result<TerraformPlan>);

/// Runs an extractor over many artifacts and consolidates the results.
pub struct PlanCollector {
    /// Extractor shared by all workers.
    extractor: Arc<dyn PlanExtractor>,
    /// Maximum number of concurrent extractions.
    parallelism: usize,
}

/// Available parallelism reported by the host, at least 1.
#[must_use]
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

impl PlanCollector {
    /// Creates a collector bounded by the host's available parallelism.
    #[must_use]
    pub fn new(extractor: Arc<dyn PlanExtractor>) -> Self {
        Self {
            extractor,
            parallelism: default_parallelism(),
        }
    }

    /// Overrides the concurrency bound. Zero is treated as one.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Concurrency bound in use.
    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Extracts every artifact and consolidates the plans in arrival order.
    ///
    /// # Errors
    ///
    /// Returns the first extraction error, or [`CollectError::ChannelClosed`]
    /// if workers vanish before delivering every result.
    pub async fn collect(&self, artifacts: Vec<PathBuf>) -> Result<ConsolidatedResult> {
        let expected = artifacts.len();
        let mut result = ConsolidatedResult::new();

        if expected == 0 {
            debug!("No plan files to collect");
            return Ok(result);
        }

        info!(plans = expected, parallelism = self.parallelism, "Collecting plans");

        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let (tx, mut rx) = mpsc::channel::<Delivery>(self.parallelism);
        let mut workers = JoinSet::new();

        for artifact in artifacts {
            let tx = tx.clone();
            let semaphore = Arc::clone(&semaphore);
            let extractor = Arc::clone(&self.extractor);

            workers.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(permit) => {
                        let outcome = extractor.extract(&artifact).await;
                        drop(permit);
                        outcome
                    }
                    Err(e) => Err(ReporterError::internal(format!("Extraction semaphore closed: {e}"))),
                };
                // The receiver only goes away when the run is already failing.
                let _ = tx.send((artifact, outcome)).await;
            });
        }
        drop(tx);

        let mut received = 0;
        while received < expected {
            let Some((artifact, outcome)) = rx.recv().await else {
                return Err(CollectError::ChannelClosed { expected, received }.into());
            };
            received += 1;

            let plan = outcome?;
            debug!(
                plan_file = %artifact.display(),
                changes = plan.resource_changes.len(),
                received,
                expected,
                "Plan consolidated"
            );
            result.absorb(&plan);
        }

        workers.shutdown().await;

        info!(
            plans = result.plans,
            created = result.created.len(),
            updated = result.updated.len(),
            deleted = result.deleted.len(),
            unchanged = result.unchanged.len(),
            skipped = result.skipped,
            "Plans consolidated"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for PlanCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCollector")
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}
