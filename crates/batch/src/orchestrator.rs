//! The batch run loop.
//!
//! One orchestrator drives at most one batch at a time: categories in
//! order, units within a category in order, one generation call per
//! unit. A unit failure is logged and skipped, never fatal to the run.
//! Cancellation is cooperative -- the token is only observed between
//! units, so a unit already in flight (including its polling) always
//! finishes before the run stops.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use easel_backend::client::GenerationClient;
use easel_backend::request::GenerationRequest;
use easel_core::limits::ModelLimits;
use easel_core::prompt::assemble_prompt;
use easel_core::types::{BatchProgress, GeneratedImage, GenerationResult, ModelInfo};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::events::BatchEvent;
use crate::progress::{BatchSummary, ProgressPublisher, ProgressReceiver};

/// Broadcast capacity for batch events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Everything one batch run needs.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Categories to produce, in order.
    pub categories: Vec<String>,
    /// Category -> specific prompt text. Categories without an entry
    /// run with an empty specific prompt.
    pub category_prompts: HashMap<String, String>,
    pub common_subject: String,
    pub global_style: String,
    pub negative_prompt: String,
    pub aspect_ratio: String,
    pub resolution: String,
    /// Requested images per category; clamped to the model's cap when
    /// the plan is expanded into units.
    pub count_per_category: u32,
    pub model: ModelInfo,
}

/// Errors that reject a run before any unit executes.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A batch is already running on this orchestrator.
    #[error("A batch is already running")]
    AlreadyRunning,

    /// The plan selects no categories.
    #[error("No category selected")]
    NoCategories,
}

/// Drives batch runs and publishes their progress and events.
pub struct BatchOrchestrator {
    client: GenerationClient,
    progress: ProgressPublisher,
    events: broadcast::Sender<BatchEvent>,
    /// Run guard. The progress status mirrors it for observers, but the
    /// guard itself must be atomic so that a second `run` call arriving
    /// from another task is rejected rather than interleaved.
    running: AtomicBool,
}

impl BatchOrchestrator {
    /// New orchestrator around a generation client.
    ///
    /// Returns the orchestrator plus the progress receiver; further
    /// receivers can be obtained by cloning it.
    pub fn new(client: GenerationClient) -> (Self, ProgressReceiver) {
        let (progress, progress_rx) = ProgressPublisher::new();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        (
            Self {
                client,
                progress,
                events,
                running: AtomicBool::new(false),
            },
            progress_rx,
        )
    }

    /// Subscribe to batch events.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.events.subscribe()
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> BatchProgress {
        self.progress.snapshot()
    }

    /// Run one batch to completion.
    ///
    /// Returns the outcome counts and the images collected across all
    /// units. Unit failures never fail the run; whatever happened, the
    /// progress status is back at idle when this returns.
    pub async fn run(
        &self,
        plan: &BatchPlan,
        limits: &ModelLimits,
        cancel: &CancellationToken,
    ) -> Result<(BatchSummary, Vec<GeneratedImage>), BatchError> {
        if plan.categories.is_empty() {
            return Err(BatchError::NoCategories);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(BatchError::AlreadyRunning);
        }

        let units_per_category =
            limits.clamp_count(&plan.model.model_name, plan.count_per_category);
        let total = plan.categories.len() as u32 * units_per_category;

        self.progress.start(total);
        self.emit(BatchEvent::BatchStarted {
            total,
            model: plan.model.name.clone(),
        });
        tracing::info!(
            model = %plan.model.model_name,
            service = plan.model.provider().slug(),
            total,
            units_per_category,
            "Batch started",
        );

        let mut summary = BatchSummary::default();
        let mut images = Vec::new();
        let mut current = 0u32;

        'categories: for category in &plan.categories {
            for unit in 1..=units_per_category {
                if cancel.is_cancelled() {
                    summary.cancelled = true;
                    self.emit(BatchEvent::BatchCancelled {
                        completed: current,
                        total,
                    });
                    tracing::info!(completed = current, total, "Batch cancelled");
                    break 'categories;
                }

                current += 1;
                self.progress.unit(category, current);
                self.emit(BatchEvent::UnitStarted {
                    category: category.clone(),
                    current,
                    total,
                });

                let specific = plan
                    .category_prompts
                    .get(category)
                    .map(String::as_str)
                    .unwrap_or("");
                let prompt = assemble_prompt(
                    category,
                    specific,
                    &plan.common_subject,
                    &plan.global_style,
                    &plan.aspect_ratio,
                    &plan.resolution,
                );
                let request = GenerationRequest::single(
                    &plan.model.model_name,
                    prompt,
                    category,
                    &plan.negative_prompt,
                    &plan.aspect_ratio,
                    &plan.resolution,
                );

                match self.client.generate(&request).await {
                    Ok(Some(result)) => {
                        self.collect(result, category, unit, units_per_category, &mut summary, &mut images);
                    }
                    Ok(None) => {
                        self.emit(BatchEvent::UnitEmpty {
                            category: category.clone(),
                        });
                        tracing::debug!(category = %category, unit, "Unit produced no images");
                    }
                    Err(e) => {
                        summary.failed += 1;
                        self.emit(BatchEvent::UnitFailed {
                            category: category.clone(),
                            error: e.to_string(),
                        });
                        tracing::error!(category = %category, unit, error = %e, "Unit failed");
                    }
                }
            }
        }

        summary.attempted = current;
        self.progress.finish();
        self.emit(BatchEvent::BatchFinished {
            completed: current,
            produced: summary.images,
            failed: summary.failed,
        });
        tracing::info!(
            completed = current,
            produced = summary.images,
            failed = summary.failed,
            "Batch finished",
        );

        self.running.store(false, Ordering::SeqCst);
        Ok((summary, images))
    }

    // ---- private helpers ----

    /// Fold one successful unit into the summary and image collection.
    fn collect(
        &self,
        result: GenerationResult,
        category: &str,
        unit: u32,
        units_per_category: u32,
        summary: &mut BatchSummary,
        images: &mut Vec<GeneratedImage>,
    ) {
        let GenerationResult { urls, prompt } = result;
        let produced = urls.len();
        summary.produced_units += 1;
        summary.images += produced;

        let timestamp = chrono::Utc::now();
        for url in urls {
            images.push(GeneratedImage {
                id: uuid::Uuid::new_v4(),
                url,
                category: category.to_string(),
                prompt: prompt.clone(),
                timestamp,
            });
        }

        self.emit(BatchEvent::UnitCompleted {
            category: category.to_string(),
            produced,
            unit,
            units_per_category,
        });
        tracing::debug!(category = %category, unit, produced, "Unit completed");
    }

    /// Send an event, ignoring the no-subscribers case.
    fn emit(&self, event: BatchEvent) {
        let _ = self.events.send(event);
    }
}
