//! `easel-console` -- batch image-production console.
//!
//! Runs one batch generation against the Easel backend: fetches the
//! model catalog, per-model request limits, global prompt defaults and
//! category prompts, then drives the sequential batch loop and logs
//! per-unit outcomes. Ctrl-C requests a cooperative stop; the unit in
//! flight (including its polling) finishes first.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default      | Description                                |
//! |-------------------------|----------|--------------|--------------------------------------------|
//! | `EASEL_BACKEND_URL`     | yes      | --           | Backend base URL, e.g. `http://host:8000`  |
//! | `EASEL_CATEGORIES`      | yes      | --           | Comma-separated category names             |
//! | `EASEL_MODEL`           | no       | `wan2.6-t2i` | Internal model name                        |
//! | `EASEL_COUNT`           | no       | `1`          | Requested images per category              |
//! | `EASEL_ASPECT_RATIO`    | no       | `16:9`       | Aspect-ratio token, e.g. `1:1`             |
//! | `EASEL_RESOLUTION`      | no       | `1080p`      | Resolution label, e.g. `2K`                |
//! | `EASEL_USER_ID`         | no       | `-1`         | Identifier used for session correlation    |
//! | `EASEL_COMMON_SUBJECT`  | no       | from backend | Overrides the shared base subject          |
//! | `EASEL_GLOBAL_STYLE`    | no       | from backend | Overrides the global style text            |
//! | `EASEL_NEGATIVE_PROMPT` | no       | from backend | Overrides the negative prompt              |
//! | `EASEL_TRANSLATE`       | no       | off          | `1` translates prompt fields before the run |

use easel_backend::api::BackendApi;
use easel_backend::client::GenerationClient;
use easel_batch::events::BatchEvent;
use easel_batch::orchestrator::{BatchOrchestrator, BatchPlan};
use easel_core::limits::ModelLimits;
use easel_core::session::SessionIdentity;
use easel_core::types::{validate_aspect_ratio, validate_resolution, ModelInfo};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Model used when `EASEL_MODEL` is not set.
const DEFAULT_MODEL: &str = "wan2.6-t2i";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "easel_console=info,easel_batch=info,easel_backend=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend_url = std::env::var("EASEL_BACKEND_URL").unwrap_or_else(|_| {
        tracing::error!("EASEL_BACKEND_URL environment variable is required");
        std::process::exit(1);
    });

    let categories: Vec<String> = std::env::var("EASEL_CATEGORIES")
        .unwrap_or_else(|_| {
            tracing::error!("EASEL_CATEGORIES environment variable is required");
            std::process::exit(1);
        })
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();

    let model_name =
        std::env::var("EASEL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let count: u32 = std::env::var("EASEL_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let aspect_ratio =
        std::env::var("EASEL_ASPECT_RATIO").unwrap_or_else(|_| "16:9".to_string());
    let resolution =
        std::env::var("EASEL_RESOLUTION").unwrap_or_else(|_| "1080p".to_string());
    let user_id = std::env::var("EASEL_USER_ID").unwrap_or_else(|_| "-1".to_string());
    let translate = std::env::var("EASEL_TRANSLATE").is_ok_and(|v| v == "1");

    validate_aspect_ratio(&aspect_ratio)?;
    validate_resolution(&resolution)?;

    let api = BackendApi::new(&backend_url);

    let model = resolve_model(&api, &model_name).await;
    let limits = match api.model_limits().await {
        Ok(limits) => limits,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch model limits, using family defaults");
            ModelLimits::default()
        }
    };

    let global = match api.global_config().await {
        Ok(global) => global,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch global config, using empty defaults");
            Default::default()
        }
    };
    let mut common_subject =
        std::env::var("EASEL_COMMON_SUBJECT").unwrap_or(global.common_subject);
    let global_style = std::env::var("EASEL_GLOBAL_STYLE").unwrap_or(global.global_style);
    let negative_prompt =
        std::env::var("EASEL_NEGATIVE_PROMPT").unwrap_or(global.negative_prompt);

    let mut category_prompts = match api.prompts().await {
        Ok(prompts) => prompts,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch category prompts, continuing without");
            Default::default()
        }
    };

    match api.categories().await {
        Ok(known) => {
            for category in &categories {
                if !known.contains(category) {
                    tracing::warn!(category = %category, "Category not in backend catalog");
                }
            }
        }
        Err(e) => tracing::debug!(error = %e, "Failed to fetch category list"),
    }

    let client = GenerationClient::new(api, SessionIdentity::new(user_id));

    if translate {
        common_subject = client.translate_or_original(&common_subject).await;
        for category in &categories {
            if let Some(prompt) = category_prompts.get(category).cloned() {
                let translated = client.translate_or_original(&prompt).await;
                category_prompts.insert(category.clone(), translated);
            }
        }
    }

    tracing::info!(
        model = %model.model_name,
        categories = categories.len(),
        count,
        aspect_ratio = %aspect_ratio,
        resolution = %resolution,
        "Starting easel-console",
    );

    let plan = BatchPlan {
        categories,
        category_prompts,
        common_subject,
        global_style,
        negative_prompt,
        aspect_ratio,
        resolution,
        count_per_category: count,
        model,
    };

    let (orchestrator, _progress) = BatchOrchestrator::new(client);

    let mut events = orchestrator.subscribe();
    let log_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            log_event(event);
        }
    });

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Stop requested, finishing the unit in flight");
                cancel.cancel();
            }
        });
    }

    let (summary, images) = orchestrator.run(&plan, &limits, &cancel).await?;

    for image in &images {
        tracing::info!(category = %image.category, url = %image.url, "Image produced");
    }
    tracing::info!(
        attempted = summary.attempted,
        produced = summary.images,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "Run complete",
    );

    drop(orchestrator);
    let _ = log_task.await;
    Ok(())
}

/// Resolve the selected model against the backend catalog, falling back
/// to a minimal entry when the catalog is unavailable or the model is
/// not listed.
async fn resolve_model(api: &BackendApi, model_name: &str) -> ModelInfo {
    match api.models().await {
        Ok(models) => models
            .into_iter()
            .find(|m| m.model_name == model_name)
            .map(|m| ModelInfo {
                name: if m.name.is_empty() {
                    m.model_name.clone()
                } else {
                    m.name
                },
                model_name: m.model_name,
                description: m.description,
            })
            .unwrap_or_else(|| {
                tracing::warn!(model = %model_name, "Model not in backend catalog");
                ModelInfo::from_model_name(model_name)
            }),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch model catalog");
            ModelInfo::from_model_name(model_name)
        }
    }
}

/// Render one batch event as a production log line.
fn log_event(event: BatchEvent) {
    match event {
        BatchEvent::UnitStarted {
            category,
            current,
            total,
        } => {
            tracing::info!(category = %category, current, total, "Generating");
        }
        BatchEvent::UnitCompleted {
            category,
            produced,
            unit,
            units_per_category,
        } => {
            tracing::info!(
                category = %category,
                unit,
                units_per_category,
                produced,
                "Unit completed",
            );
        }
        BatchEvent::UnitEmpty { category } => {
            tracing::info!(category = %category, "No image produced");
        }
        BatchEvent::UnitFailed { category, error } => {
            tracing::warn!(category = %category, error = %error, "Generation failed");
        }
        // Batch start/finish transitions are logged by the orchestrator.
        BatchEvent::BatchStarted { .. }
        | BatchEvent::BatchCancelled { .. }
        | BatchEvent::BatchFinished { .. } => {}
    }
}
