//! # Generation Job Start Service
//!
//! `POST /api/generation/start` runs a generation batch in the background.
//!
//! ## Workflow:
//!
//! 1.  **Template lookup**: the frozen template is loaded from the
//!     `TemplateStore` before anything is scheduled, so an unknown id is a
//!     plain `404` instead of a failed job.
//!
//! 2.  **Job scheduling**: a `job_id` is registered as `Pending` and returned
//!     immediately. A Tokio task takes over the job's lifecycle.
//!
//! 3.  **Background processing**: the batch runs through
//!     `tokio::task::spawn_blocking`, since rendering and file I/O are
//!     synchronous. Documents go to `<output_dir>/<job_id>/` and are served
//!     under `/files/<job_id>/`.
//!
//! 4.  **Progress reporting**: the worker sends a `GenerationUpdate` after
//!     every row. A listener converts them into `JobStatus::InProgress(percent)`
//!     for the central job controller. The final status is `Completed` with
//!     the batch report, or `Failed` when the batch could not run at all.

use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::generation::Batch;
use common::requests::StartGenerationRequest;
use log::{error, info};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engines::generation::render::PlaceholderRenderer;
use crate::engines::generation::store::DiskDocumentStore;
use crate::engines::generation::{generate_with_progress, GenerationOptions};
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::error_response;
use crate::storage::TemplateStore;

/// Sent from the blocking worker to the async listener.
#[derive(Debug)]
pub enum GenerationUpdate {
    Job(JobStatus),
    Row { done: usize, total: usize },
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (done * 100 / total) as u32
    }
}

/// Handler for `POST /api/generation/start`: `200` with the new
/// `job_id`, or `404` when the template is unknown.
pub(crate) async fn process(
    state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
    store: web::Data<TemplateStore>,
    payload: web::Json<StartGenerationRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let template = match store.get(&req.template_id) {
        Ok((bytes, _)) => bytes,
        Err(e) => return error_response(&e),
    };
    let job_id = schedule_generation_job(state, config, template, req).await;
    HttpResponse::Ok().json(serde_json::json!({ "jobId": job_id }))
}

async fn schedule_generation_job(
    state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
    template: Vec<u8>,
    req: StartGenerationRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state.register(&job_id).await;

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();
    let config = config.get_ref().clone();

    tokio::spawn(async move {
        let (progress_tx, mut progress_rx) = mpsc::channel::<GenerationUpdate>(100);

        let listener_tx = tx.clone();
        let job_id_for_listener = job_id_clone.clone();
        let listener = tokio::spawn(async move {
            while let Some(update) = progress_rx.recv().await {
                let status = match update {
                    GenerationUpdate::Job(status) => status,
                    GenerationUpdate::Row { done, total } => {
                        JobStatus::InProgress(percent(done, total))
                    }
                };
                let _ = listener_tx
                    .send(JobUpdate {
                        job_id: job_id_for_listener.clone(),
                        status,
                    })
                    .await;
            }
        });

        let job_id_for_blocking = job_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            generate_blocking(progress_tx, &job_id_for_blocking, &template, req, &config)
        });

        let status = match handle.await {
            Ok(Ok(batch)) => JobStatus::Completed(Box::new(batch)),
            Ok(Err(e)) => {
                error!("Generation job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e)
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        // Progress must not land after the final status.
        let _ = listener.await;
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone,
                status,
            })
            .await;
    });

    job_id
}

/// Runs one batch synchronously; meant for `spawn_blocking`.
fn generate_blocking(
    tx: mpsc::Sender<GenerationUpdate>,
    job_id: &str,
    template: &[u8],
    req: StartGenerationRequest,
    config: &AppConfig,
) -> Result<Batch, String> {
    let _ = tx.blocking_send(GenerationUpdate::Job(JobStatus::InProgress(0)));

    let renderer = PlaceholderRenderer::new(req.format, &config.fonts_dir);
    let store = DiskDocumentStore::new(config.output_dir.join(job_id))
        .with_url_prefix(&format!("/files/{}", job_id));
    let options = GenerationOptions {
        batch_size: req.batch_size,
        format: req.format,
        file_stem: req.template_id.clone(),
    };

    let batch = generate_with_progress(
        template,
        &req.rows,
        &req.mappings,
        &options,
        &renderer,
        &store,
        &mut |done, total| {
            let _ = tx.blocking_send(GenerationUpdate::Row { done, total });
        },
    )
    .map_err(|e| e.to_string())?;

    info!(
        "Generation job {} done: {}/{} documents",
        job_id, batch.total_generated, batch.total_requested
    );
    Ok(batch)
}
