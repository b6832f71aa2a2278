//! Processing run endpoints, including the live progress stream.

use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;

use crate::domain::foundation::StageRunId;
use crate::domain::processing::{default_pipeline, StageDescriptor, StageRun};

use super::error::{parse_id, ApiError};
use super::state::AppState;

/// Body of `POST /api/processing/runs`. Without `stages` the default
/// five-stage pipeline is used.
#[derive(Debug, Default, Deserialize)]
pub struct StartRunRequest {
    #[serde(default)]
    pub stages: Option<Vec<StageDescriptor>>,
}

pub fn processing_routes() -> Router<AppState> {
    Router::new()
        .route("/api/processing/runs", post(start_run))
        .route("/api/processing/runs/:id", get(get_run).delete(cancel_run))
        .route("/api/processing/runs/:id/stream", get(stream_run))
}

/// POST /api/processing/runs
async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<StartRunRequest>,
) -> Result<(StatusCode, Json<StageRun>), ApiError> {
    let stages = request.stages.unwrap_or_else(default_pipeline);
    let handle = state.runner.start(stages)?;
    let snapshot = handle.snapshot();
    state.runs.insert(handle).await;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/processing/runs/:id
async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StageRun>, ApiError> {
    let id: StageRunId = parse_id(&id, "run_id")?;
    Ok(Json(state.runs.snapshot(id).await?))
}

/// DELETE /api/processing/runs/:id
///
/// Stops the run and returns its state at the moment it was stopped.
async fn cancel_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StageRun>, ApiError> {
    let id: StageRunId = parse_id(&id, "run_id")?;
    Ok(Json(state.runs.cancel(id).await?))
}

/// GET /api/processing/runs/:id/stream
///
/// Sends the run as JSON on every change and closes once it is no
/// longer active.
async fn stream_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let id: StageRunId = parse_id(&id, "run_id")?;
    let updates = state.runs.subscribe(id).await?;
    Ok(ws.on_upgrade(move |socket| {
        let (sender, receiver) = socket.split();
        forward_run(sender, receiver, updates)
    }))
}

/// Pushes run snapshots into `sender` until the run stops being active or
/// the peer goes away. A close frame follows the last snapshot.
async fn forward_run<S, R, E>(mut sender: S, mut receiver: R, mut updates: watch::Receiver<StageRun>)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let mut snapshot = updates.borrow_and_update().clone();

    'stream: loop {
        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize stage run");
                break;
            }
        };
        if sender.send(Message::Text(json)).await.is_err() {
            return;
        }
        if !snapshot.phase().is_active() {
            break;
        }

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break 'stream;
                    }
                    snapshot = updates.borrow_and_update().clone();
                    continue 'stream;
                }
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                    // Pings are answered by axum; anything else is ignored.
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    let _ = sender.send(Message::Close(None)).await;
}
