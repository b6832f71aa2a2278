//! Recording session endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::{AcceptedRecording, RecordingCommand};
use crate::domain::foundation::{RecordingSessionId, StageRunId};
use crate::domain::recording::{
    CaptureOptions, RecordingHandoff, RecordingPhase, RecordingSession, RecordingSource,
};

use super::error::{parse_id, ApiError};
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecordingView {
    pub id: RecordingSessionId,
    pub phase: RecordingPhase,
    pub source: RecordingSource,
    pub source_label: &'static str,
    pub options: CaptureOptions,
    pub elapsed_seconds: u64,
    /// `MM:SS`
    pub elapsed: String,
}

impl From<&RecordingSession> for RecordingView {
    fn from(session: &RecordingSession) -> Self {
        Self {
            id: session.id(),
            phase: session.phase(),
            source: session.source(),
            source_label: session.source().label(),
            options: session.options(),
            elapsed_seconds: session.elapsed_seconds(),
            elapsed: session.formatted_elapsed(),
        }
    }
}

/// Body of `PATCH /api/recordings/:id/options`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigureRecordingRequest {
    #[serde(default)]
    pub source: Option<RecordingSource>,
    #[serde(default)]
    pub options: Option<CaptureOptions>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedView {
    pub handoff: RecordingHandoff,
    pub run_id: StageRunId,
}

impl From<AcceptedRecording> for AcceptedView {
    fn from(accepted: AcceptedRecording) -> Self {
        Self {
            handoff: accepted.handoff,
            run_id: accepted.run_id,
        }
    }
}

pub fn recording_routes() -> Router<AppState> {
    Router::new()
        .route("/api/recordings", post(create_recording))
        .route(
            "/api/recordings/:id",
            get(get_recording).delete(close_recording),
        )
        .route("/api/recordings/:id/options", patch(configure_recording))
        .route("/api/recordings/:id/start", post(start))
        .route("/api/recordings/:id/pause", post(pause))
        .route("/api/recordings/:id/resume", post(resume))
        .route("/api/recordings/:id/toggle-pause", post(toggle_pause))
        .route("/api/recordings/:id/stop", post(stop))
        .route("/api/recordings/:id/discard", post(discard))
        .route("/api/recordings/:id/accept", post(accept))
}

/// POST /api/recordings
async fn create_recording(State(state): State<AppState>) -> (StatusCode, Json<RecordingView>) {
    let session = state.recordings.create().await;
    (StatusCode::CREATED, Json(RecordingView::from(&session)))
}

/// GET /api/recordings/:id
async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordingView>, ApiError> {
    let id = parse_id(&id, "recording_id")?;
    let session = state.recordings.get(id).await?;
    Ok(Json(RecordingView::from(&session)))
}

/// DELETE /api/recordings/:id
///
/// Drops the session and stops its clock, whatever phase it is in.
async fn close_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "recording_id")?;
    state.recordings.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/recordings/:id/options
async fn configure_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ConfigureRecordingRequest>,
) -> Result<Json<RecordingView>, ApiError> {
    let id = parse_id(&id, "recording_id")?;
    let session = state
        .recordings
        .configure(id, request.source, request.options)
        .await?;
    Ok(Json(RecordingView::from(&session)))
}

async fn run_command(
    state: &AppState,
    id: &str,
    command: RecordingCommand,
) -> Result<Json<RecordingView>, ApiError> {
    let id = parse_id(id, "recording_id")?;
    let session = state.recordings.apply(id, command).await?;
    Ok(Json(RecordingView::from(&session)))
}

async fn start(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::Start).await
}

async fn pause(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::Pause).await
}

async fn resume(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::Resume).await
}

async fn toggle_pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::TogglePause).await
}

async fn stop(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::Stop).await
}

async fn discard(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<RecordingView>, ApiError> {
    run_command(&state, &id, RecordingCommand::Discard).await
}

/// POST /api/recordings/:id/accept
///
/// Closes the session and starts processing; the new run id is returned.
async fn accept(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<AcceptedView>), ApiError> {
    let id = parse_id(&id, "recording_id")?;
    let accepted = state.recordings.accept(id).await?;
    Ok((StatusCode::CREATED, Json(AcceptedView::from(accepted))))
}
