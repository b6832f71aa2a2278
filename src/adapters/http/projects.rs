//! Dashboard and editor read endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Percentage, ProjectId};
use crate::domain::project::{
    format_playback, DashboardStat, GuideDocument, GuideStep, Project, ProjectFilter, ProjectStatus,
};

use super::error::{parse_id, ApiError};
use super::state::AppState;

/// `?search=&status=`; `status=all` or an empty value means any status.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ProjectQuery {
    pub fn into_filter(self) -> Result<ProjectFilter, DomainError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some("recording") => Some(ProjectStatus::Recording),
            Some("processing") => Some(ProjectStatus::Processing),
            Some("ready") => Some(ProjectStatus::Ready),
            Some("published") => Some(ProjectStatus::Published),
            Some(other) => {
                return Err(DomainError::validation(
                    "status",
                    format!("Unknown project status: {}", other),
                ))
            }
        };
        Ok(ProjectFilter {
            search: self.search.unwrap_or_default(),
            status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub status_label: &'static str,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        let status_label = project.status.label();
        Self { project, status_label }
    }
}

/// `?step=N` seeks the playhead to that step.
#[derive(Debug, Default, Deserialize)]
pub struct GuideQuery {
    #[serde(default)]
    pub step: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GuideView {
    pub steps: Vec<GuideStep>,
    pub duration_secs: u64,
    pub duration: String,
    pub selected_step: Option<u32>,
    pub current_time_secs: u64,
    pub playhead: Percentage,
    pub position: String,
}

impl From<&GuideDocument> for GuideView {
    fn from(guide: &GuideDocument) -> Self {
        Self {
            steps: guide.steps().to_vec(),
            duration_secs: guide.duration_secs(),
            duration: format_playback(guide.duration_secs()),
            selected_step: guide.selected_step().map(|s| s.number),
            current_time_secs: guide.current_time_secs(),
            playhead: guide.playhead(),
            position: guide.position_label(),
        }
    }
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id", get(get_project))
        .route("/api/projects/:id/guide", get(get_guide))
        .route("/api/dashboard/stats", get(dashboard_stats))
}

/// GET /api/projects
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let filter = query.into_filter()?;
    let projects = state.catalog.list(&filter).await?;
    Ok(Json(projects.into_iter().map(ProjectView::from).collect()))
}

/// GET /api/projects/:id
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectView>, ApiError> {
    let id: ProjectId = parse_id(&id, "project_id")?;
    let project = state
        .catalog
        .find(id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(ProjectView::from(project)))
}

/// GET /api/projects/:id/guide
async fn get_guide(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GuideQuery>,
) -> Result<Json<GuideView>, ApiError> {
    let id: ProjectId = parse_id(&id, "project_id")?;
    let mut guide = state
        .catalog
        .guide(id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    if let Some(step) = query.step {
        guide.select_step(step)?;
    }
    Ok(Json(GuideView::from(&guide)))
}

/// GET /api/dashboard/stats
async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<Vec<DashboardStat>>, ApiError> {
    Ok(Json(state.catalog.stats().await?))
}

fn project_not_found(id: ProjectId) -> DomainError {
    DomainError::new(ErrorCode::ProjectNotFound, format!("Project not found: {}", id))
}
