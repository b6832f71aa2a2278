//! Dashboard projects and the filter applied to the project list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Percentage, ProjectId};

/// Where a project is in the record → process → publish flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Recording,
    Processing,
    Ready,
    Published,
}

impl ProjectStatus {
    /// Label shown on the project card.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Recording => "Recording",
            ProjectStatus::Processing => "AI Processing",
            ProjectStatus::Ready => "Ready to Edit",
            ProjectStatus::Published => "Published",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Video,
    Guide,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub status: ProjectStatus,
    pub kind: ProjectKind,
    /// Display duration, e.g. "4:32".
    pub duration: String,
    /// Relative creation label, e.g. "2 hours ago".
    pub created_label: String,
    /// Processing progress; only set while processing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Percentage>,
}

impl Project {
    pub fn new(
        title: impl Into<String>,
        status: ProjectStatus,
        kind: ProjectKind,
        duration: impl Into<String>,
        created_label: impl Into<String>,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            title: title.into(),
            status,
            kind,
            duration: duration.into(),
            created_label: created_label.into(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Percentage) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Search box plus status dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive substring of the title. Empty matches all.
    #[serde(default)]
    pub search: String,
    /// `None` means "all".
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let matches_search = project
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_status = self.status.map_or(true, |s| s == project.status);
        matches_search && matches_status
    }

    pub fn apply<'a>(&self, projects: impl IntoIterator<Item = &'a Project>) -> Vec<Project> {
        projects
            .into_iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

/// One headline figure on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStat {
    pub label: String,
    pub value: String,
    pub change: String,
}

impl DashboardStat {
    pub fn new(label: impl Into<String>, value: impl Into<String>, change: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            change: change.into(),
        }
    }
}
