//! Project catalog port (read side).
//!
//! Source of the dashboard's project list, headline stats and the guide
//! shown in the editor.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::project::{DashboardStat, GuideDocument, Project, ProjectFilter};

/// Read-only access to projects.
#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// Projects matching the filter, in dashboard order.
    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError>;

    /// A single project, or `None` if unknown.
    async fn find(&self, id: ProjectId) -> Result<Option<Project>, DomainError>;

    /// Headline figures for the dashboard header.
    async fn stats(&self) -> Result<Vec<DashboardStat>, DomainError>;

    /// The generated guide for a project, or `None` if it has none.
    async fn guide(&self, id: ProjectId) -> Result<Option<GuideDocument>, DomainError>;
}
