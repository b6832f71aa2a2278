//! Fixed sample catalog matching the dashboard mock-up.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Percentage, ProjectId};
use crate::domain::project::{
    DashboardStat, GuideDocument, GuideStep, Project, ProjectFilter, ProjectKind, ProjectStatus,
};
use crate::ports::ProjectCatalog;

/// Length of the sample video, in seconds.
const SAMPLE_VIDEO_SECS: u64 = 120;

/// Six sample projects, four headline stats and one shared guide.
pub struct SampleProjectCatalog {
    projects: Vec<Project>,
    stats: Vec<DashboardStat>,
    guide: GuideDocument,
}

impl SampleProjectCatalog {
    pub fn new() -> Self {
        Self {
            projects: sample_projects(),
            stats: sample_stats(),
            guide: GuideDocument::new(sample_steps(), SAMPLE_VIDEO_SECS),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}

impl Default for SampleProjectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectCatalog for SampleProjectCatalog {
    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        Ok(filter.apply(&self.projects))
    }

    async fn find(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn stats(&self) -> Result<Vec<DashboardStat>, DomainError> {
        Ok(self.stats.clone())
    }

    async fn guide(&self, id: ProjectId) -> Result<Option<GuideDocument>, DomainError> {
        let known = self.projects.iter().any(|p| p.id == id);
        Ok(known.then(|| self.guide.clone()))
    }
}

fn sample_projects() -> Vec<Project> {
    use ProjectKind::*;
    use ProjectStatus::*;

    vec![
        Project::new("Product Onboarding Tutorial", Published, Both, "4:32", "2 hours ago"),
        Project::new("Feature Walkthrough - Dashboard", Ready, Video, "2:15", "5 hours ago"),
        Project::new("API Integration Guide", Processing, Guide, "8:45", "1 day ago")
            .with_progress(Percentage::new(67)),
        Project::new("Settings Configuration", Processing, Both, "3:20", "1 day ago")
            .with_progress(Percentage::new(23)),
        Project::new("Customer Support Flow", Ready, Video, "5:10", "2 days ago"),
        Project::new("Mobile App Demo", Published, Both, "6:45", "3 days ago"),
    ]
}

fn sample_stats() -> Vec<DashboardStat> {
    vec![
        DashboardStat::new("Videos Created", "24", "+12%"),
        DashboardStat::new("Guides Generated", "18", "+8%"),
        DashboardStat::new("Time Saved", "32h", "+25%"),
        DashboardStat::new("Views", "1.2k", "+15%"),
    ]
}

fn sample_steps() -> Vec<GuideStep> {
    vec![
        GuideStep::new(
            1,
            "Navigate to Dashboard",
            "Click on the dashboard icon in the left sidebar to access the main dashboard view.",
            0,
        ),
        GuideStep::new(
            2,
            "Create New Project",
            "Click the 'New Project' button in the top right corner to start creating a new project.",
            15,
        ),
        GuideStep::new(
            3,
            "Configure Settings",
            "Fill in the project name, description, and select your preferred options from the settings panel.",
            45,
        ),
        GuideStep::new(
            4,
            "Save and Publish",
            "Review your changes and click 'Save' to store the project, then 'Publish' to make it live.",
            90,
        ),
    ]
}
