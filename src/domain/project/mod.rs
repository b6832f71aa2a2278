//! Project domain module.
//!
//! Dashboard projects, headline stats and the editor's guide document.

mod guide;
mod listing;

pub use guide::{format_playback, GuideDocument, GuideStep};
pub use listing::{DashboardStat, Project, ProjectFilter, ProjectKind, ProjectStatus};
