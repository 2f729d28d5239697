//! Dashboard: the page-level view over the tracker state.
//!
//! Derived reads (visibility filters, per-project progress, stats) live
//! here; mutations delegate to the tracker, which keeps the held state,
//! the local snapshot and the remote mirror in step.

use std::sync::Arc;

use anyhow::Result;

use daytrack_store::{
    AdHocDraft, AdHocTask, Category, Priority, Project, ProjectDraft, Status, Task, TaskDraft,
    Tracker,
};

/// Headline numbers for the stats cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub critical: usize,
}

pub struct Dashboard {
    tracker: Arc<Tracker>,
}

impl Dashboard {
    pub fn new(tracker: Arc<Tracker>) -> Self {
        Self { tracker }
    }

    /// Re-run the three fetches (remote first, snapshot fallback).
    pub async fn refresh(&self) -> Result<()> {
        self.tracker.refresh().await
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    // ---- derived reads ----

    /// Active projects in display order.
    pub fn visible_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .tracker
            .projects()
            .into_iter()
            .filter(|p| !p.archived)
            .collect();
        projects.sort_by_key(|p| p.order_index);
        projects
    }

    /// Projects hidden from the default list.
    pub fn archived_projects(&self) -> Vec<Project> {
        self.tracker
            .projects()
            .into_iter()
            .filter(|p| p.archived)
            .collect()
    }

    /// Tasks of one project, archived ones excluded unless asked for.
    pub fn project_tasks(&self, project_id: &str, include_archived: bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tracker
            .tasks()
            .into_iter()
            .filter(|t| t.project_id == project_id && (include_archived || !t.archived))
            .collect();
        tasks.sort_by_key(|t| t.order_index);
        tasks
    }

    /// Completed count over a project's non-archived tasks.
    pub fn completed_task_count(&self, project_id: &str) -> usize {
        self.project_tasks(project_id, false)
            .iter()
            .filter(|t| t.completed)
            .count()
    }

    /// Completion percentage of a project, 0 when it has no tasks.
    pub fn progress_percent(&self, project_id: &str) -> f64 {
        let tasks = self.project_tasks(project_id, false);
        if tasks.is_empty() {
            return 0.0;
        }
        let completed = tasks.iter().filter(|t| t.completed).count();
        (completed as f64 / tasks.len() as f64) * 100.0
    }

    /// Ad-hoc tasks of one cadence bucket.
    pub fn adhoc_by_category(&self, category: Category, include_archived: bool) -> Vec<AdHocTask> {
        self.tracker
            .adhoc_tasks()
            .into_iter()
            .filter(|t| t.category == category && (include_archived || !t.archived))
            .collect()
    }

    /// Stats cards over all projects.
    pub fn stats(&self) -> DashboardStats {
        let projects = self.tracker.projects();
        DashboardStats {
            total: projects.len(),
            completed: projects.iter().filter(|p| p.status == Status::Completed).count(),
            in_progress: projects.iter().filter(|p| p.status == Status::InProgress).count(),
            critical: projects.iter().filter(|p| p.priority == Priority::Critical).count(),
        }
    }

    // ---- mutations (delegated) ----

    pub async fn add_project(&self, draft: ProjectDraft) -> Result<Project> {
        self.tracker.add_project(draft).await
    }

    pub async fn update_project(&self, project: Project) -> Result<Option<Project>> {
        self.tracker.update_project(project).await
    }

    pub async fn rename_project(&self, id: &str, title: &str) -> Result<Option<Project>> {
        self.tracker.rename_project(id, title).await
    }

    pub async fn archive_project(&self, id: &str) -> Result<Option<Project>> {
        self.tracker.archive_project(id).await
    }

    pub async fn unarchive_project(&self, id: &str) -> Result<Option<Project>> {
        self.tracker.unarchive_project(id).await
    }

    pub async fn reorder_projects(&self, dragged_id: &str, target_id: &str) -> Result<bool> {
        self.tracker.reorder_projects(dragged_id, target_id).await
    }

    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task> {
        self.tracker.add_task(draft).await
    }

    pub async fn toggle_task(&self, id: &str) -> Result<Option<Task>> {
        self.tracker.toggle_task(id).await
    }

    pub async fn archive_task(&self, id: &str) -> Result<Option<Task>> {
        self.tracker.archive_task(id).await
    }

    pub async fn unarchive_task(&self, id: &str) -> Result<Option<Task>> {
        self.tracker.unarchive_task(id).await
    }

    pub async fn add_adhoc_task(&self, draft: AdHocDraft) -> Result<AdHocTask> {
        self.tracker.add_adhoc_task(draft).await
    }

    pub async fn toggle_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        self.tracker.toggle_adhoc_task(id).await
    }

    pub async fn archive_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        self.tracker.archive_adhoc_task(id).await
    }

    pub async fn unarchive_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        self.tracker.unarchive_adhoc_task(id).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use daytrack_store::SnapshotStore;

    async fn sample_dashboard() -> Dashboard {
        let store = SnapshotStore::in_memory().unwrap();
        let tracker = Arc::new(Tracker::with_store(store, None));
        tracker.refresh().await.unwrap();
        Dashboard::new(tracker)
    }

    #[tokio::test]
    async fn test_archiving_moves_project_between_lists() {
        let dashboard = sample_dashboard().await;
        assert_eq!(dashboard.visible_projects().len(), 5);
        assert!(dashboard.archived_projects().is_empty());

        dashboard.archive_project("2").await.unwrap();

        let visible = dashboard.visible_projects();
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|p| p.id != "2"));

        let archived = dashboard.archived_projects();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, "2");

        dashboard.unarchive_project("2").await.unwrap();
        assert_eq!(dashboard.visible_projects().len(), 5);
    }

    #[tokio::test]
    async fn test_toggle_updates_progress_percent() {
        let dashboard = sample_dashboard().await;

        // Project 1 has three tasks, one completed
        assert!((dashboard.progress_percent("1") - 100.0 / 3.0).abs() < 1e-9);

        dashboard.toggle_task("2").await.unwrap();
        assert!((dashboard.progress_percent("1") - 200.0 / 3.0).abs() < 1e-9);

        dashboard.toggle_task("2").await.unwrap();
        assert!((dashboard.progress_percent("1") - 100.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_progress_is_zero_without_tasks() {
        let dashboard = sample_dashboard().await;
        // Project 5 has no tasks in the sample set
        assert_eq!(dashboard.progress_percent("5"), 0.0);
    }

    #[tokio::test]
    async fn test_archived_tasks_leave_the_progress_denominator() {
        let dashboard = sample_dashboard().await;
        assert_eq!(dashboard.project_tasks("1", false).len(), 3);

        dashboard.archive_task("3").await.unwrap();

        assert_eq!(dashboard.project_tasks("1", false).len(), 2);
        assert_eq!(dashboard.project_tasks("1", true).len(), 3);
        // One of the two remaining tasks is completed
        assert!((dashboard.progress_percent("1") - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let dashboard = sample_dashboard().await;
        let stats = dashboard.stats();

        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.in_progress, 3);
        assert_eq!(stats.critical, 1);
    }

    #[tokio::test]
    async fn test_adhoc_by_category_respects_archive_flag() {
        let dashboard = sample_dashboard().await;
        assert_eq!(dashboard.adhoc_by_category(Category::Daily, false).len(), 2);

        let daily = dashboard.adhoc_by_category(Category::Daily, false);
        dashboard.archive_adhoc_task(&daily[0].id).await.unwrap();

        assert_eq!(dashboard.adhoc_by_category(Category::Daily, false).len(), 1);
        assert_eq!(dashboard.adhoc_by_category(Category::Daily, true).len(), 2);
    }

    #[tokio::test]
    async fn test_visible_projects_follow_reorder() {
        let dashboard = sample_dashboard().await;

        dashboard.reorder_projects("4", "1").await.unwrap();
        let visible = dashboard.visible_projects();
        assert_eq!(visible[0].id, "4");
        assert_eq!(visible[1].id, "1");
    }
}
