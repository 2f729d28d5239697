//! Local-first facade over the hosted table service and the snapshot store.
//!
//! Reads go remote-first and mirror into the snapshot store; when the remote
//! is unreachable or unconfigured the snapshot is served, and a fresh install
//! with neither gets the built-in sample dataset. Writes apply to the held
//! state and the snapshot unconditionally and mirror to the remote
//! best-effort; a failed mirror is logged and otherwise ignored (no
//! reconciliation, no conflict detection).

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::local::{SnapshotStore, ADHOC_TASKS_KEY, PROJECTS_KEY, TASKS_KEY};
use crate::model::{
    AdHocDraft, AdHocTask, Project, ProjectDraft, Task, TaskDraft,
};
use crate::remote::RemoteDb;
use crate::sample;

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    adhoc_tasks: Vec<AdHocTask>,
}

/// Local-first store for projects, tasks and ad-hoc tasks.
pub struct Tracker {
    remote: Option<RemoteDb>,
    local: Arc<Mutex<SnapshotStore>>,
    state: RwLock<State>,
}

impl Tracker {
    /// Open the tracker against a snapshot database path.
    pub fn open<P: AsRef<std::path::Path>>(path: P, remote: Option<RemoteDb>) -> Result<Self> {
        let store = SnapshotStore::open(path)?;
        Ok(Self::with_store(store, remote))
    }

    /// Build a tracker from an already-open snapshot store.
    pub fn with_store(store: SnapshotStore, remote: Option<RemoteDb>) -> Self {
        Self {
            remote,
            local: Arc::new(Mutex::new(store)),
            state: RwLock::new(State::default()),
        }
    }

    /// Whether a hosted database is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Run the three read-throughs and replace the held state.
    pub async fn refresh(&self) -> Result<()> {
        let projects = self
            .read_through(PROJECTS_KEY, "projects", "order_index", true, sample::projects)
            .await?;
        let tasks = self
            .read_through(TASKS_KEY, "tasks", "order_index", true, sample::tasks)
            .await?;
        let adhoc_tasks = self
            .read_through(
                ADHOC_TASKS_KEY,
                "adhoc_tasks",
                "created_at",
                false,
                sample::adhoc_tasks,
            )
            .await?;

        let mut state = self.state.write();
        state.projects = projects;
        state.tasks = tasks;
        state.adhoc_tasks = adhoc_tasks;
        Ok(())
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state.read().projects.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.clone()
    }

    pub fn adhoc_tasks(&self) -> Vec<AdHocTask> {
        self.state.read().adhoc_tasks.clone()
    }

    // ---- projects ----

    /// Create a project at the end of the list.
    pub async fn add_project(&self, draft: ProjectDraft) -> Result<Project> {
        let project = {
            let mut state = self.state.write();
            let now = Utc::now();
            let project = Project {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                description: draft.description,
                domain: draft.domain,
                priority: draft.priority,
                urgency: draft.urgency,
                status: draft.status,
                due_date: draft.due_date,
                archived: false,
                order_index: state.projects.len() as i64,
                created_at: now,
                updated_at: now,
            };
            state.projects.push(project.clone());
            project
        };

        self.persist_projects().await?;
        self.mirror_insert("projects", &project.remote_payload()).await;
        Ok(project)
    }

    /// Replace a project wholesale (edit dialog semantics).
    pub async fn update_project(&self, mut updated: Project) -> Result<Option<Project>> {
        updated.updated_at = Utc::now();
        let replaced = {
            let mut state = self.state.write();
            match state.projects.iter_mut().find(|p| p.id == updated.id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        };
        if !replaced {
            return Ok(None);
        }

        self.persist_projects().await?;
        let patch = serde_json::to_value(updated.remote_payload())?;
        self.mirror_update("projects", &updated.id, patch).await;
        Ok(Some(updated))
    }

    /// Inline rename. A blank title is treated as a cancelled edit.
    pub async fn rename_project(&self, id: &str, title: &str) -> Result<Option<Project>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let renamed = self.modify_project(id, |p| p.title = title.to_string());
        let Some(project) = renamed else {
            return Ok(None);
        };

        self.persist_projects().await?;
        self.mirror_update(
            "projects",
            id,
            serde_json::json!({ "title": project.title, "updated_at": project.updated_at }),
        )
        .await;
        Ok(Some(project))
    }

    pub async fn archive_project(&self, id: &str) -> Result<Option<Project>> {
        self.set_project_archived(id, true).await
    }

    pub async fn unarchive_project(&self, id: &str) -> Result<Option<Project>> {
        self.set_project_archived(id, false).await
    }

    async fn set_project_archived(&self, id: &str, archived: bool) -> Result<Option<Project>> {
        let Some(project) = self.modify_project(id, |p| p.archived = archived) else {
            return Ok(None);
        };

        self.persist_projects().await?;
        self.mirror_update(
            "projects",
            id,
            serde_json::json!({ "archived": archived, "updated_at": project.updated_at }),
        )
        .await;
        Ok(Some(project))
    }

    /// Move a dragged project to the target's position and close the gap,
    /// reassigning contiguous order indices. Order changes stay local; the
    /// next full-row write carries them upstream.
    pub async fn reorder_projects(&self, dragged_id: &str, target_id: &str) -> Result<bool> {
        let moved = {
            let mut state = self.state.write();
            let dragged = state.projects.iter().position(|p| p.id == dragged_id);
            let target = state.projects.iter().position(|p| p.id == target_id);

            match (dragged, target) {
                (Some(from), Some(to)) if from != to => {
                    let project = state.projects.remove(from);
                    state.projects.insert(to, project);
                    for (index, project) in state.projects.iter_mut().enumerate() {
                        project.order_index = index as i64;
                    }
                    true
                }
                _ => false,
            }
        };

        if moved {
            self.persist_projects().await?;
        }
        Ok(moved)
    }

    fn modify_project<F: FnOnce(&mut Project)>(&self, id: &str, apply: F) -> Option<Project> {
        let mut state = self.state.write();
        let project = state.projects.iter_mut().find(|p| p.id == id)?;
        apply(project);
        project.updated_at = Utc::now();
        Some(project.clone())
    }

    // ---- tasks ----

    /// Create a task at the end of its project's list.
    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task> {
        let task = {
            let mut state = self.state.write();
            let now = Utc::now();
            let position = state
                .tasks
                .iter()
                .filter(|t| t.project_id == draft.project_id)
                .count() as i64;
            let task = Task {
                id: Uuid::new_v4().to_string(),
                project_id: draft.project_id,
                title: draft.title,
                description: draft.description,
                completed: false,
                archived: false,
                order_index: position + 1,
                document_url: draft.document_url,
                document_name: draft.document_name,
                created_at: now,
                updated_at: now,
            };
            state.tasks.push(task.clone());
            task
        };

        self.persist_tasks().await?;
        self.mirror_insert("tasks", &task).await;
        Ok(task)
    }

    /// Flip a task's completed flag.
    pub async fn toggle_task(&self, id: &str) -> Result<Option<Task>> {
        let Some(task) = self.modify_task(id, |t| t.completed = !t.completed) else {
            return Ok(None);
        };

        self.persist_tasks().await?;
        self.mirror_update(
            "tasks",
            id,
            serde_json::json!({ "completed": task.completed, "updated_at": task.updated_at }),
        )
        .await;
        Ok(Some(task))
    }

    pub async fn archive_task(&self, id: &str) -> Result<Option<Task>> {
        self.set_task_archived(id, true).await
    }

    pub async fn unarchive_task(&self, id: &str) -> Result<Option<Task>> {
        self.set_task_archived(id, false).await
    }

    async fn set_task_archived(&self, id: &str, archived: bool) -> Result<Option<Task>> {
        let Some(task) = self.modify_task(id, |t| t.archived = archived) else {
            return Ok(None);
        };

        self.persist_tasks().await?;
        self.mirror_update(
            "tasks",
            id,
            serde_json::json!({ "archived": archived, "updated_at": task.updated_at }),
        )
        .await;
        Ok(Some(task))
    }

    fn modify_task<F: FnOnce(&mut Task)>(&self, id: &str, apply: F) -> Option<Task> {
        let mut state = self.state.write();
        let task = state.tasks.iter_mut().find(|t| t.id == id)?;
        apply(task);
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    // ---- ad-hoc tasks ----

    pub async fn add_adhoc_task(&self, draft: AdHocDraft) -> Result<AdHocTask> {
        let task = {
            let mut state = self.state.write();
            let now = Utc::now();
            let task = AdHocTask {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                description: draft.description,
                completed: false,
                archived: false,
                category: draft.category,
                created_at: now,
                updated_at: now,
            };
            state.adhoc_tasks.insert(0, task.clone());
            task
        };

        self.persist_adhoc_tasks().await?;
        self.mirror_insert("adhoc_tasks", &task).await;
        Ok(task)
    }

    pub async fn toggle_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        let Some(task) = self.modify_adhoc_task(id, |t| t.completed = !t.completed) else {
            return Ok(None);
        };

        self.persist_adhoc_tasks().await?;
        self.mirror_update(
            "adhoc_tasks",
            id,
            serde_json::json!({ "completed": task.completed, "updated_at": task.updated_at }),
        )
        .await;
        Ok(Some(task))
    }

    pub async fn archive_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        self.set_adhoc_archived(id, true).await
    }

    pub async fn unarchive_adhoc_task(&self, id: &str) -> Result<Option<AdHocTask>> {
        self.set_adhoc_archived(id, false).await
    }

    async fn set_adhoc_archived(&self, id: &str, archived: bool) -> Result<Option<AdHocTask>> {
        let Some(task) = self.modify_adhoc_task(id, |t| t.archived = archived) else {
            return Ok(None);
        };

        self.persist_adhoc_tasks().await?;
        self.mirror_update(
            "adhoc_tasks",
            id,
            serde_json::json!({ "archived": archived, "updated_at": task.updated_at }),
        )
        .await;
        Ok(Some(task))
    }

    fn modify_adhoc_task<F: FnOnce(&mut AdHocTask)>(&self, id: &str, apply: F) -> Option<AdHocTask> {
        let mut state = self.state.write();
        let task = state.adhoc_tasks.iter_mut().find(|t| t.id == id)?;
        apply(task);
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    // ---- persistence plumbing ----

    async fn read_through<T>(
        &self,
        key: &'static str,
        table: &'static str,
        order_column: &'static str,
        ascending: bool,
        fallback: fn() -> Vec<T>,
    ) -> Result<Vec<T>>
    where
        T: Clone + Serialize + DeserializeOwned + Send + 'static,
    {
        if let Some(remote) = &self.remote {
            match remote.select::<T>(table, order_column, ascending).await {
                Ok(rows) => {
                    if let Err(e) = self.save_snapshot(key, rows.clone()).await {
                        tracing::warn!("Failed to mirror {} into the snapshot store: {}", table, e);
                    }
                    return Ok(rows);
                }
                Err(e) => {
                    tracing::warn!("Remote fetch failed for {}, using local snapshot: {}", table, e);
                }
            }
        }

        let snapshot: Option<Vec<T>> = self.load_snapshot(key).await?;
        match snapshot {
            Some(rows) if !rows.is_empty() => Ok(rows),
            _ => {
                let rows = fallback();
                self.save_snapshot(key, rows.clone()).await?;
                Ok(rows)
            }
        }
    }

    async fn persist_projects(&self) -> Result<()> {
        let rows = self.state.read().projects.clone();
        self.save_snapshot(PROJECTS_KEY, rows).await
    }

    async fn persist_tasks(&self) -> Result<()> {
        let rows = self.state.read().tasks.clone();
        self.save_snapshot(TASKS_KEY, rows).await
    }

    async fn persist_adhoc_tasks(&self) -> Result<()> {
        let rows = self.state.read().adhoc_tasks.clone();
        self.save_snapshot(ADHOC_TASKS_KEY, rows).await
    }

    async fn save_snapshot<T>(&self, key: &'static str, rows: Vec<T>) -> Result<()>
    where
        T: Serialize + Send + 'static,
    {
        let local = self.local.clone();
        tokio::task::spawn_blocking(move || local.lock().save(key, &rows)).await?
    }

    async fn load_snapshot<T>(&self, key: &'static str) -> Result<Option<Vec<T>>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let local = self.local.clone();
        tokio::task::spawn_blocking(move || local.lock().load::<Vec<T>>(key)).await?
    }

    async fn mirror_insert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) {
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.insert(table, row).await {
                tracing::warn!("Remote insert into {} failed, keeping local copy: {}", table, e);
            }
        }
    }

    async fn mirror_update(&self, table: &str, id: &str, patch: serde_json::Value) {
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.update(table, id, &patch).await {
                tracing::warn!("Remote update of {} {} failed, keeping local copy: {}", table, id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::model::{Category, Domain, Priority, Status, Urgency};

    fn local_only_tracker() -> Tracker {
        let store = SnapshotStore::in_memory().unwrap();
        Tracker::with_store(store, None)
    }

    #[tokio::test]
    async fn test_fresh_install_serves_sample_data() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        assert_eq!(tracker.projects().len(), 5);
        assert_eq!(tracker.tasks().len(), 8);
        assert_eq!(tracker.adhoc_tasks().len(), 6);
    }

    #[tokio::test]
    async fn test_add_project_appends_with_next_order_index() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let project = tracker
            .add_project(ProjectDraft {
                title: "Garden Overhaul".to_string(),
                description: "Replant the back garden".to_string(),
                domain: Domain::Family,
                priority: Priority::Low,
                urgency: Urgency::Low,
                status: Status::Planning,
                due_date: None,
            })
            .await
            .unwrap();

        assert_eq!(project.order_index, 5);
        assert_eq!(tracker.projects().len(), 6);
        assert!(!project.archived);
    }

    #[tokio::test]
    async fn test_toggle_task_flips_completed() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let before = tracker.tasks()[1].clone();
        let after = tracker.toggle_task(&before.id).await.unwrap().unwrap();

        assert_eq!(after.completed, !before.completed);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_is_none() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let result = tracker.toggle_task("no-such-task").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_archive_project_sets_flag() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let archived = tracker.archive_project("1").await.unwrap().unwrap();
        assert!(archived.archived);

        let restored = tracker.unarchive_project("1").await.unwrap().unwrap();
        assert!(!restored.archived);
    }

    #[tokio::test]
    async fn test_reorder_projects_reassigns_indices() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        // Move the last project to the front
        let moved = tracker.reorder_projects("5", "1").await.unwrap();
        assert!(moved);

        let projects = tracker.projects();
        assert_eq!(projects[0].id, "5");
        let indices: Vec<i64> = projects.iter().map(|p| p.order_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_reorder_with_unknown_target_is_noop() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let moved = tracker.reorder_projects("1", "missing").await.unwrap();
        assert!(!moved);
        assert_eq!(tracker.projects()[0].id, "1");
    }

    #[tokio::test]
    async fn test_rename_project_blank_title_cancels() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let result = tracker.rename_project("1", "   ").await.unwrap();
        assert!(result.is_none());
        assert_eq!(tracker.projects()[0].title, "Website Redesign");

        let renamed = tracker.rename_project("1", " Site Refresh ").await.unwrap().unwrap();
        assert_eq!(renamed.title, "Site Refresh");
    }

    #[tokio::test]
    async fn test_adhoc_add_lands_first_and_toggles() {
        let tracker = local_only_tracker();
        tracker.refresh().await.unwrap();

        let added = tracker
            .add_adhoc_task(AdHocDraft {
                title: "Stretch".to_string(),
                description: "Five minutes".to_string(),
                category: Category::Daily,
            })
            .await
            .unwrap();

        assert_eq!(tracker.adhoc_tasks()[0].id, added.id);

        let toggled = tracker.toggle_adhoc_task(&added.id).await.unwrap().unwrap();
        assert!(toggled.completed);
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("snapshots.db");

        let toggled_id = {
            let tracker = Tracker::open(&db_path, None).unwrap();
            tracker.refresh().await.unwrap();
            let id = tracker.tasks()[1].id.clone();
            tracker.toggle_task(&id).await.unwrap().unwrap();
            id
        };

        let tracker = Tracker::open(&db_path, None).unwrap();
        tracker.refresh().await.unwrap();

        let task = tracker
            .tasks()
            .into_iter()
            .find(|t| t.id == toggled_id)
            .unwrap();
        assert!(task.completed);
    }
}
