//! Integration tests for the local-first read/write policy, driving the
//! tracker against a mock hosted database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use daytrack_store::{RemoteDb, SnapshotStore, Tracker};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project_row(id: &str, title: &str, order_index: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": "",
        "domain": "Business",
        "priority": "Medium",
        "urgency": "Low",
        "status": "Planning",
        "due_date": null,
        "archived": false,
        "order_index": order_index,
        "created_at": "2025-09-01T00:00:00Z",
        "updated_at": "2025-09-01T00:00:00Z"
    })
}

fn task_row(id: &str, project_id: &str, completed: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "project_id": project_id,
        "title": format!("Task {}", id),
        "description": null,
        "completed": completed,
        "archived": false,
        "order_index": 1,
        "document_url": null,
        "document_name": null,
        "created_at": "2025-09-01T00:00:00Z",
        "updated_at": "2025-09-01T00:00:00Z"
    })
}

async fn mount_select(server: &MockServer, table: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

#[tokio::test]
async fn remote_rows_are_mirrored_into_the_snapshot() {
    let server = MockServer::start().await;
    mount_select(&server, "projects", serde_json::json!([project_row("r1", "Remote project", 0)]))
        .await;
    mount_select(&server, "tasks", serde_json::json!([task_row("t1", "r1", false)])).await;
    mount_select(&server, "adhoc_tasks", serde_json::json!([])).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("snapshots.db");

    {
        let remote = RemoteDb::new(&server.uri(), "key");
        let tracker = Tracker::with_store(SnapshotStore::open(&db_path).unwrap(), Some(remote));
        tracker.refresh().await.unwrap();
        assert_eq!(tracker.projects().len(), 1);
        assert_eq!(tracker.projects()[0].title, "Remote project");
    }

    // A later offline run serves the mirrored snapshot, not the sample data.
    let tracker = Tracker::with_store(SnapshotStore::open(&db_path).unwrap(), None);
    tracker.refresh().await.unwrap();
    assert_eq!(tracker.projects().len(), 1);
    assert_eq!(tracker.projects()[0].id, "r1");
    assert_eq!(tracker.tasks().len(), 1);
}

#[tokio::test]
async fn remote_failure_falls_back_to_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = SnapshotStore::in_memory().unwrap();
    store
        .save("projects", &vec![project_row("cached", "Cached project", 0)])
        .unwrap();
    store.save("tasks", &vec![task_row("t9", "cached", true)]).unwrap();

    let remote = RemoteDb::new(&server.uri(), "key");
    let tracker = Tracker::with_store(store, Some(remote));
    tracker.refresh().await.unwrap();

    assert_eq!(tracker.projects().len(), 1);
    assert_eq!(tracker.projects()[0].id, "cached");
    // No adhoc snapshot existed, so that table degrades to the sample set.
    assert!(!tracker.adhoc_tasks().is_empty());
}

#[tokio::test]
async fn writes_keep_the_local_copy_when_the_mirror_fails() {
    let server = MockServer::start().await;
    mount_select(&server, "projects", serde_json::json!([project_row("p1", "P", 0)])).await;
    mount_select(&server, "tasks", serde_json::json!([task_row("t1", "p1", false)])).await;
    mount_select(&server, "adhoc_tasks", serde_json::json!([])).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let remote = RemoteDb::new(&server.uri(), "key");
    let tracker = Tracker::with_store(SnapshotStore::in_memory().unwrap(), Some(remote));
    tracker.refresh().await.unwrap();

    let toggled = tracker.toggle_task("t1").await.unwrap().unwrap();
    assert!(toggled.completed);

    // The failed remote mirror does not revert the local change.
    assert!(tracker.tasks()[0].completed);
}

#[tokio::test]
async fn unconfigured_remote_is_inert() {
    // No server at all: the tracker never attempts the network.
    let tracker = Tracker::with_store(SnapshotStore::in_memory().unwrap(), None);
    assert!(!tracker.has_remote());

    tracker.refresh().await.unwrap();
    assert_eq!(tracker.projects().len(), 5);
}
