//! Data access for daytrack: tracked record types, the hosted table service
//! client, the local snapshot mirror, and the local-first facade over both.

pub mod error;
pub mod local;
pub mod model;
pub mod remote;
pub mod sample;
pub mod tracker;

pub use error::StoreError;
pub use local::SnapshotStore;
pub use model::{
    AdHocDraft, AdHocTask, Category, Domain, Priority, Project, ProjectDraft, Status, Task,
    TaskDraft, Urgency,
};
pub use remote::RemoteDb;
pub use tracker::Tracker;
