//! Tracked record types shared by the remote table service and the local
//! snapshot mirror. Field names and enum wire strings match the hosted
//! database columns, so the same structs serialize for both sides.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Life domain a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    Business,
    Property,
    Family,
    Creative,
    Health,
    /// Local-only domain; the remote schema predates it and stores it as Family.
    #[serde(rename = "SJT")]
    Sjt,
}

impl Domain {
    /// Domain value accepted by the remote table service.
    pub fn for_remote(self) -> Domain {
        match self {
            Domain::Sjt => Domain::Family,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Business => "Business",
            Domain::Property => "Property",
            Domain::Family => "Family",
            Domain::Creative => "Creative",
            Domain::Health => "Health",
            Domain::Sjt => "SJT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Blocked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Planning => "Planning",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Blocked => "Blocked",
        }
    }
}

/// Cadence bucket for ad-hoc tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Daily,
    Weekly,
    Monthly,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Weekly => "weekly",
            Category::Monthly => "monthly",
        }
    }

    pub const ALL: [Category; 3] = [Category::Daily, Category::Weekly, Category::Monthly];
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_via_as_str!(Domain, Priority, Urgency, Status, Category);

/// A tracked project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub domain: Domain,
    pub priority: Priority,
    pub urgency: Urgency,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Copy of this project with remote-safe field values.
    pub fn remote_payload(&self) -> Project {
        Project {
            domain: self.domain.for_remote(),
            ..self.clone()
        }
    }
}

/// A task belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub order_index: i64,
    pub document_url: Option<String>,
    pub document_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A standalone task outside any project, grouped by cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdHocTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(default)]
    pub archived: bool,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a project; the rest is assigned by the tracker.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub domain: Domain,
    pub priority: Priority,
    pub urgency: Urgency,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
}

/// Fields required to create a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub document_url: Option<String>,
    pub document_name: Option<String>,
}

/// Fields required to create an ad-hoc task.
#[derive(Debug, Clone)]
pub struct AdHocDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
}
