//! Built-in demo dataset.
//!
//! Served (and seeded into the snapshot store) when the hosted database is
//! unconfigured and no snapshot exists yet, so a fresh install shows a
//! populated dashboard.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{AdHocTask, Category, Domain, Priority, Project, Status, Task, Urgency};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            title: "Website Redesign".to_string(),
            description: "Complete redesign of company website with modern UI/UX".to_string(),
            domain: Domain::Business,
            priority: Priority::High,
            urgency: Urgency::Medium,
            status: Status::InProgress,
            due_date: day(2025, 10, 15),
            archived: false,
            order_index: 0,
            created_at: ts("2025-09-01T00:00:00Z"),
            updated_at: ts("2025-09-05T00:00:00Z"),
        },
        Project {
            id: "2".to_string(),
            title: "Property Investment Analysis".to_string(),
            description: "Research and analysis for potential property investments in Sydney"
                .to_string(),
            domain: Domain::Property,
            priority: Priority::Medium,
            urgency: Urgency::Low,
            status: Status::Planning,
            due_date: day(2025, 11, 30),
            archived: false,
            order_index: 1,
            created_at: ts("2025-09-02T00:00:00Z"),
            updated_at: ts("2025-09-05T00:00:00Z"),
        },
        Project {
            id: "3".to_string(),
            title: "Family Vacation Planning".to_string(),
            description: "Plan and organize summer vacation for the family".to_string(),
            domain: Domain::Family,
            priority: Priority::Medium,
            urgency: Urgency::High,
            status: Status::InProgress,
            due_date: day(2025, 12, 1),
            archived: false,
            order_index: 2,
            created_at: ts("2025-09-03T00:00:00Z"),
            updated_at: ts("2025-09-05T00:00:00Z"),
        },
        Project {
            id: "4".to_string(),
            title: "Mobile App Development".to_string(),
            description: "Develop a new mobile application for task management".to_string(),
            domain: Domain::Creative,
            priority: Priority::Critical,
            urgency: Urgency::High,
            status: Status::InProgress,
            due_date: day(2025, 9, 30),
            archived: false,
            order_index: 3,
            created_at: ts("2025-08-15T00:00:00Z"),
            updated_at: ts("2025-09-05T00:00:00Z"),
        },
        Project {
            id: "5".to_string(),
            title: "Health & Fitness Program".to_string(),
            description: "Start a comprehensive health and fitness routine".to_string(),
            domain: Domain::Health,
            priority: Priority::Medium,
            urgency: Urgency::Medium,
            status: Status::Planning,
            due_date: None,
            archived: false,
            order_index: 4,
            created_at: ts("2025-09-04T00:00:00Z"),
            updated_at: ts("2025-09-05T00:00:00Z"),
        },
    ]
}

pub fn tasks() -> Vec<Task> {
    fn task(
        id: &str,
        project_id: &str,
        title: &str,
        description: &str,
        completed: bool,
        order_index: i64,
        document: Option<(&str, &str)>,
        created_at: &str,
    ) -> Task {
        Task {
            id: id.to_string(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: Some(description.to_string()),
            completed,
            archived: false,
            order_index,
            document_url: document.map(|(url, _)| url.to_string()),
            document_name: document.map(|(_, name)| name.to_string()),
            created_at: ts(created_at),
            updated_at: ts("2025-09-05T00:00:00Z"),
        }
    }

    vec![
        task(
            "1",
            "1",
            "Design wireframes",
            "Create wireframes for all main pages",
            true,
            1,
            Some(("https://example.com/wireframes.pdf", "Wireframes.pdf")),
            "2025-09-01T00:00:00Z",
        ),
        task(
            "2",
            "1",
            "Develop homepage",
            "Code the new homepage design",
            false,
            2,
            None,
            "2025-09-02T00:00:00Z",
        ),
        task(
            "3",
            "1",
            "Test responsive design",
            "Test website on various devices",
            false,
            3,
            None,
            "2025-09-03T00:00:00Z",
        ),
        task(
            "4",
            "2",
            "Market research",
            "Research property market trends",
            false,
            1,
            Some(("https://example.com/market-report.xlsx", "Market Report.xlsx")),
            "2025-09-02T00:00:00Z",
        ),
        task(
            "5",
            "3",
            "Book flights",
            "Find and book flights for vacation",
            true,
            1,
            None,
            "2025-09-03T00:00:00Z",
        ),
        task(
            "6",
            "3",
            "Reserve accommodation",
            "Book hotel or vacation rental",
            false,
            2,
            None,
            "2025-09-03T00:00:00Z",
        ),
        task(
            "7",
            "4",
            "UI/UX Design",
            "Design app interface and user experience",
            true,
            1,
            Some(("https://example.com/app-design.fig", "App Design.fig")),
            "2025-08-15T00:00:00Z",
        ),
        task(
            "8",
            "4",
            "Backend API Development",
            "Develop REST API for the mobile app",
            false,
            2,
            None,
            "2025-08-20T00:00:00Z",
        ),
    ]
}

pub fn adhoc_tasks() -> Vec<AdHocTask> {
    fn adhoc(
        id: &str,
        title: &str,
        description: &str,
        completed: bool,
        category: Category,
        created_at: &str,
    ) -> AdHocTask {
        AdHocTask {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
            archived: false,
            category,
            created_at: ts(created_at),
            updated_at: ts("2025-09-06T00:00:00Z"),
        }
    }

    vec![
        adhoc(
            "1",
            "Morning walk",
            "30 minute walk before work",
            true,
            Category::Daily,
            "2025-09-06T00:00:00Z",
        ),
        adhoc(
            "2",
            "Review inbox",
            "Clear and triage email inbox",
            false,
            Category::Daily,
            "2025-09-06T01:00:00Z",
        ),
        adhoc(
            "3",
            "Water the plants",
            "Indoor and balcony plants",
            false,
            Category::Weekly,
            "2025-09-05T00:00:00Z",
        ),
        adhoc(
            "4",
            "Meal prep",
            "Prepare lunches for the week",
            false,
            Category::Weekly,
            "2025-09-05T01:00:00Z",
        ),
        adhoc(
            "5",
            "Pay bills",
            "Utilities and credit card",
            false,
            Category::Monthly,
            "2025-09-01T00:00:00Z",
        ),
        adhoc(
            "6",
            "Budget review",
            "Reconcile spending against budget",
            false,
            Category::Monthly,
            "2025-09-01T01:00:00Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        assert_eq!(projects().len(), 5);
        assert_eq!(tasks().len(), 8);
        assert_eq!(adhoc_tasks().len(), 6);
    }

    #[test]
    fn test_sample_tasks_reference_sample_projects() {
        let project_ids: Vec<String> = projects().into_iter().map(|p| p.id).collect();
        for task in tasks() {
            assert!(project_ids.contains(&task.project_id));
        }
    }

    #[test]
    fn test_sample_covers_every_category() {
        let adhoc = adhoc_tasks();
        for category in Category::ALL {
            assert!(adhoc.iter().any(|t| t.category == category));
        }
    }
}
