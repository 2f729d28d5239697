use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use daytrack_app::{clock, Dashboard};
use daytrack_auth::{AuthClient, AuthConfig};
use daytrack_calendar::{bucket_events, classify, CalendarSession, EventKind, RollingWindow};
use daytrack_core::{AppError, Config};
use daytrack_store::{Category, RemoteDb, Tracker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    daytrack_core::init()?;

    let (config, _validation) = Config::load_validated()?;

    let remote = if config.remote.is_configured() {
        RemoteDb::from_parts(&config.remote.url, &config.remote.api_key)
    } else {
        None
    };

    let tracker = Arc::new(Tracker::open(config.snapshot_path(), remote)?);
    let dashboard = Dashboard::new(tracker);
    dashboard.refresh().await?;

    tracing::info!("daytrack started");

    println!("daytrack - Personal Project Tracker");
    println!(
        "Data source: {}",
        if dashboard.tracker().has_remote() {
            "hosted database (mirrored locally)"
        } else {
            "local snapshot"
        }
    );

    let stats = dashboard.stats();
    println!(
        "\n{} projects: {} completed, {} in progress, {} critical",
        stats.total, stats.completed, stats.in_progress, stats.critical
    );

    for project in dashboard.visible_projects() {
        println!(
            "\n[{}] {} - {} ({:.0}%)",
            project.domain,
            project.title,
            project.status,
            dashboard.progress_percent(&project.id)
        );
        let tasks = dashboard.project_tasks(&project.id, false);
        for task in tasks.iter().take(config.ui.tasks_per_card) {
            println!("  [{}] {}", if task.completed { "x" } else { " " }, task.title);
        }
        if tasks.len() > config.ui.tasks_per_card {
            println!("  ... and {} more", tasks.len() - config.ui.tasks_per_card);
        }
    }

    let archived = dashboard.archived_projects();
    if !archived.is_empty() {
        println!("\nArchived projects:");
        for project in &archived {
            println!("  {}", project.title);
        }
    }

    for category in Category::ALL {
        let tasks = dashboard.adhoc_by_category(category, config.ui.show_archived);
        if tasks.is_empty() {
            continue;
        }
        println!("\n{} tasks:", category);
        for task in &tasks {
            println!("  [{}] {}", if task.completed { "x" } else { " " }, task.title);
        }
    }

    if config.calendar.is_configured() {
        if let Err(e) = print_calendar_summary(&config).await {
            println!("\nCalendar: {}", e.user_message());
        }
    }

    println!("\nWorld clock:");
    for city in clock::cities() {
        if let Some(time) = clock::now_in(city) {
            let home = if city == config.clock.home_city { " (home)" } else { "" };
            println!("  {:<12} {}{}", city, time, home);
        }
    }

    Ok(())
}

/// Best-effort calendar summary using a stored sign-in; a missing or expired
/// token surfaces as an inline message, never a prompt.
async fn print_calendar_summary(config: &Config) -> Result<(), AppError> {
    let auth = AuthClient::new(AuthConfig::microsoft(
        &config.calendar.client_id,
        &config.calendar.tenant,
        config.calendar.redirect_port,
    ))?;
    let mut session = CalendarSession::new(auth);
    session.connect_silent().await?;

    if let Some(profile) = session.profile() {
        println!(
            "\nCalendar: connected as {}",
            profile.display_name.as_deref().unwrap_or("unknown user")
        );
    }

    let window = RollingWindow::around(Local::now().date_naive());
    let events = session.events_for(&window).await?;

    let meetings = events.iter().filter(|e| classify(e) == EventKind::Meeting).count();
    let calls = events.iter().filter(|e| classify(e) == EventKind::Call).count();
    let busy_days = bucket_events(&window, &events)
        .iter()
        .filter(|cell| !cell.events.is_empty())
        .count();
    println!(
        "  {} events across 3 weeks ({} meetings, {} calls) on {} days",
        events.len(),
        meetings,
        calls,
        busy_days
    );

    Ok(())
}
