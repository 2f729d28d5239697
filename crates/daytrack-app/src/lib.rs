//! Application layer: the dashboard state surface and the world clock.

pub mod clock;
pub mod dashboard;

pub use dashboard::{Dashboard, DashboardStats};
