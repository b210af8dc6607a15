//! Inspection use-cases: CRUD and analytics

pub mod analytics;
pub mod service;

pub use analytics::{build_report, AnalyticsReport, AnalyticsService};
pub use service::InspectionService;
