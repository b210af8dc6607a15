//! Application layer: use-cases orchestrating the domain and repositories

pub mod identity;
pub mod import;
pub mod inspections;

pub use identity::{AccessToken, AuthService, SeedOutcome};
pub use import::{read_rows, ImportError, ImportReport, LegacyImporter};
pub use inspections::{AnalyticsReport, AnalyticsService, InspectionService};
