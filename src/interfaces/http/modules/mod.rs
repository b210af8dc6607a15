pub mod analytics;
pub mod auth;
pub mod health;
pub mod inspections;
pub mod metrics;
pub mod request_id;
