//! Identity module: authentication and account seeding

pub mod service;

pub use service::{AccessToken, AuthService, SeedOutcome};
