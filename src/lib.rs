//! # Facility Inspection Service
//!
//! Records condition assessments of facilities (building envelope, HVAC,
//! fire protection, electrical) and serves them through a REST API and a
//! server-rendered dashboard.
//!
//! ## Architecture
//!
//! - **domain**: inspection and user entities, validation, repository traits
//! - **application**: authentication, inspection CRUD, analytics, legacy import
//! - **infrastructure**: SeaORM persistence, migrations, password hashing, tokens
//! - **interfaces**: REST API (with Swagger UI) and the `/dashboard` pages
//! - **server**: process lifecycle shared by the binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{config_path_from_env, default_config_path, AppConfig};

pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, AppState};
