//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod inspection_repository;
pub mod repository_provider;
pub mod user_repository;

pub use inspection_repository::SeaOrmInspectionRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
