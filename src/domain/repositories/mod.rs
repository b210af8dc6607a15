//! Repository access for the domain layer

use super::inspection::InspectionRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_username("admin").await?;
///     let rows = repos.inspections().list(&InspectionFilter::default()).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn inspections(&self) -> &dyn InspectionRepository;
}
