use async_trait::async_trait;

use super::{Inspection, InspectionFilter, InspectionRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait InspectionRepository: Send + Sync {
    async fn insert(&self, record: &InspectionRecord) -> DomainResult<Inspection>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Inspection>>;

    /// Inspections matching `filter`, ordered by id.
    async fn list(&self, filter: &InspectionFilter) -> DomainResult<Vec<Inspection>>;

    /// Replace every field of an existing inspection. `None` if `id` is unknown.
    async fn update(&self, id: i32, record: &InspectionRecord) -> DomainResult<Option<Inspection>>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: i32) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<u64>;
}
