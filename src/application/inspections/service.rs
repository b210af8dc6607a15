//! Inspection CRUD use-cases

use std::sync::Arc;

use tracing::info;

use crate::domain::inspection::{Inspection, InspectionDraft, InspectionFilter};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

const ENTITY: &str = "Inspection";

fn record_write(operation: &'static str) {
    metrics::counter!("inspections_written_total", "operation" => operation).increment(1);
}

pub struct InspectionService {
    repos: Arc<dyn RepositoryProvider>,
}

impl InspectionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Validate and store a new inspection.
    pub async fn create(&self, draft: &InspectionDraft) -> DomainResult<Inspection> {
        let record = draft.validate()?;
        let inspection = self.repos.inspections().insert(&record).await?;

        record_write("create");
        info!(
            inspection_id = inspection.id,
            function_location_id = %inspection.record.function_location_id,
            "Inspection added"
        );
        Ok(inspection)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Inspection> {
        self.repos
            .inspections()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn list(&self, filter: &InspectionFilter) -> DomainResult<Vec<Inspection>> {
        self.repos.inspections().list(filter).await
    }

    /// Replace an inspection. Input is validated before the id is looked up.
    pub async fn update(&self, id: i32, draft: &InspectionDraft) -> DomainResult<Inspection> {
        let record = draft.validate()?;
        let inspection = self
            .repos
            .inspections()
            .update(id, &record)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        record_write("update");
        info!(inspection_id = id, "Inspection updated");
        Ok(inspection)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.repos.inspections().delete(id).await? {
            return Err(DomainError::not_found(ENTITY, id));
        }

        record_write("delete");
        info!(inspection_id = id, "Inspection deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::PowerSource;
    use crate::infrastructure::database::{test_connection, SeaOrmRepositoryProvider};

    async fn service() -> InspectionService {
        InspectionService::new(Arc::new(SeaOrmRepositoryProvider::new(test_connection().await)))
    }

    fn draft(building: &str) -> InspectionDraft {
        InspectionDraft {
            function_location_id: "FL-9".into(),
            building_name: building.into(),
            facility_type: "Workshop".into(),
            sprinkler: "no".into(),
            fire_alarm: "YES".into(),
            vcp_status: "inprogress".into(),
            full_inspection_completed: "No".into(),
            power_source: vec!["480V".into(), "110V".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_reads_back() {
        let svc = service().await;
        let created = svc.create(&draft("Workshop 2")).await.unwrap();

        let read = svc.get(created.id).await.unwrap();
        assert_eq!(read.record.vcp_status.map(|s| s.as_str()), Some("Inprogress"));
        assert_eq!(read.record.power_source.labels(), vec!["110V", "480V"]);
        assert!(read.record.power_source.contains(&PowerSource::V480));
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let svc = service().await;
        let err = svc.create(&draft("")).await.unwrap_err();
        assert_eq!(err.field_names(), vec!["building_name"]);
        assert!(svc.list(&InspectionFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_checks_input_before_existence() {
        let svc = service().await;

        let err = svc.update(41, &draft("")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidFields(_)));

        let err = svc.update(41, &draft("Depot")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let created = svc.create(&draft("Depot")).await.unwrap();
        let updated = svc.update(created.id, &draft("Depot East")).await.unwrap();
        assert_eq!(updated.record.building_name, "Depot East");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let svc = service().await;
        assert!(matches!(svc.delete(7).await, Err(DomainError::NotFound { .. })));

        let created = svc.create(&draft("Depot")).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.get(created.id).await, Err(DomainError::NotFound { .. })));
    }
}
