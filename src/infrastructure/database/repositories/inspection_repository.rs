use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::warn;

use crate::domain::inspection::tags::TagSet;
use crate::domain::inspection::{
    Inspection, InspectionFilter, InspectionRecord, InspectionRepository,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::inspection;

pub struct SeaOrmInspectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmInspectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn label<T: ToString>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

fn record_to_active(record: &InspectionRecord) -> inspection::ActiveModel {
    inspection::ActiveModel {
        function_location_id: Set(record.function_location_id.clone()),
        sap_function_location: Set(record.sap_function_location.clone()),
        building_name: Set(record.building_name.clone()),
        building_number: Set(record.building_number.clone()),
        facility_type: Set(record.facility_type.clone()),
        function: Set(record.function.clone()),
        macro_area: Set(record.macro_area.clone()),
        micro_area: Set(record.micro_area.clone()),
        proponent: Set(record.proponent.clone()),
        zone: Set(record.zone.clone()),
        hvac_type: Set(record.hvac_type.encode()),
        sprinkler: Set(label(&record.sprinkler).unwrap_or_default()),
        fire_alarm: Set(label(&record.fire_alarm).unwrap_or_default()),
        power_source: Set(record.power_source.encode()),
        vcp_status: Set(label(&record.vcp_status).unwrap_or_default()),
        vcp_planned_date: Set(record.vcp_planned_date),
        smart_power_meter_status: Set(label(&record.smart_power_meter_status)),
        eifs: Set(label(&record.eifs)),
        eifs_installed_year: Set(record.eifs_installed_year),
        exterior_cladding_condition: Set(label(&record.exterior_cladding_condition)),
        interior_architectural_condition: Set(label(&record.interior_architectural_condition)),
        fire_protection_system_obsolete: Set(label(&record.fire_protection_system_obsolete)),
        hvac_condition: Set(record.hvac_condition),
        electrical_condition: Set(record.electrical_condition),
        roofing_condition: Set(label(&record.roofing_condition)),
        water_proofing_warranty: Set(label(&record.water_proofing_warranty)),
        water_proofing_warranty_date: Set(record.water_proofing_warranty_date),
        latitude: Set(record.latitude),
        longitude: Set(record.longitude),
        full_inspection_completed: Set(label(&record.full_inspection_completed).unwrap_or_default()),
        ..Default::default()
    }
}

/// Parse a stored label, leaving the field empty when it is blank or no
/// longer one of the allowed values.
fn stored_choice<T: FromStr<Err = String>>(id: i32, field: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(inspection_id = id, field, value = raw, "Stored label not recognized");
            None
        }
    }
}

/// Rows are decoded as stored. Nothing here rejects a row, so data written
/// by older tooling still lists and reports.
fn model_to_domain(model: inspection::Model) -> Inspection {
    let id = model.id;
    let record = InspectionRecord {
        hvac_type: TagSet::decode(&model.hvac_type),
        sprinkler: stored_choice(id, "sprinkler", Some(&model.sprinkler)),
        fire_alarm: stored_choice(id, "fire_alarm", Some(&model.fire_alarm)),
        power_source: TagSet::decode(&model.power_source),
        vcp_status: stored_choice(id, "vcp_status", Some(&model.vcp_status)),
        vcp_planned_date: model.vcp_planned_date,
        smart_power_meter_status: stored_choice(
            id,
            "smart_power_meter_status",
            model.smart_power_meter_status.as_deref(),
        ),
        eifs: stored_choice(id, "eifs", model.eifs.as_deref()),
        eifs_installed_year: model.eifs_installed_year,
        exterior_cladding_condition: stored_choice(
            id,
            "exterior_cladding_condition",
            model.exterior_cladding_condition.as_deref(),
        ),
        interior_architectural_condition: stored_choice(
            id,
            "interior_architectural_condition",
            model.interior_architectural_condition.as_deref(),
        ),
        fire_protection_system_obsolete: stored_choice(
            id,
            "fire_protection_system_obsolete",
            model.fire_protection_system_obsolete.as_deref(),
        ),
        hvac_condition: model.hvac_condition,
        electrical_condition: model.electrical_condition,
        roofing_condition: stored_choice(id, "roofing_condition", model.roofing_condition.as_deref()),
        water_proofing_warranty: stored_choice(
            id,
            "water_proofing_warranty",
            model.water_proofing_warranty.as_deref(),
        ),
        water_proofing_warranty_date: model.water_proofing_warranty_date,
        latitude: model.latitude,
        longitude: model.longitude,
        full_inspection_completed: stored_choice(
            id,
            "full_inspection_completed",
            Some(&model.full_inspection_completed),
        ),
        function_location_id: model.function_location_id,
        sap_function_location: model.sap_function_location,
        building_name: model.building_name,
        building_number: model.building_number,
        facility_type: model.facility_type,
        function: model.function,
        macro_area: model.macro_area,
        micro_area: model.micro_area,
        proponent: model.proponent,
        zone: model.zone,
    };

    Inspection { id, record }
}

fn lower_contains(column: inspection::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

fn filter_condition(filter: &InspectionFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(lower_contains(inspection::Column::BuildingName, search))
                .add(lower_contains(inspection::Column::BuildingNumber, search))
                .add(lower_contains(inspection::Column::FunctionLocationId, search)),
        );
    }
    if let Some(zone) = &filter.zone {
        condition = condition.add(inspection::Column::Zone.eq(zone.as_str()));
    }
    if let Some(facility_type) = &filter.facility_type {
        condition = condition.add(inspection::Column::FacilityType.eq(facility_type.as_str()));
    }
    if let Some(completed) = filter.full_inspection_completed {
        condition = condition.add(inspection::Column::FullInspectionCompleted.eq(completed.as_str()));
    }

    condition
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl InspectionRepository for SeaOrmInspectionRepository {
    async fn insert(&self, record: &InspectionRecord) -> DomainResult<Inspection> {
        let model = record_to_active(record).insert(&self.db).await?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Inspection>> {
        Ok(inspection::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_domain))
    }

    async fn list(&self, filter: &InspectionFilter) -> DomainResult<Vec<Inspection>> {
        let rows = inspection::Entity::find()
            .filter(filter_condition(filter))
            .order_by_asc(inspection::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, id: i32, record: &InspectionRecord) -> DomainResult<Option<Inspection>> {
        let exists = inspection::Entity::find_by_id(id).one(&self.db).await?;
        if exists.is_none() {
            return Ok(None);
        }

        let mut active = record_to_active(record);
        active.id = Set(id);
        let model = active.update(&self.db).await?;

        Ok(Some(model_to_domain(model)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let result = inspection::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(inspection::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::{HvacType, InspectionDraft, PowerSource, YesNo};
    use crate::infrastructure::database::test_connection;

    fn record(location: &str, building: &str, zone: &str, completed: &str) -> InspectionRecord {
        InspectionDraft {
            function_location_id: location.into(),
            building_name: building.into(),
            building_number: "B-7".into(),
            facility_type: "Office".into(),
            zone: zone.into(),
            hvac_type: vec!["Split".into(), "Window".into()],
            power_source: vec!["380V".into()],
            sprinkler: "Yes".into(),
            fire_alarm: "Yes".into(),
            vcp_status: "Completed".into(),
            vcp_planned_date: "2024-11-05".into(),
            latitude: "24.7".into(),
            longitude: "46.6".into(),
            full_inspection_completed: completed.into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let repo = SeaOrmInspectionRepository::new(test_connection().await);

        let original = record("FL-1", "Head Office", "North", "Yes");
        let stored = repo.insert(&original).await.unwrap();
        assert!(stored.id > 0);

        let found = repo.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(found.record, original);
        assert!(found.record.hvac_type.contains(&HvacType::Split));
        assert!(found.record.power_source.contains(&PowerSource::V380));
        assert!(repo.find_by_id(stored.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let repo = SeaOrmInspectionRepository::new(test_connection().await);
        repo.insert(&record("FL-1", "Head Office", "North", "Yes")).await.unwrap();
        repo.insert(&record("FL-2", "Pump House", "South", "No")).await.unwrap();
        repo.insert(&record("XY-3", "Guard Post", "North", "No")).await.unwrap();

        let all = repo.list(&InspectionFilter::default()).await.unwrap();
        let ids: Vec<i32> = all.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let search = InspectionFilter {
            search: Some("pump".into()),
            ..Default::default()
        };
        assert_eq!(repo.list(&search).await.unwrap().len(), 1);

        let by_location = InspectionFilter {
            search: Some("fl-".into()),
            ..Default::default()
        };
        assert_eq!(repo.list(&by_location).await.unwrap().len(), 2);

        let north_open = InspectionFilter {
            zone: Some("North".into()),
            full_inspection_completed: Some(YesNo::No),
            ..Default::default()
        };
        let rows = repo.list(&north_open).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.building_name, "Guard Post");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = SeaOrmInspectionRepository::new(test_connection().await);
        let stored = repo.insert(&record("FL-1", "Head Office", "North", "No")).await.unwrap();

        let changed = record("FL-1", "Head Office Annex", "North", "Yes");
        let updated = repo.update(stored.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.record.building_name, "Head Office Annex");
        assert!(repo.update(999, &changed).await.unwrap().is_none());

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(repo.find_by_id(stored.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    /// Row shaped like the legacy spreadsheet migration wrote them.
    async fn insert_legacy_row(db: &DatabaseConnection) -> i32 {
        let row = inspection::ActiveModel {
            function_location_id: Set("FL-OLD".into()),
            sap_function_location: Set(String::new()),
            building_name: Set("Old Depot".into()),
            building_number: Set(String::new()),
            facility_type: Set("Warehouse".into()),
            function: Set(String::new()),
            macro_area: Set(String::new()),
            micro_area: Set(String::new()),
            proponent: Set(String::new()),
            zone: Set("East".into()),
            hvac_type: Set("Window Unit, split".into()),
            sprinkler: Set("yes".into()),
            fire_alarm: Set("Unknown".into()),
            power_source: Set("{220V}".into()),
            vcp_status: Set(String::new()),
            roofing_condition: Set(Some("Fair".into())),
            full_inspection_completed: Set("No".into()),
            ..Default::default()
        };
        row.insert(db).await.unwrap().id
    }

    #[tokio::test]
    async fn test_legacy_rows_are_listed_as_stored() {
        let db = test_connection().await;
        let repo = SeaOrmInspectionRepository::new(db.clone());
        repo.insert(&record("FL-1", "Head Office", "North", "Yes")).await.unwrap();
        let legacy_id = insert_legacy_row(&db).await;

        let all = repo.list(&InspectionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let legacy = repo.find_by_id(legacy_id).await.unwrap().unwrap().record;
        assert_eq!(legacy.building_name, "Old Depot");
        assert_eq!(legacy.hvac_type.labels(), vec!["Split", "Window Unit"]);
        assert!(legacy.power_source.contains(&PowerSource::V220));
        assert_eq!(legacy.sprinkler, Some(YesNo::Yes));
        assert_eq!(legacy.fire_alarm, None);
        assert_eq!(legacy.vcp_status, None);
        assert_eq!(legacy.roofing_condition, None);
        assert_eq!(legacy.full_inspection_completed, Some(YesNo::No));
    }
}
