//! Inspection entity for database
//!
//! Categorical values are stored as their labels, multi-selects as
//! `", "`-delimited text.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inspections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub function_location_id: String,
    pub sap_function_location: String,
    pub building_name: String,
    pub building_number: String,
    pub facility_type: String,
    pub function: String,
    pub macro_area: String,
    pub micro_area: String,
    pub proponent: String,
    pub zone: String,
    pub hvac_type: String,
    pub sprinkler: String,
    pub fire_alarm: String,
    pub power_source: String,
    pub vcp_status: String,
    pub vcp_planned_date: Option<NaiveDate>,
    pub smart_power_meter_status: Option<String>,
    pub eifs: Option<String>,
    pub eifs_installed_year: Option<i32>,
    pub exterior_cladding_condition: Option<String>,
    pub interior_architectural_condition: Option<String>,
    pub fire_protection_system_obsolete: Option<String>,
    pub hvac_condition: Option<i32>,
    pub electrical_condition: Option<i32>,
    pub roofing_condition: Option<String>,
    pub water_proofing_warranty: Option<String>,
    pub water_proofing_warranty_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    pub full_inspection_completed: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

