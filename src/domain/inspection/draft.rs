//! Unvalidated inspection input
//!
//! Clients, dashboard forms and legacy spreadsheet rows all arrive as an
//! [`InspectionDraft`]: every scalar is text, every multi-select is a list of
//! labels. [`InspectionDraft::validate`] turns it into an
//! [`InspectionRecord`] or reports every offending field at once.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::model::{
    ConditionRating, FireProtectionStatus, HvacType, InspectionRecord, PowerSource, VcpStatus,
    YesNo,
};
use super::tags::{split_delimited, TagSet};
use crate::shared::errors::{DomainError, DomainResult, FieldError};

/// Inspection as submitted. Missing keys default to empty; numbers may be
/// sent as JSON numbers or text, multi-selects as a list or a
/// comma-delimited string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct InspectionDraft {
    #[serde(deserialize_with = "lenient_text")]
    pub function_location_id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sap_function_location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub building_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub building_number: String,
    #[serde(deserialize_with = "lenient_text")]
    pub facility_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub function: String,
    #[serde(deserialize_with = "lenient_text")]
    pub macro_area: String,
    #[serde(deserialize_with = "lenient_text")]
    pub micro_area: String,
    #[serde(deserialize_with = "lenient_text")]
    pub proponent: String,
    #[serde(deserialize_with = "lenient_text")]
    pub zone: String,

    #[serde(deserialize_with = "lenient_tags")]
    pub hvac_type: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sprinkler: String,
    #[serde(deserialize_with = "lenient_text")]
    pub fire_alarm: String,
    #[serde(deserialize_with = "lenient_tags")]
    pub power_source: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub vcp_status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub vcp_planned_date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub smart_power_meter_status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub eifs: String,
    #[serde(deserialize_with = "lenient_text")]
    pub eifs_installed_year: String,

    #[serde(deserialize_with = "lenient_text")]
    pub exterior_cladding_condition: String,
    #[serde(deserialize_with = "lenient_text")]
    pub interior_architectural_condition: String,
    #[serde(deserialize_with = "lenient_text")]
    pub fire_protection_system_obsolete: String,
    #[serde(deserialize_with = "lenient_text")]
    pub hvac_condition: String,
    #[serde(deserialize_with = "lenient_text")]
    pub electrical_condition: String,
    #[serde(deserialize_with = "lenient_text")]
    pub roofing_condition: String,

    #[serde(deserialize_with = "lenient_text")]
    pub water_proofing_warranty: String,
    #[serde(deserialize_with = "lenient_text")]
    pub water_proofing_warranty_date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub latitude: String,
    #[serde(deserialize_with = "lenient_text")]
    pub longitude: String,

    #[serde(deserialize_with = "lenient_text")]
    pub full_inspection_completed: String,
}

impl InspectionDraft {
    /// Check required fields and allowed values, collecting every violation.
    pub fn validate(&self) -> DomainResult<InspectionRecord> {
        let mut v = Violations::default();

        let function_location_id = v.required_text("function_location_id", &self.function_location_id);
        let building_name = v.required_text("building_name", &self.building_name);
        let facility_type = v.required_text("facility_type", &self.facility_type);

        let hvac_type = v.tags::<HvacType>("hvac_type", &self.hvac_type);
        let sprinkler = v.required_choice::<YesNo>("sprinkler", &self.sprinkler);
        let fire_alarm = v.required_choice::<YesNo>("fire_alarm", &self.fire_alarm);
        let power_source = v.tags::<PowerSource>("power_source", &self.power_source);
        let vcp_status = v.required_choice::<VcpStatus>("vcp_status", &self.vcp_status);
        let vcp_planned_date = v.date("vcp_planned_date", &self.vcp_planned_date);
        let smart_power_meter_status =
            v.choice::<YesNo>("smart_power_meter_status", &self.smart_power_meter_status);
        let eifs = v.choice::<YesNo>("eifs", &self.eifs);
        let eifs_installed_year = v.integer("eifs_installed_year", &self.eifs_installed_year);

        let exterior_cladding_condition = v.choice::<ConditionRating>(
            "exterior_cladding_condition",
            &self.exterior_cladding_condition,
        );
        let interior_architectural_condition = v.choice::<ConditionRating>(
            "interior_architectural_condition",
            &self.interior_architectural_condition,
        );
        let fire_protection_system_obsolete = v.choice::<FireProtectionStatus>(
            "fire_protection_system_obsolete",
            &self.fire_protection_system_obsolete,
        );
        let hvac_condition = v.integer("hvac_condition", &self.hvac_condition);
        let electrical_condition = v.integer("electrical_condition", &self.electrical_condition);
        let roofing_condition = v.choice::<ConditionRating>("roofing_condition", &self.roofing_condition);

        let water_proofing_warranty =
            v.choice::<YesNo>("water_proofing_warranty", &self.water_proofing_warranty);
        let water_proofing_warranty_date =
            v.date("water_proofing_warranty_date", &self.water_proofing_warranty_date);
        let latitude = v.coordinate("latitude", &self.latitude, 90.0);
        let longitude = v.coordinate("longitude", &self.longitude, 180.0);

        let full_inspection_completed =
            v.required_choice::<YesNo>("full_inspection_completed", &self.full_inspection_completed);

        if !v.errors.is_empty() {
            return Err(DomainError::InvalidFields(v.errors));
        }

        Ok(InspectionRecord {
            function_location_id,
            sap_function_location: self.sap_function_location.trim().to_string(),
            building_name,
            building_number: self.building_number.trim().to_string(),
            facility_type,
            function: self.function.trim().to_string(),
            macro_area: self.macro_area.trim().to_string(),
            micro_area: self.micro_area.trim().to_string(),
            proponent: self.proponent.trim().to_string(),
            zone: self.zone.trim().to_string(),
            hvac_type,
            sprinkler,
            fire_alarm,
            power_source,
            vcp_status,
            vcp_planned_date,
            smart_power_meter_status,
            eifs,
            eifs_installed_year,
            exterior_cladding_condition,
            interior_architectural_condition,
            fire_protection_system_obsolete,
            hvac_condition,
            electrical_condition,
            roofing_condition,
            water_proofing_warranty,
            water_proofing_warranty_date,
            latitude,
            longitude,
            full_inspection_completed,
        })
    }
}

impl From<&InspectionRecord> for InspectionDraft {
    fn from(r: &InspectionRecord) -> Self {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        Self {
            function_location_id: r.function_location_id.clone(),
            sap_function_location: r.sap_function_location.clone(),
            building_name: r.building_name.clone(),
            building_number: r.building_number.clone(),
            facility_type: r.facility_type.clone(),
            function: r.function.clone(),
            macro_area: r.macro_area.clone(),
            micro_area: r.micro_area.clone(),
            proponent: r.proponent.clone(),
            zone: r.zone.clone(),
            hvac_type: r.hvac_type.labels(),
            sprinkler: opt(&r.sprinkler),
            fire_alarm: opt(&r.fire_alarm),
            power_source: r.power_source.labels(),
            vcp_status: opt(&r.vcp_status),
            vcp_planned_date: opt(&r.vcp_planned_date),
            smart_power_meter_status: opt(&r.smart_power_meter_status),
            eifs: opt(&r.eifs),
            eifs_installed_year: opt(&r.eifs_installed_year),
            exterior_cladding_condition: opt(&r.exterior_cladding_condition),
            interior_architectural_condition: opt(&r.interior_architectural_condition),
            fire_protection_system_obsolete: opt(&r.fire_protection_system_obsolete),
            hvac_condition: opt(&r.hvac_condition),
            electrical_condition: opt(&r.electrical_condition),
            roofing_condition: opt(&r.roofing_condition),
            water_proofing_warranty: opt(&r.water_proofing_warranty),
            water_proofing_warranty_date: opt(&r.water_proofing_warranty_date),
            latitude: opt(&r.latitude),
            longitude: opt(&r.longitude),
            full_inspection_completed: opt(&r.full_inspection_completed),
        }
    }
}

#[derive(Default)]
struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required_text(&mut self, field: &str, raw: &str) -> String {
        let value = raw.trim();
        if value.is_empty() {
            self.errors.push(FieldError::required(field));
        }
        value.to_string()
    }

    fn required_choice<T: FromStr<Err = String>>(&mut self, field: &str, raw: &str) -> Option<T> {
        if raw.trim().is_empty() {
            self.errors.push(FieldError::required(field));
            return None;
        }
        self.choice(field, raw)
    }

    fn choice<T: FromStr<Err = String>>(&mut self, field: &str, raw: &str) -> Option<T> {
        if raw.trim().is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(value) => Some(value),
            Err(allowed) => {
                self.reject(field, allowed);
                None
            }
        }
    }

    fn tags<T>(&mut self, field: &str, raw: &[String]) -> TagSet<T>
    where
        T: Ord + Copy + FromStr<Err = String> + std::fmt::Display,
    {
        TagSet::parse(raw).unwrap_or_else(|message| {
            self.reject(field, message);
            TagSet::new()
        })
    }

    fn integer(&mut self, field: &str, raw: &str) -> Option<i32> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(value) = raw.parse::<i32>() {
            return Some(value);
        }
        // Spreadsheet exports render whole numbers as "2015.0"
        match raw.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Some(f as i32),
            _ => {
                self.reject(field, "must be a whole number");
                None
            }
        }
    }

    fn date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        // A full timestamp contributes its date part
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").or_else(|_| {
            NaiveDateTime::parse_from_str(&raw.replacen(' ', "T", 1), "%Y-%m-%dT%H:%M:%S%.f")
                .map(|stamp| stamp.date())
        });
        match parsed {
            Ok(date) => Some(date),
            Err(_) => {
                self.reject(field, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    fn coordinate(&mut self, field: &str, raw: &str, limit: f64) -> Option<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value.abs() <= limit => Some(value),
            Ok(_) => {
                self.reject(field, format!("must be between -{limit} and {limit}"));
                None
            }
            Err(_) => {
                self.reject(field, "must be a number");
                None
            }
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("Yes".to_string()),
        Value::Bool(false) => Ok("No".to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text or number, found {}",
            other
        ))),
    }
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(split_delimited(&s)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "expected tag label, found {}",
                    other
                ))),
            })
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "expected list or comma-separated text, found {}",
            other
        ))),
    }
}
