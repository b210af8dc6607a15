//! Inspection API DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::inspection::{Inspection, InspectionFilter, InspectionRecord, YesNo};
use crate::domain::{DomainError, DomainResult, FieldError};

/// Optional list filters. Empty values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InspectionListQuery {
    /// Substring of building name, building number or function location id
    pub search: Option<String>,
    pub zone: Option<String>,
    pub facility_type: Option<String>,
    /// `Yes` or `No`
    pub full_inspection_completed: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl InspectionListQuery {
    pub fn into_filter(self) -> DomainResult<InspectionFilter> {
        let full_inspection_completed = match non_empty(self.full_inspection_completed) {
            None => None,
            Some(raw) => Some(raw.parse::<YesNo>().map_err(|allowed| {
                DomainError::InvalidFields(vec![FieldError::new(
                    "full_inspection_completed",
                    allowed,
                )])
            })?),
        };

        Ok(InspectionFilter {
            search: non_empty(self.search),
            zone: non_empty(self.zone),
            facility_type: non_empty(self.facility_type),
            full_inspection_completed,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InspectionList {
    pub inspections: Vec<Inspection>,
}

/// Outcome of a create or update
#[derive(Debug, Serialize, ToSchema)]
pub struct InspectionWritten {
    /// `added` or `updated`
    pub status: String,
    pub id: i32,
    pub record: InspectionRecord,
}

impl InspectionWritten {
    pub fn new(status: &str, inspection: Inspection) -> Self {
        Self {
            status: status.to_string(),
            id: inspection.id,
            record: inspection.record,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InspectionDeleted {
    /// Always `deleted`
    pub status: String,
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_values_are_ignored() {
        let query = InspectionListQuery {
            search: Some("  ".into()),
            zone: Some("North".into()),
            facility_type: Some(String::new()),
            full_inspection_completed: Some("yes".into()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.zone.as_deref(), Some("North"));
        assert_eq!(filter.facility_type, None);
        assert_eq!(filter.full_inspection_completed, Some(YesNo::Yes));
    }

    #[test]
    fn unknown_completion_value_is_rejected() {
        let query = InspectionListQuery {
            full_inspection_completed: Some("Partly".into()),
            ..Default::default()
        };
        let err = query.into_filter().unwrap_err();
        assert_eq!(err.field_names(), vec!["full_inspection_completed"]);
    }
}
