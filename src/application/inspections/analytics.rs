//! Aggregations behind the analytics page and `GET /analytics`

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::inspection::{
    ConditionRating, Inspection, InspectionFilter, InspectionRecord, YesNo,
};
use crate::domain::{DomainResult, RepositoryProvider};

/// Mean condition score of one category
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConditionAverage {
    pub category: String,
    /// `None` when no inspection carries a value
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Geolocated inspection for the map
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapPoint {
    pub id: i32,
    pub building_name: String,
    pub facility_type: String,
    pub zone: String,
    pub full_inspection_completed: Option<YesNo>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalyticsReport {
    pub total_inspections: u64,
    pub condition_overview: Vec<ConditionAverage>,
    /// Most common facility type first
    pub facility_types: Vec<LabelCount>,
    /// Completed inspections ("Yes") first
    pub inspection_status: Vec<LabelCount>,
    pub map_points: Vec<MapPoint>,
}

/// Text ratings score 1..=4; a missing rating counts as 0.
fn rated_average(
    inspections: &[Inspection],
    rating: impl Fn(&InspectionRecord) -> Option<ConditionRating>,
) -> Option<f64> {
    if inspections.is_empty() {
        return None;
    }
    let total: u32 = inspections
        .iter()
        .map(|i| rating(&i.record).map_or(0, |r| u32::from(r.score())))
        .sum();
    Some(f64::from(total) / inspections.len() as f64)
}

/// Numeric scores average over the inspections that have one.
fn numeric_average(
    inspections: &[Inspection],
    score: impl Fn(&InspectionRecord) -> Option<i32>,
) -> Option<f64> {
    let values: Vec<f64> = inspections
        .iter()
        .filter_map(|i| score(&i.record))
        .map(f64::from)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn build_report(inspections: &[Inspection]) -> AnalyticsReport {
    let condition_overview = vec![
        ConditionAverage {
            category: "Exterior Cladding".into(),
            average: rated_average(inspections, |r| r.exterior_cladding_condition),
        },
        ConditionAverage {
            category: "Interior Architectural".into(),
            average: rated_average(inspections, |r| r.interior_architectural_condition),
        },
        ConditionAverage {
            category: "Hvac".into(),
            average: numeric_average(inspections, |r| r.hvac_condition),
        },
        ConditionAverage {
            category: "Electrical".into(),
            average: numeric_average(inspections, |r| r.electrical_condition),
        },
        ConditionAverage {
            category: "Roofing".into(),
            average: rated_average(inspections, |r| r.roofing_condition),
        },
    ];

    let mut by_type: HashMap<&str, u64> = HashMap::new();
    for inspection in inspections {
        *by_type.entry(inspection.record.facility_type.as_str()).or_default() += 1;
    }
    let mut facility_types: Vec<LabelCount> = by_type
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    facility_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let inspection_status = YesNo::ALL
        .iter()
        .map(|status| LabelCount {
            label: status.to_string(),
            count: inspections
                .iter()
                .filter(|i| i.record.full_inspection_completed == Some(*status))
                .count() as u64,
        })
        .collect();

    let map_points = inspections
        .iter()
        .filter_map(|i| {
            let (latitude, longitude) = i.record.coordinates()?;
            Some(MapPoint {
                id: i.id,
                building_name: i.record.building_name.clone(),
                facility_type: i.record.facility_type.clone(),
                zone: i.record.zone.clone(),
                full_inspection_completed: i.record.full_inspection_completed,
                latitude,
                longitude,
            })
        })
        .collect();

    AnalyticsReport {
        total_inspections: inspections.len() as u64,
        condition_overview,
        facility_types,
        inspection_status,
        map_points,
    }
}

pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AnalyticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Report over every stored inspection
    pub async fn report(&self) -> DomainResult<AnalyticsReport> {
        let inspections = self.repos.inspections().list(&InspectionFilter::default()).await?;
        Ok(build_report(&inspections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::InspectionDraft;

    fn inspection(id: i32, facility_type: &str, completed: &str, roofing: &str) -> Inspection {
        let record = InspectionDraft {
            function_location_id: format!("FL-{id}"),
            building_name: format!("Building {id}"),
            facility_type: facility_type.into(),
            sprinkler: "Yes".into(),
            fire_alarm: "Yes".into(),
            vcp_status: "Planned".into(),
            full_inspection_completed: completed.into(),
            roofing_condition: roofing.into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Inspection { id, record }
    }

    fn average(report: &AnalyticsReport, category: &str) -> Option<f64> {
        report
            .condition_overview
            .iter()
            .find(|c| c.category == category)
            .and_then(|c| c.average)
    }

    #[test]
    fn text_ratings_score_one_to_four_and_missing_is_zero() {
        let rows = vec![
            inspection(1, "Office", "Yes", "Excellent"),
            inspection(2, "Office", "No", "Poor"),
            inspection(3, "Depot", "No", ""),
        ];
        let report = build_report(&rows);

        // (4 + 1 + 0) / 3
        assert_eq!(average(&report, "Roofing"), Some(5.0 / 3.0));
        assert_eq!(average(&report, "Exterior Cladding"), Some(0.0));
        assert_eq!(average(&report, "Hvac"), None);
    }

    #[test]
    fn numeric_conditions_average_present_values() {
        let mut rows = vec![
            inspection(1, "Office", "Yes", ""),
            inspection(2, "Office", "Yes", ""),
        ];
        rows[0].record.hvac_condition = Some(2);
        rows[0].record.electrical_condition = Some(5);
        rows[1].record.electrical_condition = Some(3);

        let report = build_report(&rows);
        assert_eq!(average(&report, "Hvac"), Some(2.0));
        assert_eq!(average(&report, "Electrical"), Some(4.0));
    }

    #[test]
    fn counts_types_and_statuses() {
        let rows = vec![
            inspection(1, "Depot", "No", ""),
            inspection(2, "Office", "No", ""),
            inspection(3, "Office", "Yes", ""),
        ];
        let report = build_report(&rows);

        assert_eq!(report.total_inspections, 3);
        assert_eq!(report.facility_types[0], LabelCount { label: "Office".into(), count: 2 });
        assert_eq!(report.facility_types[1], LabelCount { label: "Depot".into(), count: 1 });
        assert_eq!(
            report.inspection_status,
            vec![
                LabelCount { label: "Yes".into(), count: 1 },
                LabelCount { label: "No".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn status_counts_skip_records_without_completion() {
        let mut rows = vec![inspection(1, "Office", "Yes", ""), inspection(2, "Office", "No", "")];
        rows[1].record.full_inspection_completed = None;

        let report = build_report(&rows);
        assert_eq!(report.total_inspections, 2);
        assert_eq!(report.inspection_status[0].count, 1);
        assert_eq!(report.inspection_status[1].count, 0);
    }

    #[test]
    fn map_points_need_both_coordinates() {
        let mut rows = vec![inspection(1, "Office", "Yes", ""), inspection(2, "Office", "No", "")];
        rows[0].record.latitude = Some(21.5);
        rows[0].record.longitude = Some(39.2);
        rows[1].record.latitude = Some(21.6);

        let report = build_report(&rows);
        assert_eq!(report.map_points.len(), 1);
        assert_eq!(report.map_points[0].id, 1);
    }

    #[test]
    fn empty_report() {
        let report = build_report(&[]);
        assert_eq!(report.total_inspections, 0);
        assert!(report.condition_overview.iter().all(|c| c.average.is_none()));
        assert!(report.inspection_status.iter().all(|s| s.count == 0));
    }
}
