//! Chart geometry for the analytics page
//!
//! Templates only place shapes; every width, arc and colour is computed
//! here from the [`AnalyticsReport`].

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::Serialize;

use crate::application::AnalyticsReport;

/// Highest condition score, the full width of a condition bar.
const MAX_SCORE: f64 = 4.0;

const PIE_CENTER: f64 = 100.0;
const PIE_RADIUS: f64 = 90.0;

const PIE_COLORS: &[&str] = &[
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef",
];

const ZONE_COLORS: &[&str] = &[
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
];

const STATUS_YES: &str = "#28a745";
const STATUS_NO: &str = "#dc3545";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    /// Text next to the bar
    pub display: String,
    /// Bar length as a share of the plot width, 0 to 100
    pub percent: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: u64,
    pub percent: f64,
    /// SVG path in a 200x200 view box
    pub path: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneColor {
    pub zone: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: i32,
    pub building_name: String,
    pub facility_type: String,
    pub zone: String,
    pub completed: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsCharts {
    pub condition_bars: Vec<Bar>,
    pub facility_slices: Vec<Slice>,
    pub status_bars: Vec<Bar>,
    pub zones: Vec<ZoneColor>,
    pub markers: Vec<Marker>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn polar(angle: f64) -> (f64, f64) {
    (
        PIE_CENTER + PIE_RADIUS * angle.cos(),
        PIE_CENTER + PIE_RADIUS * angle.sin(),
    )
}

/// Wedge from `start` to `end`, angles in radians clockwise from 12 o'clock.
fn wedge_path(start: f64, end: f64) -> String {
    if end - start >= TAU - 1e-9 {
        let left = PIE_CENTER - PIE_RADIUS;
        let right = PIE_CENTER + PIE_RADIUS;
        return format!(
            "M {left:.2} {c:.2} A {r:.2} {r:.2} 0 1 1 {right:.2} {c:.2} A {r:.2} {r:.2} 0 1 1 {left:.2} {c:.2} Z",
            c = PIE_CENTER,
            r = PIE_RADIUS,
        );
    }
    let (x0, y0) = polar(start - FRAC_PI_2);
    let (x1, y1) = polar(end - FRAC_PI_2);
    let large_arc = u8::from(end - start > PI);
    format!(
        "M {c:.2} {c:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z",
        c = PIE_CENTER,
        r = PIE_RADIUS,
    )
}

fn condition_bars(report: &AnalyticsReport) -> Vec<Bar> {
    report
        .condition_overview
        .iter()
        .map(|row| Bar {
            label: row.category.clone(),
            display: row
                .average
                .map(|avg| format!("{avg:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            percent: row
                .average
                .map(|avg| round1((avg / MAX_SCORE).clamp(0.0, 1.0) * 100.0))
                .unwrap_or(0.0),
            color: PIE_COLORS[2].to_string(),
        })
        .collect()
}

fn facility_slices(report: &AnalyticsReport) -> Vec<Slice> {
    let total: u64 = report.facility_types.iter().map(|row| row.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    report
        .facility_types
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let share = row.count as f64 / total as f64;
            let end = start + share * TAU;
            let slice = Slice {
                label: row.label.clone(),
                count: row.count,
                percent: round1(share * 100.0),
                path: wedge_path(start, end),
                color: PIE_COLORS[idx % PIE_COLORS.len()].to_string(),
            };
            start = end;
            slice
        })
        .collect()
}

fn status_bars(report: &AnalyticsReport) -> Vec<Bar> {
    let max = report
        .inspection_status
        .iter()
        .map(|row| row.count)
        .max()
        .unwrap_or(0);

    report
        .inspection_status
        .iter()
        .map(|row| Bar {
            label: row.label.clone(),
            display: row.count.to_string(),
            percent: if max == 0 {
                0.0
            } else {
                round1(row.count as f64 / max as f64 * 100.0)
            },
            color: if row.label == "Yes" { STATUS_YES } else { STATUS_NO }.to_string(),
        })
        .collect()
}

/// Colour per zone in order of first appearance. Blank zones share one entry.
fn zone_colors(report: &AnalyticsReport) -> Vec<ZoneColor> {
    let mut zones: Vec<ZoneColor> = Vec::new();
    for point in &report.map_points {
        let zone = zone_label(&point.zone);
        if zones.iter().all(|z| z.zone != zone) {
            zones.push(ZoneColor {
                color: ZONE_COLORS[zones.len() % ZONE_COLORS.len()].to_string(),
                zone,
            });
        }
    }
    zones
}

fn zone_label(zone: &str) -> String {
    match zone.trim() {
        "" => "Unknown".to_string(),
        zone => zone.to_string(),
    }
}

pub fn build_charts(report: &AnalyticsReport) -> AnalyticsCharts {
    let zones = zone_colors(report);
    let markers = report
        .map_points
        .iter()
        .map(|point| {
            let zone = zone_label(&point.zone);
            let color = zones
                .iter()
                .find(|z| z.zone == zone)
                .map(|z| z.color.clone())
                .unwrap_or_else(|| ZONE_COLORS[0].to_string());
            Marker {
                id: point.id,
                building_name: point.building_name.clone(),
                facility_type: point.facility_type.clone(),
                completed: point
                    .full_inspection_completed
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                latitude: point.latitude,
                longitude: point.longitude,
                zone,
                color,
            }
        })
        .collect();

    AnalyticsCharts {
        condition_bars: condition_bars(report),
        facility_slices: facility_slices(report),
        status_bars: status_bars(report),
        zones,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::inspections::analytics::{ConditionAverage, LabelCount, MapPoint};
    use crate::domain::inspection::YesNo;

    fn report() -> AnalyticsReport {
        AnalyticsReport {
            total_inspections: 4,
            condition_overview: vec![
                ConditionAverage { category: "Roofing".into(), average: Some(3.0) },
                ConditionAverage { category: "Hvac".into(), average: None },
            ],
            facility_types: vec![
                LabelCount { label: "Office".into(), count: 3 },
                LabelCount { label: "Depot".into(), count: 1 },
            ],
            inspection_status: vec![
                LabelCount { label: "Yes".into(), count: 1 },
                LabelCount { label: "No".into(), count: 2 },
            ],
            map_points: vec![
                point(1, "North", Some(YesNo::Yes)),
                point(2, "South", None),
                point(3, "North", Some(YesNo::No)),
                point(4, " ", None),
            ],
        }
    }

    fn point(id: i32, zone: &str, completed: Option<YesNo>) -> MapPoint {
        MapPoint {
            id,
            building_name: format!("Building {id}"),
            facility_type: "Office".into(),
            zone: zone.into(),
            full_inspection_completed: completed,
            latitude: 24.7,
            longitude: 46.6,
        }
    }

    #[test]
    fn condition_bars_scale_to_the_top_score() {
        let charts = build_charts(&report());
        assert_eq!(charts.condition_bars[0].percent, 75.0);
        assert_eq!(charts.condition_bars[0].display, "3.00");
        assert_eq!(charts.condition_bars[1].percent, 0.0);
        assert_eq!(charts.condition_bars[1].display, "n/a");
    }

    #[test]
    fn slices_cover_the_whole_pie() {
        let charts = build_charts(&report());
        let slices = &charts.facility_slices;
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percent, 75.0);
        assert_eq!(slices[1].percent, 25.0);
        // Three quarters needs the large-arc flag, one quarter does not
        assert!(slices[0].path.contains(" 0 1 1 "), "{}", slices[0].path);
        assert!(slices[1].path.contains(" 0 0 1 "), "{}", slices[1].path);
        assert!(slices[0].path.starts_with("M 100.00 100.00 L 100.00 10.00"));
    }

    #[test]
    fn single_type_is_a_full_circle() {
        let mut single = report();
        single.facility_types.truncate(1);
        let charts = build_charts(&single);
        assert_eq!(charts.facility_slices[0].percent, 100.0);
        assert!(charts.facility_slices[0].path.starts_with("M 10.00 100.00 A"));
    }

    #[test]
    fn status_bars_are_relative_to_the_largest_count() {
        let charts = build_charts(&report());
        assert_eq!(charts.status_bars[0].percent, 50.0);
        assert_eq!(charts.status_bars[0].color, STATUS_YES);
        assert_eq!(charts.status_bars[1].percent, 100.0);
        assert_eq!(charts.status_bars[1].color, STATUS_NO);
    }

    #[test]
    fn markers_share_a_colour_per_zone() {
        let charts = build_charts(&report());
        let zones: Vec<&str> = charts.zones.iter().map(|z| z.zone.as_str()).collect();
        assert_eq!(zones, vec!["North", "South", "Unknown"]);

        let markers = &charts.markers;
        assert_eq!(markers[0].color, markers[2].color);
        assert_ne!(markers[0].color, markers[1].color);
        assert_eq!(markers[1].completed, "Unknown");
        assert_eq!(markers[3].zone, "Unknown");
    }

    #[test]
    fn empty_report_has_no_shapes() {
        let empty = AnalyticsReport {
            total_inspections: 0,
            condition_overview: Vec::new(),
            facility_types: Vec::new(),
            inspection_status: vec![LabelCount { label: "Yes".into(), count: 0 }],
            map_points: Vec::new(),
        };
        let charts = build_charts(&empty);
        assert!(charts.facility_slices.is_empty());
        assert_eq!(charts.status_bars[0].percent, 0.0);
        assert!(charts.markers.is_empty());
    }
}
