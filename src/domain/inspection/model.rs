//! Inspection domain entity and its categorical value sets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::tags::TagSet;

/// Declares a closed set of labelled values. Labels are what clients send
/// and what gets stored; parsing is case-insensitive and yields the
/// canonical label.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("must be one of: {}", Self::labels().join(", ")))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(
    /// Yes/No flag
    YesNo {
        Yes => "Yes",
        No => "No",
    }
);

labelled_enum!(
    /// Four-step condition rating used for building envelope and roofing
    ConditionRating {
        Poor => "Poor",
        Average => "Average",
        Good => "Good",
        Excellent => "Excellent",
    }
);

labelled_enum!(
    VcpStatus {
        Completed => "Completed",
        InProgress => "Inprogress",
        NotApplicable => "Not Applicable",
        Planned => "Planned",
    }
);

labelled_enum!(
    FireProtectionStatus {
        Obsolete => "Obsolete",
        NotObsolete => "Not Obsolete",
    }
);

labelled_enum!(
    HvacType {
        Window => "Window",
        Split => "Split",
        Cassette => "Cassette",
        DuctConcealed => "Duct Concealed",
        FreeStanding => "Free Standing",
        Other => "Other",
    }
);

labelled_enum!(
    PowerSource {
        V110 => "110V",
        V220 => "220V",
        V380 => "380V",
        V480 => "480V",
    }
);

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl ConditionRating {
    /// Score used by the condition overview (Poor=1 .. Excellent=4)
    pub fn score(&self) -> u8 {
        match self {
            Self::Poor => 1,
            Self::Average => 2,
            Self::Good => 3,
            Self::Excellent => 4,
        }
    }
}

/// Inspection content, everything except the identifier.
///
/// Records built by validation always carry the required choices. Rows
/// loaded from storage may lack them when older tooling wrote blanks or
/// labels outside the allowed set.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InspectionRecord {
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

    #[schema(value_type = Vec<HvacType>)]
    pub hvac_type: TagSet<HvacType>,
    pub sprinkler: Option<YesNo>,
    pub fire_alarm: Option<YesNo>,
    #[schema(value_type = Vec<PowerSource>)]
    pub power_source: TagSet<PowerSource>,
    pub vcp_status: Option<VcpStatus>,
    pub vcp_planned_date: Option<NaiveDate>,
    pub smart_power_meter_status: Option<YesNo>,
    pub eifs: Option<YesNo>,
    pub eifs_installed_year: Option<i32>,

    pub exterior_cladding_condition: Option<ConditionRating>,
    pub interior_architectural_condition: Option<ConditionRating>,
    pub fire_protection_system_obsolete: Option<FireProtectionStatus>,
    pub hvac_condition: Option<i32>,
    pub electrical_condition: Option<i32>,
    pub roofing_condition: Option<ConditionRating>,

    pub water_proofing_warranty: Option<YesNo>,
    pub water_proofing_warranty_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub full_inspection_completed: Option<YesNo>,
}

impl InspectionRecord {
    /// Both coordinates, when the record has been geolocated.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Stored inspection
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Inspection {
    pub id: i32,
    #[serde(flatten)]
    pub record: InspectionRecord,
}

/// Optional narrowing of an inspection listing. All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct InspectionFilter {
    /// Case-insensitive substring of building name, building number or
    /// function location id
    pub search: Option<String>,
    pub zone: Option<String>,
    pub facility_type: Option<String>,
    pub full_inspection_completed: Option<YesNo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively_to_canonical_form() {
        assert_eq!("inprogress".parse::<VcpStatus>(), Ok(VcpStatus::InProgress));
        assert_eq!(" not applicable ".parse::<VcpStatus>(), Ok(VcpStatus::NotApplicable));
        assert_eq!("duct concealed".parse::<HvacType>(), Ok(HvacType::DuctConcealed));
        assert_eq!(VcpStatus::InProgress.to_string(), "Inprogress");
    }

    #[test]
    fn unknown_label_lists_allowed_values() {
        let err = "Maybe".parse::<YesNo>().unwrap_err();
        assert_eq!(err, "must be one of: Yes, No");
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&PowerSource::V380).unwrap();
        assert_eq!(json, "\"380V\"");
        let back: FireProtectionStatus = serde_json::from_str("\"Not Obsolete\"").unwrap();
        assert_eq!(back, FireProtectionStatus::NotObsolete);
    }

    #[test]
    fn condition_scores() {
        let scores: Vec<u8> = ConditionRating::ALL.iter().map(|r| r.score()).collect();
        assert_eq!(scores, vec![1, 2, 3, 4]);
    }
}
