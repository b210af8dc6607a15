//! Inspection aggregate
//!
//! One facility's condition-assessment record: the validated
//! [`InspectionRecord`], the lenient [`InspectionDraft`] accepted from
//! clients and legacy imports, multi-select [`TagSet`]s and the repository
//! interface.

pub mod draft;
pub mod model;
pub mod repository;
pub mod tags;

pub use draft::InspectionDraft;
pub use model::{
    ConditionRating, FireProtectionStatus, HvacType, Inspection, InspectionFilter,
    InspectionRecord, PowerSource, VcpStatus, YesNo,
};
pub use repository::InspectionRepository;
pub use tags::TagSet;
