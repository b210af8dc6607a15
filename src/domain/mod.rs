pub mod inspection;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use inspection::{
    Inspection, InspectionDraft, InspectionFilter, InspectionRecord, InspectionRepository, YesNo,
};
pub use repositories::RepositoryProvider;
pub use user::{NewUser, User, UserRepository};

pub use crate::shared::errors::{DomainError, DomainResult, FieldError};
