use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "field is required")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid fields: {}", join_fields(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Field names of an `InvalidFields` error, empty otherwise.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::InvalidFields(fields) => fields.iter().map(|f| f.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

/// Result type for domain and service operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_message_lists_every_field() {
        let err = DomainError::InvalidFields(vec![
            FieldError::required("building_name"),
            FieldError::new("sprinkler", "must be one of: Yes, No"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid fields: building_name: field is required; sprinkler: must be one of: Yes, No"
        );
        assert_eq!(err.field_names(), vec!["building_name", "sprinkler"]);
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = DomainError::not_found("Inspection", 42);
        assert_eq!(err.to_string(), "Not found: Inspection with id=42");
        assert!(err.field_names().is_empty());
    }
}
