pub mod errors;
pub mod shutdown;

pub use errors::{DomainError, DomainResult, FieldError};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
