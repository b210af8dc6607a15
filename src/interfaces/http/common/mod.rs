pub mod extract;
pub mod response;

pub use extract::{JsonBody, PathParam, ValidatedForm};
pub use response::{ApiError, ApiResponse, ApiResult};
