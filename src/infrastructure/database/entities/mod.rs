//! Database entities module

pub mod inspection;
pub mod user;

pub use inspection::Entity as Inspection;
pub use user::Entity as User;
