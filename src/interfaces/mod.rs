//! Interface layer: REST API and server-rendered dashboard

pub mod dashboard;
pub mod http;
