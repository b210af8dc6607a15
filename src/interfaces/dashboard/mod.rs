//! Server-rendered dashboard
//!
//! Login, inspection list, add/edit forms, analytics and help pages under
//! `/dashboard`. Pages call the application services in-process and keep
//! the bearer token in an HTTP-only cookie.

pub mod charts;
pub mod forms;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod templates;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tera::Tera;

use crate::application::{AnalyticsService, AuthService, InspectionService};

pub use navigation::{navigate, Navigation, Page, DASHBOARD_PREFIX};
pub use templates::load_templates;

#[derive(Clone)]
pub struct DashboardState {
    pub auth: Arc<AuthService>,
    pub inspections: Arc<InspectionService>,
    pub analytics: Arc<AnalyticsService>,
    pub templates: Arc<Tera>,
    /// Shown in the page footer
    pub api_base_url: String,
    pub cookie_secure: bool,
}

pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard", get(pages::show_page))
        .route("/dashboard/", get(pages::show_page))
        .route(
            "/dashboard/login",
            get(pages::show_page).post(pages::login_submit),
        )
        .route("/dashboard/logout", post(pages::logout))
        .route(
            "/dashboard/add-inspection",
            get(pages::show_page).post(pages::add_submit),
        )
        .route(
            "/dashboard/edit-inspection/{id}",
            get(pages::show_page).post(pages::edit_submit),
        )
        .route(
            "/dashboard/edit-inspection/{id}/delete",
            post(pages::delete_submit),
        )
        .route("/dashboard/{*rest}", get(pages::show_page))
        .with_state(state)
}
