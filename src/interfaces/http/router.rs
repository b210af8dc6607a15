//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tera::Tera;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::inspections::analytics::{
    AnalyticsReport, ConditionAverage, LabelCount, MapPoint,
};
use crate::application::{AnalyticsService, AuthService, InspectionService};
use crate::config::AppConfig;
use crate::domain::inspection::{
    ConditionRating, FireProtectionStatus, HvacType, Inspection, InspectionDraft,
    InspectionRecord, PowerSource, VcpStatus, YesNo,
};
use crate::domain::{FieldError, RepositoryProvider};
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::SeaOrmRepositoryProvider;
use crate::interfaces::dashboard::{self, DashboardState};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::metrics::{http_metrics_middleware, prometheus_handle, prometheus_metrics};
use super::modules::request_id::request_id_middleware;
use super::modules::{analytics, auth, health, inspections, metrics};

/// Everything the routes need. Handlers extract their own slice through
/// `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService>,
    pub inspections: Arc<InspectionService>,
    pub analytics: Arc<AnalyticsService>,
    pub templates: Arc<Tera>,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
    pub api_base_url: String,
    pub cookie_secure: bool,
}

impl AppState {
    /// Wire services over a connected (and migrated) database.
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Result<Self, tera::Error> {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        Ok(Self {
            auth: Arc::new(AuthService::new(
                repos.clone(),
                JwtConfig::from(&config.security),
            )),
            inspections: Arc::new(InspectionService::new(repos.clone())),
            analytics: Arc::new(AnalyticsService::new(repos)),
            templates: Arc::new(dashboard::load_templates()?),
            metrics: prometheus_handle(),
            started_at: Arc::new(Instant::now()),
            api_base_url: config.dashboard.api_base_url.clone(),
            cookie_secure: config.dashboard.cookie_secure,
            db,
        })
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            auth: Arc::clone(&s.auth),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            auth: Arc::clone(&s.auth),
        }
    }
}

impl FromRef<AppState> for inspections::InspectionState {
    fn from_ref(s: &AppState) -> Self {
        inspections::InspectionState {
            inspections: Arc::clone(&s.inspections),
        }
    }
}

impl FromRef<AppState> for analytics::AnalyticsState {
    fn from_ref(s: &AppState) -> Self {
        analytics::AnalyticsState {
            analytics: Arc::clone(&s.analytics),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for metrics::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics::MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(s: &AppState) -> Self {
        DashboardState {
            auth: Arc::clone(&s.auth),
            inspections: Arc::clone(&s.inspections),
            analytics: Arc::clone(&s.analytics),
            templates: Arc::clone(&s.templates),
            api_base_url: s.api_base_url.clone(),
            cookie_secure: s.cookie_secure,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::get_current_user,
        inspections::list_inspections,
        inspections::get_inspection,
        inspections::create_inspection,
        inspections::update_inspection,
        inspections::delete_inspection,
        analytics::get_analytics,
    ),
    components(
        schemas(
            ApiResponse<String>,
            FieldError,
            health::HealthResponse,
            health::ComponentHealth,
            auth::CredentialsForm,
            auth::TokenResponse,
            auth::UserInfo,
            auth::RegisteredResponse,
            InspectionDraft,
            InspectionRecord,
            Inspection,
            inspections::InspectionList,
            inspections::InspectionWritten,
            inspections::InspectionDeleted,
            YesNo,
            ConditionRating,
            VcpStatus,
            FireProtectionStatus,
            HvacType,
            PowerSource,
            AnalyticsReport,
            ConditionAverage,
            LabelCount,
            MapPoint,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Authentication", description = "Registration, login (bearer token) and current user"),
        (name = "Inspections", description = "Facility inspection records"),
        (name = "Analytics", description = "Aggregates over all inspections"),
    ),
    info(
        title = "Facility Inspection API",
        version = "1.0.0",
        description = "REST API for recording and reviewing facility condition inspections",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the application router: REST API, dashboard and Swagger UI
pub fn create_api_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/inspections", get(inspections::list_inspections))
        .route("/inspections/{id}", get(inspections::get_inspection))
        .route("/inspection", post(inspections::create_inspection))
        .route(
            "/inspection/{id}",
            put(inspections::update_inspection).delete(inspections::delete_inspection),
        )
        .route("/analytics", get(analytics::get_analytics))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let dashboard_routes = dashboard::routes(DashboardState::from_ref(&state));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { Redirect::to(dashboard::DASHBOARD_PREFIX) }))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(dashboard_routes)
        .merge(swagger_routes)
        .layer(CookieManagerLayer::new())
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
