//! Analytics API handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::{AnalyticsReport, AnalyticsService};
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct AnalyticsState {
    pub analytics: Arc<AnalyticsService>,
}

#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Condition overview, facility-type and status counts, map points", body = ApiResponse<AnalyticsReport>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_analytics(
    State(state): State<AnalyticsState>,
) -> ApiResult<Json<ApiResponse<AnalyticsReport>>> {
    let report = state.analytics.report().await?;
    Ok(Json(ApiResponse::success(report)))
}
