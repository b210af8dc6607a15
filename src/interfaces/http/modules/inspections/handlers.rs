//! Inspection CRUD handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{InspectionDeleted, InspectionList, InspectionListQuery, InspectionWritten};
use crate::application::InspectionService;
use crate::domain::inspection::{Inspection, InspectionDraft};
use crate::interfaces::http::common::{ApiResponse, ApiResult, JsonBody, PathParam};

#[derive(Clone)]
pub struct InspectionState {
    pub inspections: Arc<InspectionService>,
}

#[utoipa::path(
    get,
    path = "/inspections",
    tag = "Inspections",
    params(InspectionListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Matching inspections, ordered by id", body = ApiResponse<InspectionList>),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Invalid filter value")
    )
)]
pub async fn list_inspections(
    State(state): State<InspectionState>,
    Query(query): Query<InspectionListQuery>,
) -> ApiResult<Json<ApiResponse<InspectionList>>> {
    let filter = query.into_filter()?;
    let inspections = state.inspections.list(&filter).await?;
    Ok(Json(ApiResponse::success(InspectionList { inspections })))
}

#[utoipa::path(
    get,
    path = "/inspections/{id}",
    tag = "Inspections",
    params(("id" = i32, Path, description = "Inspection id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inspection", body = ApiResponse<Inspection>),
        (status = 404, description = "Inspection not found")
    )
)]
pub async fn get_inspection(
    State(state): State<InspectionState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Json<ApiResponse<Inspection>>> {
    let inspection = state.inspections.get(id).await?;
    Ok(Json(ApiResponse::success(inspection)))
}

#[utoipa::path(
    post,
    path = "/inspection",
    tag = "Inspections",
    request_body = InspectionDraft,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Inspection added", body = ApiResponse<InspectionWritten>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Missing or invalid fields")
    )
)]
pub async fn create_inspection(
    State(state): State<InspectionState>,
    JsonBody(draft): JsonBody<InspectionDraft>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InspectionWritten>>)> {
    let inspection = state.inspections.create(&draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(InspectionWritten::new("added", inspection))),
    ))
}

#[utoipa::path(
    put,
    path = "/inspection/{id}",
    tag = "Inspections",
    params(("id" = i32, Path, description = "Inspection id")),
    request_body = InspectionDraft,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inspection updated", body = ApiResponse<InspectionWritten>),
        (status = 404, description = "Inspection not found"),
        (status = 422, description = "Missing or invalid fields")
    )
)]
pub async fn update_inspection(
    State(state): State<InspectionState>,
    PathParam(id): PathParam<i32>,
    JsonBody(draft): JsonBody<InspectionDraft>,
) -> ApiResult<Json<ApiResponse<InspectionWritten>>> {
    let inspection = state.inspections.update(id, &draft).await?;
    Ok(Json(ApiResponse::success(InspectionWritten::new("updated", inspection))))
}

#[utoipa::path(
    delete,
    path = "/inspection/{id}",
    tag = "Inspections",
    params(("id" = i32, Path, description = "Inspection id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inspection deleted", body = ApiResponse<InspectionDeleted>),
        (status = 404, description = "Inspection not found")
    )
)]
pub async fn delete_inspection(
    State(state): State<InspectionState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Json<ApiResponse<InspectionDeleted>>> {
    state.inspections.delete(id).await?;
    Ok(Json(ApiResponse::success(InspectionDeleted {
        status: "deleted".to_string(),
        id,
    })))
}
