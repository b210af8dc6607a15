//! Dashboard page handlers

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tera::Context;
use tower_cookies::Cookies;
use tracing::warn;

use super::charts::build_charts;
use super::forms::{draft_from_pairs, LoginForm};
use super::navigation::{navigate, Navigation, Page};
use super::session::{current_user, end_session, start_session};
use super::templates::render;
use super::DashboardState;
use crate::domain::inspection::{
    ConditionRating, FireProtectionStatus, HvacType, InspectionDraft, PowerSource, VcpStatus,
    YesNo,
};
use crate::domain::{DomainError, User};
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::modules::inspections::InspectionListQuery;

/// Query string of dashboard pages: list filters plus post-redirect notices
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub search: Option<String>,
    pub zone: Option<String>,
    pub facility_type: Option<String>,
    pub full_inspection_completed: Option<String>,
    pub deleted: Option<i32>,
    pub missing: Option<i32>,
}

impl PageQuery {
    fn list_query(&self) -> InspectionListQuery {
        InspectionListQuery {
            search: self.search.clone(),
            zone: self.zone.clone(),
            facility_type: self.facility_type.clone(),
            full_inspection_completed: self.full_inspection_completed.clone(),
        }
    }
}

fn base_context(state: &DashboardState, user: Option<&User>, page: &str) -> Context {
    let mut context = Context::new();
    context.insert("page", page);
    context.insert("api_base_url", &state.api_base_url);
    context.insert("username", &user.map(|u| u.username.as_str()));
    context.insert("notice", &None::<String>);
    context.insert("error", &None::<String>);
    context
}

fn redirect(page: Page) -> Response {
    Redirect::to(&page.path()).into_response()
}

async fn require_user(state: &DashboardState, cookies: &Cookies) -> Result<User, Response> {
    current_user(&state.auth, cookies)
        .await
        .ok_or_else(|| redirect(Page::Login))
}

fn field_errors(error: &DomainError) -> HashMap<String, String> {
    match error {
        DomainError::InvalidFields(fields) => fields
            .iter()
            .map(|f| (f.field.clone(), f.message.clone()))
            .collect(),
        _ => HashMap::new(),
    }
}

// ── Page rendering ──────────────────────────────────────────────

/// Every dashboard GET: resolve the path, apply the session rules, render.
pub async fn show_page(
    State(state): State<DashboardState>,
    cookies: Cookies,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = Page::from_path(uri.path());
    let user = current_user(&state.auth, &cookies).await;

    match navigate(page, user.is_some()) {
        Navigation::Redirect(target) => redirect(target),
        Navigation::Render(page) => render_page(&state, page, user.as_ref(), &query).await,
    }
}

async fn render_page(
    state: &DashboardState,
    page: Page,
    user: Option<&User>,
    query: &PageQuery,
) -> Response {
    match page {
        Page::Login => login_page(state, None),
        Page::Inspections => {
            let notice = match (query.deleted, query.missing) {
                (Some(id), _) => Some(format!("Inspection {} deleted successfully!", id)),
                _ => None,
            };
            let error = query
                .missing
                .map(|id| format!("Inspection {} not found", id));
            list_page(state, user, query, notice, error).await
        }
        Page::AddInspection => form_page(
            state,
            user,
            FormPage::add(InspectionDraft::default()),
            StatusCode::OK,
        ),
        Page::EditInspection(id) => match state.inspections.get(id).await {
            Ok(inspection) => form_page(
                state,
                user,
                FormPage::edit(id, InspectionDraft::from(&inspection.record)),
                StatusCode::OK,
            ),
            Err(DomainError::NotFound { .. }) => not_found_page(state, user, Some(id)),
            Err(e) => error_page(state, user, e),
        },
        Page::Analytics => match state.analytics.report().await {
            Ok(report) => {
                let mut context = base_context(state, user, "analytics");
                context.insert("report", &report);
                context.insert("charts", &build_charts(&report));
                render(&state.templates, StatusCode::OK, "analytics.html", &context)
            }
            Err(e) => error_page(state, user, e),
        },
        Page::Help => {
            let mut context = base_context(state, user, "help");
            insert_options(&mut context);
            render(&state.templates, StatusCode::OK, "help.html", &context)
        }
        Page::NotFound => not_found_page(state, user, None),
    }
}

fn login_page(state: &DashboardState, error: Option<(StatusCode, String)>) -> Response {
    let mut context = base_context(state, None, "login");
    let status = match error {
        Some((status, message)) => {
            context.insert("error", &message);
            status
        }
        None => StatusCode::OK,
    };
    render(&state.templates, status, "login.html", &context)
}

async fn list_page(
    state: &DashboardState,
    user: Option<&User>,
    query: &PageQuery,
    notice: Option<String>,
    error: Option<String>,
) -> Response {
    let mut context = base_context(state, user, "inspections");
    context.insert("filters", &serde_json::json!({
        "search": query.search.clone().unwrap_or_default(),
        "zone": query.zone.clone().unwrap_or_default(),
        "facility_type": query.facility_type.clone().unwrap_or_default(),
        "full_inspection_completed": query.full_inspection_completed.clone().unwrap_or_default(),
    }));
    context.insert("yes_no", &YesNo::labels());
    context.insert("notice", &notice);

    let rows = match query.list_query().into_filter() {
        Ok(filter) => state.inspections.list(&filter).await,
        Err(e) => Err(e),
    };
    match rows {
        Ok(inspections) => {
            context.insert("inspections", &inspections);
            context.insert("error", &error);
        }
        Err(e) => {
            context.insert("inspections", &Vec::<()>::new());
            context.insert("error", &Some(ApiError(e).message()));
        }
    }
    render(&state.templates, StatusCode::OK, "inspections.html", &context)
}

struct FormPage {
    inspection_id: Option<i32>,
    draft: InspectionDraft,
    notice: Option<String>,
    error: Option<DomainError>,
}

impl FormPage {
    fn add(draft: InspectionDraft) -> Self {
        Self {
            inspection_id: None,
            draft,
            notice: None,
            error: None,
        }
    }

    fn edit(id: i32, draft: InspectionDraft) -> Self {
        Self {
            inspection_id: Some(id),
            ..Self::add(draft)
        }
    }
}

fn insert_options(context: &mut Context) {
    context.insert("yes_no", &YesNo::labels());
    context.insert("conditions", &ConditionRating::labels());
    context.insert("vcp_statuses", &VcpStatus::labels());
    context.insert("fire_protection", &FireProtectionStatus::labels());
    context.insert("hvac_types", &HvacType::labels());
    context.insert("power_sources", &PowerSource::labels());
}

fn form_page(
    state: &DashboardState,
    user: Option<&User>,
    form: FormPage,
    status: StatusCode,
) -> Response {
    let page = match form.inspection_id {
        Some(_) => "edit-inspection",
        None => "add-inspection",
    };
    let action = match form.inspection_id {
        Some(id) => Page::EditInspection(id).path(),
        None => Page::AddInspection.path(),
    };

    let mut context = base_context(state, user, page);
    insert_options(&mut context);
    context.insert("inspection_id", &form.inspection_id);
    context.insert("action", &action);
    context.insert("form", &form.draft);
    context.insert("notice", &form.notice);
    context.insert(
        "field_errors",
        &form.error.as_ref().map(field_errors).unwrap_or_default(),
    );
    context.insert("error", &form.error.map(|e| ApiError(e).message()));

    render(&state.templates, status, "inspection_form.html", &context)
}

fn not_found_page(state: &DashboardState, user: Option<&User>, inspection_id: Option<i32>) -> Response {
    let mut context = base_context(state, user, "not-found");
    context.insert("inspection_id", &inspection_id);
    render(&state.templates, StatusCode::NOT_FOUND, "not_found.html", &context)
}

fn error_page(state: &DashboardState, user: Option<&User>, error: DomainError) -> Response {
    let error = ApiError(error);
    let status = error.status();
    let mut context = base_context(state, user, "error");
    context.insert("error", &error.message());
    render(&state.templates, status, "not_found.html", &context)
}

// ── Actions ─────────────────────────────────────────────────────

pub async fn login_submit(
    State(state): State<DashboardState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.login(&form.username, &form.password).await {
        Ok(token) => {
            start_session(
                &cookies,
                &token.access_token,
                state.auth.jwt_config().expiration_minutes,
                state.cookie_secure,
            );
            redirect(Page::Inspections)
        }
        Err(e) => {
            let error = ApiError(e);
            login_page(&state, Some((error.status(), error.message())))
        }
    }
}

pub async fn logout(cookies: Cookies) -> Response {
    end_session(&cookies);
    redirect(Page::Login)
}

pub async fn add_submit(
    State(state): State<DashboardState>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let user = match require_user(&state, &cookies).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let draft = match draft_from_pairs(pairs) {
        Ok(draft) => draft,
        Err(e) => return malformed_form(&state, &user, None, e),
    };

    match state.inspections.create(&draft).await {
        Ok(inspection) => {
            let mut form = FormPage::add(InspectionDraft::default());
            form.notice = Some(format!(
                "Inspection added successfully! (ID: {})",
                inspection.id
            ));
            form_page(&state, Some(&user), form, StatusCode::OK)
        }
        Err(e) => {
            let status = ApiError::status_of(&e);
            let mut form = FormPage::add(draft);
            form.error = Some(e);
            form_page(&state, Some(&user), form, status)
        }
    }
}

pub async fn edit_submit(
    State(state): State<DashboardState>,
    cookies: Cookies,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let user = match require_user(&state, &cookies).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let draft = match draft_from_pairs(pairs) {
        Ok(draft) => draft,
        Err(e) => return malformed_form(&state, &user, Some(id), e),
    };

    match state.inspections.update(id, &draft).await {
        Ok(inspection) => {
            let mut form = FormPage::edit(id, InspectionDraft::from(&inspection.record));
            form.notice = Some("Inspection updated successfully!".to_string());
            form_page(&state, Some(&user), form, StatusCode::OK)
        }
        Err(DomainError::NotFound { .. }) => not_found_page(&state, Some(&user), Some(id)),
        Err(e) => {
            let status = ApiError::status_of(&e);
            let mut form = FormPage::edit(id, draft);
            form.error = Some(e);
            form_page(&state, Some(&user), form, status)
        }
    }
}

pub async fn delete_submit(
    State(state): State<DashboardState>,
    cookies: Cookies,
    Path(id): Path<i32>,
) -> Response {
    let user = match require_user(&state, &cookies).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.inspections.delete(id).await {
        Ok(()) => Redirect::to(&format!("{}?deleted={}", Page::Inspections.path(), id)).into_response(),
        Err(DomainError::NotFound { .. }) => {
            Redirect::to(&format!("{}?missing={}", Page::Inspections.path(), id)).into_response()
        }
        Err(e) => error_page(&state, Some(&user), e),
    }
}

fn malformed_form(
    state: &DashboardState,
    user: &User,
    inspection_id: Option<i32>,
    error: serde_json::Error,
) -> Response {
    warn!(error = %error, "Malformed inspection form");
    let mut form = match inspection_id {
        Some(id) => FormPage::edit(id, InspectionDraft::default()),
        None => FormPage::add(InspectionDraft::default()),
    };
    form.error = Some(DomainError::Validation(format!("Invalid form: {}", error)));
    form_page(state, Some(user), form, StatusCode::BAD_REQUEST)
}
