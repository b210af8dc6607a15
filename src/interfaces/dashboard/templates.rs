//! Embedded Tera templates

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};
use tracing::error;

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../../templates/base.html")),
        ("macros.html", include_str!("../../../templates/macros.html")),
        ("login.html", include_str!("../../../templates/login.html")),
        ("inspections.html", include_str!("../../../templates/inspections.html")),
        ("inspection_form.html", include_str!("../../../templates/inspection_form.html")),
        ("analytics.html", include_str!("../../../templates/analytics.html")),
        ("help.html", include_str!("../../../templates/help.html")),
        ("not_found.html", include_str!("../../../templates/not_found.html")),
    ])?;
    Ok(tera)
}

pub fn render(tera: &Tera, status: StatusCode, name: &str, context: &Context) -> Response {
    match tera.render(name, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(template = name, error = ?e, "Template render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render {}: {}", name, e),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse() {
        let tera = load_templates().unwrap();
        assert!(tera.get_template_names().any(|n| n == "inspection_form.html"));
    }
}
