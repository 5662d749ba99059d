// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::api_server::AppState;
use crate::reading::{permitted_ranges, PermittedRange};

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct HomeTemplate {
    pub title: String,
    pub ranges: Vec<PermittedRange>,
    pub model_available: bool,
}

pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let template = HomeTemplate {
        title: "Air Quality Prediction & Health Advisory".to_string(),
        ranges: permitted_ranges().to_vec(),
        model_available: state.context().model_available(),
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}
