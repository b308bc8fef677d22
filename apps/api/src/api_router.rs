use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use formcraft_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    Ok(Router::new()
        .route("/", get(handlers::health::root_handler))
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/forms",
            get(handlers::forms::list_forms_handler).post(handlers::forms::create_form_handler),
        )
        .route(
            "/forms/{form_id}",
            get(handlers::forms::get_form_handler).put(handlers::forms::update_form_handler),
        )
        .route(
            "/forms/{form_id}/submit",
            post(handlers::forms::submit_form_handler),
        )
        .route(
            "/forms/{form_id}/submissions",
            get(handlers::forms::review_submissions_handler),
        )
        .route(
            "/submissions",
            post(handlers::submissions::create_submission_handler),
        )
        .route(
            "/submissions/{form_id}",
            get(handlers::submissions::list_submissions_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}
