use axum::Json;

use crate::dto::{HealthResponse, ServiceStatusResponse};

pub async fn root_handler() -> Json<ServiceStatusResponse> {
    Json(ServiceStatusResponse {
        message: "Backend is running",
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
