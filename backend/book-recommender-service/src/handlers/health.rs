use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub failures: Vec<String>,
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

#[get("/api/v1/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Ready once every artifact loaded and the index fit the ratings matrix.
#[get("/api/v1/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let failures: Vec<String> = state.failures().iter().map(ToString::to_string).collect();

    if failures.is_empty() {
        HttpResponse::Ok().json(ReadinessResponse {
            status: "ready",
            failures,
        })
    } else {
        HttpResponse::ServiceUnavailable().json(ReadinessResponse {
            status: "degraded",
            failures,
        })
    }
}
