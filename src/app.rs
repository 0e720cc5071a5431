use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/forecast", get(handlers::get_forecast))
        .route("/api/donations", post(handlers::record_donation))
        .route("/api/requests", post(handlers::create_request))
        .route("/api/otp", post(handlers::issue_otp))
        .route("/api/otp/verify", post(handlers::verify_otp))
        .with_state(state)
}
