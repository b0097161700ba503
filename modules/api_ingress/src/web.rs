use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

pub const ROOT_MESSAGE: &str =
    "Can't query the root endpoint - try appending a path like /items to the URL!";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// `GET /` is not a collection; answer with a hint as a JSON string.
pub async fn root() -> (StatusCode, Json<&'static str>) {
    (StatusCode::NOT_FOUND, Json(ROOT_MESSAGE))
}
