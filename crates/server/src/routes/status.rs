use axum::Json;
use chrono::Utc;
use serde::Serialize;

const AVAILABLE_DATASETS: [&str; 4] = ["XOR", "AND", "OR", "NOT"];

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub available_datasets: Vec<&'static str>,
    pub last_training: String,
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready",
        available_datasets: AVAILABLE_DATASETS.to_vec(),
        last_training: Utc::now().to_rfc3339(),
    })
}
