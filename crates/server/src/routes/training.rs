use axum::{extract::State, Json};
use executors::ProcessRunner;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Training parameters sent by the GUI. They are echoed back in the
/// response; the build invocation itself comes from server config only.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub epochs: Option<u32>,
    pub learning_rate: Option<f64>,
    pub hidden_size: Option<u32>,
    pub dataset: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_epochs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_epoch: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrainResponse {
    fn completed(output: String, epochs: Option<u32>) -> Self {
        Self {
            success: true,
            message: "Training completed successfully".to_string(),
            output: Some(output),
            requested_epochs: epochs,
            final_epoch: epochs,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            message: "Training failed".to_string(),
            output: None,
            requested_epochs: None,
            final_epoch: None,
            error: Some(error),
        }
    }

    fn busy() -> Self {
        Self {
            success: false,
            message: "A training run is already in progress".to_string(),
            output: None,
            requested_epochs: None,
            final_epoch: None,
            error: None,
        }
    }
}

pub async fn train(
    State(state): State<AppState>,
    body: Option<Json<TrainRequest>>,
) -> Json<TrainResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    // The build tool writes into one shared directory; reject instead of
    // letting two runs race on its artifacts.
    let Ok(_slot) = state.build_guard().try_lock() else {
        return Json(TrainResponse::busy());
    };

    let invocation = state.config().build_invocation();
    tracing::info!(
        command = %invocation.command,
        dir = %invocation.working_dir.display(),
        "starting training build"
    );

    let result = ProcessRunner::run(invocation).await;
    if result.success {
        tracing::info!(code = ?result.exit_code, "training build finished");
        Json(TrainResponse::completed(result.output, request.epochs))
    } else {
        tracing::warn!(code = ?result.exit_code, "training build failed");
        Json(TrainResponse::failed(result.output))
    }
}
