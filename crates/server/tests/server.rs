use std::path::PathBuf;

use serde_json::json;
use server::{config::ServerConfig, Server};

fn config(command: &str) -> ServerConfig {
    ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        build_command: command.to_string(),
        build_args: vec![],
        build_dir: PathBuf::from("."),
    }
}

#[tokio::test]
async fn starts_serves_and_stops() {
    let handle = Server::start(config("true")).await.unwrap();
    let base = format!("http://{}", handle.addr());

    let status: serde_json::Value = reqwest::get(format!("{base}/api/status"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "ready");
    assert_eq!(
        status["available_datasets"],
        json!(["XOR", "AND", "OR", "NOT"])
    );

    let client = reqwest::Client::new();
    let train: serde_json::Value = client
        .post(format!("{base}/api/train"))
        .json(&json!({ "epochs": 3, "learningRate": 0.1, "dataset": "XOR" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(train["success"], true);
    assert_eq!(train["requestedEpochs"], 3);
    assert_eq!(train["finalEpoch"], 3);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn failed_build_still_gets_a_response() {
    let handle = Server::start(config("false")).await.unwrap();
    let base = format!("http://{}", handle.addr());

    let client = reqwest::Client::new();
    let train: serde_json::Value = client
        .post(format!("{base}/api/train"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(train["success"], false);
    assert_eq!(train["message"], "Training failed");

    handle.stop().await.unwrap();
}
