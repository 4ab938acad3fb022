use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use markovian::server::{self, RewriteRequest};
use markovian::settings::{EngineSettings, SamplingSettings, ServerSettings, Settings};

fn settings() -> Arc<Settings> {
    Arc::new(Settings {
        engine: EngineSettings { step_limit: 5, length_limit: None },
        sampling: SamplingSettings { scales: vec![2, 4, 8, 16], ..SamplingSettings::default() },
        ..Settings::default()
    })
}

fn request(word: &str, rules: &str) -> Json<RewriteRequest> {
    Json(RewriteRequest { word: word.into(), rules: rules.into() })
}

async fn body(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body reads");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn run_returns_the_trace() {
    let (status, json) = body(server::run(State(settings()), request("a", "a->ab\nb->a")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["output"], "abbbbb");
    assert_eq!(json["steps"], 5);
    assert_eq!(json["truncated"], true);
    assert_eq!(json["halt"], "step_limit");
    assert_eq!(json["trace"][0], json!({"step": 1, "word": "ab", "rule": "a->ab"}));
    assert_eq!(json["trace"].as_array().unwrap().len(), 5);
    assert_eq!(json["longest"], json!({"step": 5, "word": "abbbbb", "length": 6}));
}

#[tokio::test]
async fn run_without_rules_echoes_the_word() {
    let (status, json) = body(server::run(State(settings()), request("abc", "  ")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["output"], "abc");
    assert_eq!(json["steps"], 0);
    assert_eq!(json["trace"], json!([]));
}

#[tokio::test]
async fn run_rejects_malformed_rules() {
    let (status, json) = body(server::run(State(settings()), request("a", "a->b\nbroken")).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json["error"].as_str().expect("error message");
    assert!(error.contains("line 2"), "unexpected error: {error}");
}

#[tokio::test]
async fn time_reports_growth_and_samples() {
    let (status, json) = body(server::time(State(settings()), request("a", "a->b")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["big_o"], "linear");
    assert_eq!(json["notation"], "O(n)");
    assert_eq!(json["samples"], json!([[2, 2], [4, 4], [8, 8], [16, 16]]));
    assert!(json.get("words").is_none());
}

#[tokio::test]
async fn space_also_returns_scaled_words() {
    let (status, json) = body(server::space(State(settings()), request("ab", "x->y")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["big_o"], "linear");
    assert_eq!(json["samples"][0], json!([2, 4]));
    assert_eq!(json["words"]["2"], "abab");
}

#[tokio::test]
async fn sampling_needs_word_and_rules() {
    let (status, json) = body(server::time(State(settings()), request("", "a->b")).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "word and rules required");
    let (status, _) = body(server::space(State(settings()), request("a", "")).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_sampling_leaves_runs_untouched() {
    let settings = settings();
    let (_, before) = body(server::run(State(Arc::clone(&settings)), request("ba", "ba->ab")).await).await;
    let (status, _) = body(server::time(State(Arc::clone(&settings)), request("ba", "ba->")).await).await;
    assert_eq!(status, StatusCode::OK, "deleting rule is fine");
    let (status, _) = body(server::time(State(Arc::clone(&settings)), request("ba", "->x")).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, after) = body(server::run(State(settings), request("ba", "ba->ab")).await).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn explosive_sampling_degrades_to_unknown() {
    let settings = Arc::new(Settings {
        sampling: SamplingSettings { step_limit: 20, ..SamplingSettings::default() },
        ..Settings::default()
    });
    let (status, json) = body(server::time(State(settings), request("a", "a->aa")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["big_o"], "unknown");
    assert_eq!(json["samples"], json!([]));
    assert_eq!(json["aborted_at"], 2);
}

#[tokio::test]
async fn run_stops_growing_words_at_the_default_length_limit() {
    let rules = format!("a->{}", "a".repeat(1_000));
    let settings = Arc::new(Settings::default());
    let (status, json) = body(server::run(State(settings), request("a", &rules)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["halt"], "length_limit");
    assert_eq!(json["truncated"], true);
    assert_eq!(json["steps"], 66);
    assert_eq!(json["longest"]["length"], 65_935);
}

#[tokio::test]
async fn slow_sampling_times_out() {
    let settings = Arc::new(Settings {
        server: ServerSettings { request_timeout_ms: 1, ..ServerSettings::default() },
        sampling: SamplingSettings {
            scales: vec![256, 512],
            step_limit: 1_000_000,
            ..SamplingSettings::default()
        },
        ..Settings::default()
    });
    let (status, json) = body(server::time(State(settings), request("ba", "ba->ab")).await).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    let error = json["error"].as_str().expect("error message");
    assert!(error.contains("timed out"), "unexpected error: {error}");
}
