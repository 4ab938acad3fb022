use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::engine::{Engine, Halt, RunResult};
use crate::error::{MarkovianError, Result};
use crate::growth::Growth;
use crate::rules::RuleSet;
use crate::sampler::{ComplexityReport, Metric, Sampler};
use crate::scale;
use crate::settings::Settings;

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub rules: String,
}

#[derive(Debug, Serialize)]
pub struct TraceItem {
    pub step: usize,
    pub word: String,
    pub rule: String,
}

#[derive(Debug, Serialize)]
pub struct Longest {
    pub step: usize,
    pub word: String,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub output: String,
    pub steps: usize,
    pub truncated: bool,
    pub halt: Halt,
    pub trace: Vec<TraceItem>,
    pub longest: Longest,
}

#[derive(Debug, Serialize)]
pub struct ComplexityResponse {
    pub big_o: Growth,
    pub notation: &'static str,
    pub samples: Vec<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<BTreeMap<usize, String>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl RunResponse {
    fn new(rules: &RuleSet, run: RunResult) -> Self {
        let (step, word) = run.longest();
        let longest = Longest { step, word: word.to_string(), length: word.chars().count() };
        let trace = run
            .trace
            .into_iter()
            .map(|entry| TraceItem {
                step: entry.step,
                rule: rules.get(entry.rule).map(|rule| rule.to_string()).unwrap_or_default(),
                word: entry.word,
            })
            .collect();
        Self { output: run.output, steps: run.steps, truncated: run.truncated, halt: run.halt, trace, longest }
    }
}

impl ComplexityResponse {
    fn new(report: ComplexityReport, words: Option<BTreeMap<usize, String>>) -> Self {
        Self {
            big_o: report.big_o,
            notation: report.big_o.notation(),
            samples: report.samples.iter().map(|s| (s.scale, s.metric)).collect(),
            aborted_at: report.aborted.map(|abort| abort.scale),
            words,
        }
    }
}

pub fn router(settings: Arc<Settings>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/api/run", post(run))
        .route("/api/time", post(time))
        .route("/api/space", post(space))
        .layer(cors)
        .with_state(settings)
}

pub async fn run(State(settings): State<Arc<Settings>>, Json(req): Json<RewriteRequest>) -> Response {
    let started = Instant::now();
    let limits = settings.engine.limits();
    let result = blocking(&settings, move || {
        let rules = RuleSet::compile(&req.rules)?;
        let run = Engine::new(&rules, limits).run(&req.word);
        Ok(RunResponse::new(&rules, run))
    })
    .await;
    respond("run", started, result)
}

pub async fn time(State(settings): State<Arc<Settings>>, Json(req): Json<RewriteRequest>) -> Response {
    complexity(settings, req, Metric::Time).await
}

pub async fn space(State(settings): State<Arc<Settings>>, Json(req): Json<RewriteRequest>) -> Response {
    complexity(settings, req, Metric::Space).await
}

async fn complexity(settings: Arc<Settings>, req: RewriteRequest, metric: Metric) -> Response {
    let started = Instant::now();
    let endpoint = match metric {
        Metric::Time => "time",
        Metric::Space => "space",
    };
    let sampling = settings.sampling.clone();
    let result = blocking(&settings, move || {
        if req.word.is_empty() || req.rules.trim().is_empty() {
            return Err(MarkovianError::MissingInput);
        }
        let rules = RuleSet::compile(&req.rules)?;
        let report = Sampler::new(&rules, &sampling).sample(&req.word, &sampling.scales, metric)?;
        let words = match metric {
            Metric::Time => None,
            Metric::Space => Some(
                report
                    .samples
                    .iter()
                    .map(|s| Ok((s.scale, scale::generate(&req.word, s.scale)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?,
            ),
        };
        Ok(ComplexityResponse::new(report, words))
    })
    .await;
    respond(endpoint, started, result)
}

// The engine is synchronous, so the work runs on a blocking thread. The
// timeout stops waiting for it; the run itself is bounded by its limits.
async fn blocking<T, F>(settings: &Settings, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let timeout_ms = settings.server.request_timeout_ms;
    let task = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Err(_) => Err(MarkovianError::Timeout(timeout_ms)),
        Ok(Err(e)) => {
            warn!(error=%e, "Join error");
            Err(MarkovianError::Execution(e.to_string()))
        }
        Ok(Ok(result)) => result,
    }
}

fn respond<T: Serialize>(endpoint: &'static str, started: Instant, result: Result<T>) -> Response {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(body) => {
            info!(endpoint, ms = elapsed_ms, "request complete");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let status = status_for(&e);
            let msg = format!("{e}");
            warn!(endpoint, %msg, code = %status.as_u16(), "request error");
            (status, Json(ErrorResponse { error: msg })).into_response()
        }
    }
}

fn status_for(e: &MarkovianError) -> StatusCode {
    match e {
        MarkovianError::RuleSyntax { .. }
        | MarkovianError::InvalidScale(_)
        | MarkovianError::InvalidScales(_)
        | MarkovianError::MissingInput => StatusCode::BAD_REQUEST,
        MarkovianError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        MarkovianError::Config(_) | MarkovianError::Execution(_) | MarkovianError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
