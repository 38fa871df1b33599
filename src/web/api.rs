//! HTTP endpoints behind the browser page.
use super::AppState;
use crate::error::AnalyzerError;
use crate::filter::FrequencyRange;
use crate::format::{
    render_alert_html, render_analysis_html, render_bullets_html, AnalysisSections,
};
use crate::log_entry::{LogEntry, SignalSeries};
use crate::pipeline;
use crate::samples::{generate_random_log, MAX_RANDOM_LINES, SAMPLE_LOG};
use crate::session::Session;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the downloadable analysis file.
const EXPORT_FILE_NAME: &str = "satellite_log_analysis.txt";

const DEFAULT_RANDOM_LINES: usize = 10;

#[derive(Serialize)]
pub struct SessionResponse {
    session_id: Uuid,
}

/// Body of the analyze and alert requests.
#[derive(Deserialize)]
pub struct LogRequest {
    session_id: Uuid,
    log: String,
    /// Lower bound in GHz; must come with `max_freq`.
    min_freq: Option<f64>,
    /// Upper bound in GHz; must come with `min_freq`.
    max_freq: Option<f64>,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    session_id: Uuid,
}

#[derive(Deserialize)]
pub struct SessionQuery {
    session_id: Uuid,
}

#[derive(Deserialize)]
pub struct RandomQuery {
    count: Option<usize>,
}

#[derive(Serialize)]
pub struct LogTextResponse {
    log: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    html: String,
    sections: AnalysisSections,
    chart: Option<SignalSeries>,
    entries: Vec<LogEntry>,
    unparsed_lines: usize,
    raw: String,
}

#[derive(Serialize)]
pub struct AlertResponse {
    html: String,
    raw: String,
}

#[derive(Serialize)]
pub struct CompareResponse {
    html: String,
    bullets: Vec<String>,
    raw: String,
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn error_response(err: AnalyzerError) -> Response {
    let status = if err.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    error_body(status, err.display_message())
}

fn unknown_session(id: &Uuid) -> Response {
    warn!("Request for unknown session {}", id);
    error_body(StatusCode::NOT_FOUND, "Error: Unknown session.".to_string())
}

fn requested_range(
    min: Option<f64>,
    max: Option<f64>,
) -> Result<Option<FrequencyRange>, AnalyzerError> {
    match (min, max) {
        (None, None) => Ok(None),
        (Some(min), Some(max)) => FrequencyRange::new(min, max).map(Some),
        _ => Err(AnalyzerError::InvalidRange(
            "both minimum and maximum frequency are required".to_string(),
        )),
    }
}

async fn find_session(state: &AppState, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
    state.sessions.get(id).await
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;
    info!(
        "Created session {} ({} active)",
        session_id,
        state.sessions.len().await
    );
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

pub async fn sample_log() -> impl IntoResponse {
    Json(LogTextResponse {
        log: SAMPLE_LOG.to_string(),
    })
}

pub async fn random_log(Query(query): Query<RandomQuery>) -> impl IntoResponse {
    let count = query
        .count
        .unwrap_or(DEFAULT_RANDOM_LINES)
        .clamp(1, MAX_RANDOM_LINES);
    let log = generate_random_log(&mut rand::thread_rng(), Utc::now(), count);
    Json(LogTextResponse { log })
}

pub async fn analyze(State(state): State<AppState>, Json(req): Json<LogRequest>) -> Response {
    let range = match requested_range(req.min_freq, req.max_freq) {
        Ok(range) => range,
        Err(e) => return error_response(e),
    };
    let Some(session) = find_session(&state, &req.session_id).await else {
        return unknown_session(&req.session_id);
    };

    // Held across the service call: one request in flight per session.
    let mut session = session.lock().await;
    match pipeline::analyze(&mut session, state.generator.as_ref(), &req.log, range).await {
        Ok(report) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                html: render_analysis_html(&report.sections),
                sections: report.sections,
                chart: report.chart,
                entries: report.entries,
                unparsed_lines: report.unparsed_lines,
                raw: report.raw,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn alert(State(state): State<AppState>, Json(req): Json<LogRequest>) -> Response {
    let range = match requested_range(req.min_freq, req.max_freq) {
        Ok(range) => range,
        Err(e) => return error_response(e),
    };
    let Some(session) = find_session(&state, &req.session_id).await else {
        return unknown_session(&req.session_id);
    };

    let _session = session.lock().await;
    match pipeline::alert(state.generator.as_ref(), &req.log, range).await {
        Ok(result) => (
            StatusCode::OK,
            Json(AlertResponse {
                html: render_alert_html(&result.raw),
                raw: result.raw,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn compare(State(state): State<AppState>, Json(req): Json<CompareRequest>) -> Response {
    let Some(session) = find_session(&state, &req.session_id).await else {
        return unknown_session(&req.session_id);
    };

    let session = session.lock().await;
    match pipeline::compare(&session, state.generator.as_ref()).await {
        Ok(result) => (
            StatusCode::OK,
            Json(CompareResponse {
                html: render_bullets_html(&result.bullets),
                bullets: result.bullets,
                raw: result.raw,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn export(State(state): State<AppState>, Query(query): Query<SessionQuery>) -> Response {
    let Some(session) = find_session(&state, &query.session_id).await else {
        return unknown_session(&query.session_id);
    };

    let session = session.lock().await;
    match session.latest_analysis() {
        Some(text) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            text.to_string(),
        )
            .into_response(),
        None => error_body(
            StatusCode::NOT_FOUND,
            "Error: No analysis to export yet.".to_string(),
        ),
    }
}
