//! API handlers for the DocVerify server
//!
//! Provides REST endpoints for:
//! - Code verification (the remote lookup used by the page)
//! - Listing known codes
//! - Health checks

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use docverify_core::{normalize_code, DocumentStatus, VerifyResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "docverify-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Query string of a verification request
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub code: Option<String>,
}

/// Handler: GET /verify?code=...
///
/// Unknown codes are a normal answer (`valid: false`), not an HTTP error.
pub async fn handle_verify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let raw = query.code.unwrap_or_default();
    let code = normalize_code(&raw, state.uppercase).ok_or(ApiError::MissingCode)?;

    let verification = state.resolver.lookup(&code);
    info!(
        code = %code,
        found = verification.is_found(),
        revoked = verification.is_revoked(),
        "verification request"
    );

    Ok(Json(VerifyResponse::from_verification(&verification)))
}

/// Entry in the code listing
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    pub code: String,
    pub doc_name: String,
    pub status: DocumentStatus,
}

/// Code listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct CodeListResponse {
    pub success: bool,
    pub codes: Vec<CodeEntry>,
    pub count: usize,
}

/// Handler: GET /api/codes
pub async fn handle_list_codes(State(state): State<Arc<AppState>>) -> Json<CodeListResponse> {
    let codes: Vec<CodeEntry> = state
        .resolver
        .table()
        .iter()
        .map(|(code, record)| CodeEntry {
            code: code.to_string(),
            doc_name: record.doc_name.clone(),
            status: record.status,
        })
        .collect();

    let count = codes.len();
    debug!("Listing {} code(s)", count);

    Json(CodeListResponse {
        success: true,
        codes,
        count,
    })
}
