//! HTTP API for the salary engine.
//!
//! This module exposes a minimal REST surface around the computation
//! core using the [`axum`](https://crates.io/crates/axum) framework:
//! a calculate endpoint taking the raw form shape, and a pair of
//! share endpoints for creating and opening password-gated tokens.
//! The active rate table is loaded at startup and shared across
//! requests.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::engine::compute;
use crate::form::SalaryForm;
use crate::models::{RateConfig, SalaryResult};
use crate::share::{self, ShareError};
use crate::tax;

/// Application state shared across requests.
pub struct AppState {
    pub rates: RwLock<RateConfig>,
}

/// Builds the API router, sourcing the rate table from `rate_dir`
/// when given (most recent version wins) and from the built-in 2024
/// defaults otherwise.
pub fn build_router(rate_dir: Option<PathBuf>) -> Result<(Router, Arc<AppState>)> {
    let config = match rate_dir {
        Some(dir) => {
            let tables = tax::load_rate_tables_from_dir(&dir)?;
            match tax::latest(tables) {
                Some(table) => {
                    tracing::info!(version = %table.version, "loaded rate table");
                    table.config
                }
                None => {
                    tracing::warn!(dir = %dir.display(), "no usable rate tables, using defaults");
                    RateConfig::default()
                }
            }
        }
        None => RateConfig::default(),
    };
    tax::validate_brackets(&config.tax_brackets)?;

    let state = Arc::new(AppState { rates: RwLock::new(config) });
    let router = Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/share", post(share_handler))
        .route("/api/share/open", post(open_share_handler))
        .with_state(state.clone());
    Ok((router, state))
}

/// Handler for POST /api/calculate.  Accepts the raw form shape and
/// never rejects it: lenient parsing plus the total engine means any
/// body that deserialises produces a breakdown.
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SalaryForm>,
) -> Json<SalaryResult> {
    let config = state.rates.read().await;
    Json(compute(&form.to_input(), &config))
}

#[derive(Debug, Deserialize)]
struct ShareRequest {
    form: SalaryForm,
    password: String,
}

#[derive(Debug, Serialize)]
struct ShareResponse {
    token: String,
}

/// Handler for POST /api/share: packages the form into a share token.
async fn share_handler(Json(request): Json<ShareRequest>) -> impl IntoResponse {
    match share::encode(&request.form, &request.password) {
        Ok(token) => (StatusCode::OK, Json(ShareResponse { token })).into_response(),
        Err(err) => {
            let body = Json(serde_json::json!({"error": err.to_string()}));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenShareRequest {
    token: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct OpenShareResponse {
    form: SalaryForm,
    result: SalaryResult,
}

/// Handler for POST /api/share/open: unlocks a token and computes the
/// shared form in one step, mirroring how the calculator opens a
/// shared link.
async fn open_share_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenShareRequest>,
) -> impl IntoResponse {
    let form = match share::decode(&request.token).and_then(|locked| locked.unlock(&request.password)) {
        Ok(form) => form,
        Err(err @ ShareError::WrongPassword) => {
            tracing::warn!("share open rejected: wrong password");
            let body = Json(serde_json::json!({"error": err.to_string()}));
            return (StatusCode::UNAUTHORIZED, body).into_response();
        }
        Err(err) => {
            tracing::warn!(%err, "share open rejected: malformed token");
            let body = Json(serde_json::json!({"error": err.to_string()}));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }
    };
    let config = state.rates.read().await;
    let result = compute(&form.to_input(), &config);
    (StatusCode::OK, Json(OpenShareResponse { form, result })).into_response()
}

/// Launches the API server and blocks until it terminates.
pub async fn serve(addr: &str, rate_dir: Option<PathBuf>) -> Result<()> {
    let (router, _state) = build_router(rate_dir)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "salary engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
