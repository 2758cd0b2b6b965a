//! Quoting API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::cache::{AppCache, CacheStats};
use crate::db;
use crate::error::Result;
use crate::models::Filament;
use crate::AppState;

use super::calculators::{max_allowed_scale, validate_scale};
use super::requests::{QuoteRequest, ScaleCheckRequest};
use super::responses::{
    FilamentResponse, LimitsResponse, MultipliersResponse, QuoteErrorResponse, QuoteResponse,
    ScaleCheckResponse,
};
use super::services::{self, PricingError};

/// Router for the quoting API
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/filaments", get(list_filaments))
        .route("/api/quote", post(quote))
        .route("/api/scale-check", post(scale_check))
        .route("/api/limits", get(limits))
        .route("/api/cache-stats", get(cache_stats))
}

/// Filament catalog, cache-backed
async fn list_filaments(State(state): State<AppState>) -> Result<Json<Vec<FilamentResponse>>> {
    let catalog: Arc<Vec<Filament>> =
        if let Some(cached) = state.cache.catalog.get(&AppCache::catalog_key()).await {
            tracing::debug!("Cache HIT for filament catalog");
            cached
        } else {
            tracing::debug!("Cache MISS for filament catalog");
            let filaments = Arc::new(db::list_filaments(&state.db).await?);
            state
                .cache
                .catalog
                .insert(AppCache::catalog_key(), filaments.clone())
                .await;
            filaments
        };

    Ok(Json(catalog.iter().map(FilamentResponse::from).collect()))
}

/// Price a print from resolved dimensions and settings
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Response> {
    request.validate()?;

    match services::quote_print(&state.db, &state.cache, &state.config, &request).await {
        Ok(breakdown) => {
            let response = QuoteResponse {
                quote: breakdown.quote,
                filament: FilamentResponse::from(breakdown.filament.as_ref()),
                volume_mm3: breakdown.volume_mm3,
                dimensions: breakdown.scaled_dimensions,
                multipliers: MultipliersResponse::from(&breakdown.multipliers),
            };
            Ok(Json(response).into_response())
        }
        Err(err) => Ok(pricing_error_response(err)),
    }
}

/// Map quoting failures to status codes and JSON bodies
fn pricing_error_response(err: PricingError) -> Response {
    match err {
        PricingError::UnknownFilament { .. } => (
            StatusCode::NOT_FOUND,
            Json(QuoteErrorResponse {
                error_type: "unknown_filament".to_string(),
                message: err.to_string(),
                details: None,
            }),
        )
            .into_response(),
        PricingError::OversizeScale {
            ref reason,
            max_scale,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(QuoteErrorResponse {
                error_type: "oversize_scale".to_string(),
                message: reason.clone(),
                details: Some(json!({ "max_scale": max_scale })),
            }),
        )
            .into_response(),
        PricingError::Database(msg) => {
            tracing::error!("Quote failed on database access: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QuoteErrorResponse {
                    error_type: "internal".to_string(),
                    message: "Internal error".to_string(),
                    details: None,
                }),
            )
                .into_response()
        }
    }
}

/// Scale slider feedback: always 200, validity carried in the body
async fn scale_check(
    State(state): State<AppState>,
    Json(request): Json<ScaleCheckRequest>,
) -> Result<Json<ScaleCheckResponse>> {
    request.validate()?;

    let check = validate_scale(&request.dimensions, &request.scale, &state.config.build_volume);
    let max_scale = max_allowed_scale(&request.dimensions, &state.config.build_volume);

    Ok(Json(ScaleCheckResponse::new(check, max_scale)))
}

/// Machine limits and pricing constants
async fn limits(State(state): State<AppState>) -> Json<LimitsResponse> {
    Json(LimitsResponse {
        build_volume: state.config.build_volume,
        currency: state.config.currency.clone(),
        profit_margin: state.config.profit_margin,
    })
}

/// Cache entry counts for monitoring
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
