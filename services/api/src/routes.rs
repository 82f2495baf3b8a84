use crate::infra::{deserialize_optional_date, ApiService, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use deal_engine::analysis::comps::{analyze_comps, filter_comps, CompAnalysis, CompFilterConfig};
use deal_engine::analysis::domain::{CompSale, Property, ValuationEstimate};
use deal_engine::analysis::finance::FinanceDefaults;
use deal_engine::analysis::rehab::{RehabLevel, RehabPatch};
use deal_engine::analysis::repository::AnalysisRow;
use deal_engine::analysis::{DealAnalysisInput, DealAnalysisResult};
use deal_engine::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Analysis request: the property snapshot plus whatever comp/valuation
/// data and overrides the caller has on hand. Raw comps are filtered and
/// aggregated server-side unless a precomputed analysis is supplied.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    /// Storage key for the analysis history; defaults to the address.
    #[serde(default)]
    pub(crate) property_id: Option<String>,
    pub(crate) property: Property,
    #[serde(default)]
    pub(crate) comps: Option<Vec<CompSale>>,
    #[serde(default)]
    pub(crate) comp_filter: Option<CompFilterConfig>,
    #[serde(default)]
    pub(crate) comp_analysis: Option<CompAnalysis>,
    #[serde(default)]
    pub(crate) valuation: Option<ValuationEstimate>,
    #[serde(default)]
    pub(crate) arv: Option<f64>,
    #[serde(default)]
    pub(crate) offer_price: Option<f64>,
    #[serde(default)]
    pub(crate) rehab_level: Option<RehabLevel>,
    #[serde(default)]
    pub(crate) rehab_patch: Option<RehabPatch>,
    #[serde(default)]
    pub(crate) finance: Option<FinanceDefaults>,
    #[serde(default)]
    pub(crate) distress_signal: Option<String>,
    /// Reference date for comp recency and age math (defaults to today).
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeResponse {
    pub(crate) property_id: String,
    pub(crate) analyzed_on: NaiveDate,
    pub(crate) comp_analysis: Option<CompAnalysis>,
    pub(crate) analysis: DealAnalysisResult,
}

pub(crate) fn with_analysis_routes(service: Arc<ApiService>) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/deals/analyze",
            axum::routing::post(analyze_endpoint),
        )
        .route(
            "/api/v1/deals/:property_id/analyses",
            axum::routing::get(history_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analyze_endpoint(
    Extension(service): Extension<Arc<ApiService>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let AnalyzeRequest {
        property_id,
        property,
        comps,
        comp_filter,
        comp_analysis,
        valuation,
        arv,
        offer_price,
        rehab_level,
        rehab_patch,
        finance,
        distress_signal,
        today,
    } = payload;

    if property.address.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "property.address must not be empty".to_string(),
        ));
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let property_id = property_id.unwrap_or_else(|| property.address.clone());

    // A precomputed comp analysis wins; otherwise raw comps run through
    // the filter/aggregate pipeline against the subject's footprint.
    let comp_analysis = comp_analysis.or_else(|| {
        comps.map(|comps| {
            let config = comp_filter.unwrap_or_default();
            let target_sqft = property.sqft.unwrap_or(1500.0);
            let filtered = filter_comps(&comps, target_sqft, today, &config);
            analyze_comps(&filtered, target_sqft, &config)
        })
    });

    let input = DealAnalysisInput {
        property,
        arv,
        offer_price,
        rehab_level,
        rehab_patch,
        finance,
        comp_analysis: comp_analysis.clone(),
        valuation,
        distress_signal,
    };

    let analysis = service.analyze_and_store(&property_id, &input, today)?;

    Ok(Json(AnalyzeResponse {
        property_id,
        analyzed_on: today,
        comp_analysis,
        analysis,
    }))
}

pub(crate) async fn history_endpoint(
    Extension(service): Extension<Arc<ApiService>>,
    axum::extract::Path(property_id): axum::extract::Path<String>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    let rows = service.history(&property_id)?;
    Ok(Json(rows))
}
