use super::analyzer::DealAnalysisResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Flattened storage row for one analysis run, shaped the way the
/// dashboard's analyses table stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub property_id: String,
    pub analyzed_on: NaiveDate,
    pub offer_price: f64,
    pub offer_per_sqft: f64,
    pub arv: f64,
    pub arv_per_sqft: f64,
    pub diff: f64,
    pub rehab_level: String,
    pub rehab_total: f64,
    pub rehab_kitchen: f64,
    pub rehab_bath: f64,
    pub rehab_interior_paint: f64,
    pub rehab_exterior_paint: f64,
    pub rehab_flooring: f64,
    pub rehab_windows: f64,
    pub rehab_misc: f64,
    pub rehab_roof: f64,
    pub rehab_sheetrock: f64,
    pub rehab_framing: f64,
    pub rehab_electrical: f64,
    pub rehab_plumbing: f64,
    pub rehab_hvac: f64,
    pub rehab_landscape: f64,
    pub rehab_foundation: f64,
    pub rehab_other: f64,
    pub selling_costs: f64,
    pub total_cost: f64,
    pub est_profit: f64,
    pub ltv: f64,
    pub loan_amount: f64,
    pub points_pct: f64,
    pub interest_pct: f64,
    pub months_held: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_points: f64,
    pub total_finance_cost: f64,
    pub profit_with_finance: f64,
    pub roi: f64,
    pub mao: f64,
    pub wholesale_profit: f64,
    pub deal_score: String,
    pub deal_score_numeric: u8,
    pub score_factors: serde_json::Value,
    pub comp_addresses: Vec<String>,
    pub comp_prices: Vec<f64>,
    pub comp_avg_per_sqft: f64,
}

impl AnalysisRow {
    pub fn from_result(
        property_id: &str,
        analyzed_on: NaiveDate,
        result: &DealAnalysisResult,
    ) -> Self {
        let factors = &result.score.factors;
        Self {
            property_id: property_id.to_string(),
            analyzed_on,
            offer_price: result.offer_price,
            offer_per_sqft: result.offer_per_sqft,
            arv: result.arv,
            arv_per_sqft: result.arv_per_sqft,
            diff: result.diff,
            rehab_level: result.rehab.level.label().to_string(),
            rehab_total: result.rehab.total,
            rehab_kitchen: result.rehab.kitchen,
            rehab_bath: result.rehab.bath,
            rehab_interior_paint: result.rehab.interior_paint,
            rehab_exterior_paint: result.rehab.exterior_paint,
            rehab_flooring: result.rehab.flooring,
            rehab_windows: result.rehab.windows,
            rehab_misc: result.rehab.misc,
            rehab_roof: result.rehab.roof,
            rehab_sheetrock: result.rehab.sheetrock,
            rehab_framing: result.rehab.framing,
            rehab_electrical: result.rehab.electrical,
            rehab_plumbing: result.rehab.plumbing,
            rehab_hvac: result.rehab.hvac,
            rehab_landscape: result.rehab.landscape,
            rehab_foundation: result.rehab.foundation,
            rehab_other: result.rehab.other,
            selling_costs: result.selling_costs,
            total_cost: result.total_cost,
            est_profit: result.est_profit,
            ltv: result.finance.ltv,
            loan_amount: result.finance.loan_amount,
            points_pct: result.finance.points_pct,
            interest_pct: result.finance.interest_pct,
            months_held: result.finance.months_held,
            monthly_payment: result.finance.monthly_payment,
            total_interest: result.finance.total_interest,
            total_points: result.finance.total_points,
            total_finance_cost: result.finance.total_finance_cost,
            profit_with_finance: result.profit_with_finance,
            roi: result.roi,
            mao: result.mao,
            wholesale_profit: result.wholesale_profit,
            deal_score: result.score.grade.label().to_string(),
            deal_score_numeric: result.score.total_score,
            score_factors: json!({
                "roi": factors.roi,
                "wholesale_spread": factors.wholesale_spread,
                "arv_confidence": factors.arv_confidence,
                "equity_position": factors.equity_position,
                "distress_signal": factors.distress_signal,
                "location_quality": factors.location_quality,
                "days_on_market": factors.days_on_market,
            }),
            comp_addresses: result.comp_addresses.clone(),
            comp_prices: result.comp_prices.clone(),
            comp_avg_per_sqft: result.comp_avg_per_sqft,
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
/// Append-only: each run inserts a new row, preserving history.
pub trait AnalysisRepository: Send + Sync {
    fn append(&self, row: AnalysisRow) -> Result<AnalysisRow, RepositoryError>;
    fn history(&self, property_id: &str) -> Result<Vec<AnalysisRow>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("no analyses recorded for property")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
