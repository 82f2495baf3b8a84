use super::comps::CompAnalysis;
use super::domain::{round2, Property, ValuationEstimate};
use super::finance::{
    calculate_finance, calculate_mao, calculate_selling_costs, FinanceBreakdown, FinanceDefaults,
};
use super::rehab::{estimate_rehab, RehabCostTable, RehabEstimate, RehabLevel, RehabPatch};
use super::scoring::{DealScorer, ScoreInput, ScoreResult, ScoringConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One analysis request: the property snapshot plus optional overrides and
/// externally fetched valuation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysisInput {
    pub property: Property,
    /// Override: after-repair value.
    #[serde(default)]
    pub arv: Option<f64>,
    /// Override: offer price when not using the asking price.
    #[serde(default)]
    pub offer_price: Option<f64>,
    /// Override: rehab severity tier instead of inferring one.
    #[serde(default)]
    pub rehab_level: Option<RehabLevel>,
    /// Override: individual rehab line items layered onto the estimate.
    #[serde(default)]
    pub rehab_patch: Option<RehabPatch>,
    #[serde(default)]
    pub finance: Option<FinanceDefaults>,
    #[serde(default)]
    pub comp_analysis: Option<CompAnalysis>,
    #[serde(default)]
    pub valuation: Option<ValuationEstimate>,
    /// Override: distress signal instead of the property's list type.
    #[serde(default)]
    pub distress_signal: Option<String>,
}

impl DealAnalysisInput {
    pub fn for_property(property: Property) -> Self {
        Self {
            property,
            arv: None,
            offer_price: None,
            rehab_level: None,
            rehab_patch: None,
            finance: None,
            comp_analysis: None,
            valuation: None,
            distress_signal: None,
        }
    }
}

/// The terminal aggregate of one analysis run. Immutable once produced;
/// re-analysis creates a fresh record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysisResult {
    pub offer_price: f64,
    pub offer_per_sqft: f64,
    pub arv: f64,
    pub arv_per_sqft: f64,
    /// ARV minus offer price.
    pub diff: f64,
    pub rehab: RehabEstimate,
    pub selling_costs: f64,
    pub total_cost: f64,
    pub est_profit: f64,
    pub finance: FinanceBreakdown,
    pub profit_with_finance: f64,
    /// Percentage, rounded to 2 decimals.
    pub roi: f64,
    pub mao: f64,
    pub wholesale_profit: f64,
    pub score: ScoreResult,
    pub comp_addresses: Vec<String>,
    pub comp_prices: Vec<f64>,
    pub comp_avg_per_sqft: f64,
}

/// Single-pass deal analysis: ARV resolution, rehab, offer economics,
/// financing, wholesale numbers, and the weighted score.
///
/// Holds the injected catalogs; each `analyze` call is a pure function of
/// its input plus `today`, so concurrent use needs no coordination.
#[derive(Debug, Clone, Default)]
pub struct DealAnalyzer {
    finance: FinanceDefaults,
    rehab_costs: RehabCostTable,
    scorer: DealScorer,
}

impl DealAnalyzer {
    pub fn new(
        finance: FinanceDefaults,
        rehab_costs: RehabCostTable,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            finance,
            rehab_costs,
            scorer: DealScorer::new(scoring),
        }
    }

    pub fn analyze(&self, input: &DealAnalysisInput, today: NaiveDate) -> DealAnalysisResult {
        let property = &input.property;
        let sqft = property.sqft.unwrap_or(1500.0);

        // ARV fallback chain, first available wins: explicit override,
        // comp-derived estimate, external AVM, then assessed value with a
        // conservative markup. Bottoms out at zero rather than failing.
        let mut arv = input.arv.unwrap_or(0.0);
        if arv == 0.0 {
            if let Some(comp_analysis) = &input.comp_analysis {
                if comp_analysis.estimated_arv > 0.0 {
                    arv = comp_analysis.estimated_arv;
                }
            }
        }
        if arv == 0.0 {
            if let Some(valuation) = &input.valuation {
                if valuation.value > 0.0 {
                    arv = valuation.value;
                }
            }
        }
        if arv == 0.0 {
            if let Some(assessed) = property.tax_assessed_value {
                if assessed > 0.0 {
                    arv = (assessed * 1.1).round();
                }
            }
        }

        let mut rehab = estimate_rehab(property, input.rehab_level, today, &self.rehab_costs);
        if let Some(patch) = &input.rehab_patch {
            rehab.apply(patch);
        }

        // Offer price: override, else asking, else fall back to our own
        // hypothetical maximum offer when the deal has an ARV at all.
        let mut offer_price = input
            .offer_price
            .or(property.asking_price)
            .unwrap_or(0.0);
        if offer_price == 0.0 && arv > 0.0 {
            offer_price = calculate_mao(arv, rehab.total);
        }

        let offer_per_sqft = if sqft > 0.0 {
            round2(offer_price / sqft)
        } else {
            0.0
        };
        let arv_per_sqft = if sqft > 0.0 { round2(arv / sqft) } else { 0.0 };

        let diff = arv - offer_price;
        let selling_costs = calculate_selling_costs(arv);
        let total_cost = offer_price + rehab.total + selling_costs;
        let est_profit = diff - rehab.total - selling_costs;

        let finance_defaults = input.finance.as_ref().unwrap_or(&self.finance);
        let finance_result = calculate_finance(offer_price, rehab.total, finance_defaults);
        let profit_with_finance = est_profit - finance_result.total_finance_cost;
        let roi = if total_cost > 0.0 {
            round2(profit_with_finance / total_cost * 100.0)
        } else {
            0.0
        };

        let mao = calculate_mao(arv, rehab.total);
        let wholesale_profit = mao - offer_price;

        // Equity here is a proxy from public figures, not true owner
        // equity; it can go negative when asking exceeds assessed.
        let estimated_equity = match (property.tax_assessed_value, property.asking_price) {
            (Some(assessed), Some(asking)) if assessed > 0.0 => (assessed - asking) / assessed,
            _ => 0.0,
        };

        let score = self.scorer.score(&ScoreInput {
            roi,
            wholesale_spread: wholesale_profit,
            comp_count: input
                .comp_analysis
                .as_ref()
                .map(|comp_analysis| comp_analysis.comp_count)
                .unwrap_or(0),
            estimated_equity,
            distress_signal: input
                .distress_signal
                .clone()
                .or_else(|| property.list_type.clone()),
            days_on_market: property.days_on_market,
            zip_code: property.zip_code.clone(),
        });

        let (comp_addresses, comp_prices, comp_avg_per_sqft) = match &input.comp_analysis {
            Some(comp_analysis) => (
                comp_analysis.comp_addresses.clone(),
                comp_analysis.comp_prices.clone(),
                comp_analysis.avg_price_per_sqft,
            ),
            None => (Vec::new(), Vec::new(), 0.0),
        };

        DealAnalysisResult {
            offer_price,
            offer_per_sqft,
            arv,
            arv_per_sqft,
            diff,
            rehab,
            selling_costs,
            total_cost,
            est_profit,
            finance: FinanceBreakdown::new(finance_defaults, &finance_result),
            profit_with_finance,
            roi,
            mao,
            wholesale_profit,
            score,
            comp_addresses,
            comp_prices,
            comp_avg_per_sqft,
        }
    }
}
