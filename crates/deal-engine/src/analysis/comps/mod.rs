mod ingest;

pub use ingest::{CompCsvImporter, CompImportError};

use super::domain::{round2, CompConfidence, CompSale};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for comp selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompFilterConfig {
    pub max_distance_miles: f64,
    pub max_age_days: i64,
    pub sqft_tolerance: f64,
    /// Cap on comps fed into the aggregate, taken closest-first.
    pub max_comps: usize,
}

impl Default for CompFilterConfig {
    fn default() -> Self {
        Self {
            max_distance_miles: 0.5,
            max_age_days: 180,
            sqft_tolerance: 0.25,
            max_comps: 5,
        }
    }
}

/// Aggregate derived from the selected comps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompAnalysis {
    pub comp_addresses: Vec<String>,
    pub comp_prices: Vec<f64>,
    pub avg_price_per_sqft: f64,
    pub median_price_per_sqft: f64,
    pub estimated_arv: f64,
    pub confidence: CompConfidence,
    pub comp_count: usize,
}

impl CompAnalysis {
    /// The zeroed low-confidence analysis returned when no comp is usable.
    pub fn empty() -> Self {
        Self {
            comp_addresses: Vec::new(),
            comp_prices: Vec::new(),
            avg_price_per_sqft: 0.0,
            median_price_per_sqft: 0.0,
            estimated_arv: 0.0,
            confidence: CompConfidence::Low,
            comp_count: 0,
        }
    }
}

/// Select the comps relevant to the subject property.
///
/// A comp survives only if it is within the distance cap, its square footage
/// falls inside the tolerance band around the target, its sale date parses,
/// and the sale is recent enough. Unparseable sale dates exclude the comp
/// rather than defaulting. The survivors come back ordered closest-first.
pub fn filter_comps(
    comps: &[CompSale],
    target_sqft: f64,
    today: NaiveDate,
    config: &CompFilterConfig,
) -> Vec<CompSale> {
    let min_sqft = target_sqft * (1.0 - config.sqft_tolerance);
    let max_sqft = target_sqft * (1.0 + config.sqft_tolerance);

    let mut selected: Vec<CompSale> = comps
        .iter()
        .filter(|comp| {
            if comp.distance_miles > config.max_distance_miles {
                return false;
            }
            if comp.sqft < min_sqft || comp.sqft > max_sqft {
                return false;
            }
            match parse_sale_date(&comp.sale_date) {
                Some(sold_on) => (today - sold_on).num_days() <= config.max_age_days,
                None => false,
            }
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    selected
}

/// Estimate ARV from filtered comps via median $/sqft of the closest comps.
pub fn analyze_comps(
    filtered: &[CompSale],
    target_sqft: f64,
    config: &CompFilterConfig,
) -> CompAnalysis {
    let usable = &filtered[..filtered.len().min(config.max_comps)];

    if usable.is_empty() {
        return CompAnalysis::empty();
    }

    let prices_per_sqft: Vec<f64> = usable
        .iter()
        .map(|comp| comp.sale_price / comp.sqft)
        .collect();

    let avg = prices_per_sqft.iter().sum::<f64>() / prices_per_sqft.len() as f64;

    let mut sorted = prices_per_sqft.clone();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let confidence = if usable.len() >= 3 {
        CompConfidence::High
    } else if usable.len() == 2 {
        CompConfidence::Medium
    } else {
        CompConfidence::Low
    };

    CompAnalysis {
        comp_addresses: usable.iter().map(|comp| comp.address.clone()).collect(),
        comp_prices: usable.iter().map(|comp| comp.sale_price).collect(),
        avg_price_per_sqft: round2(avg),
        median_price_per_sqft: round2(median),
        estimated_arv: (median * target_sqft).round(),
        confidence,
        comp_count: usable.len(),
    }
}

pub(crate) fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    // Some county feeds still ship US-style dates.
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}
