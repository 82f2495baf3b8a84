use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of a discovered property as delivered by the data providers.
///
/// Every market fact is optional; discovery feeds are sparse and the engine
/// substitutes documented defaults instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub baths: Option<f64>,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub lot_sqft: Option<f64>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub property_type: Option<String>,
    /// Listing/distress category as reported upstream, e.g. "Pre-foreclosure".
    #[serde(default)]
    pub list_type: Option<String>,
    #[serde(default)]
    pub asking_price: Option<f64>,
    #[serde(default)]
    pub tax_assessed_value: Option<f64>,
    #[serde(default)]
    pub last_sale_price: Option<f64>,
    #[serde(default)]
    pub last_sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_on_market: Option<u32>,
}

/// A comparable recent sale near the subject property.
///
/// The sale date stays the provider's raw string; comp filtering parses it
/// and drops the comp when it cannot be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompSale {
    pub address: String,
    pub sale_price: f64,
    pub sqft: f64,
    pub beds: u32,
    pub baths: f64,
    pub sale_date: String,
    pub distance_miles: f64,
}

/// Confidence tier attached to a comp-derived ARV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompConfidence {
    High,
    Medium,
    Low,
}

impl CompConfidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// External automated-valuation estimate, used when no comps are usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub value: f64,
    pub confidence: CompConfidence,
}

/// Letter grade assigned to a scored deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealGrade {
    A,
    B,
    C,
    D,
    F,
}

impl DealGrade {
    /// Grade boundaries are inclusive at the lower edge: 80 is an A, 79 a B.
    pub const fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::A,
            60..=79 => Self::B,
            40..=59 => Self::C,
            20..=39 => Self::D,
            _ => Self::F,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Round to cents. Applied to every currency and $/sqft figure so repeated
/// persistence round-trips do not drift.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_are_inclusive_at_the_lower_edge() {
        assert_eq!(DealGrade::from_score(100), DealGrade::A);
        assert_eq!(DealGrade::from_score(80), DealGrade::A);
        assert_eq!(DealGrade::from_score(79), DealGrade::B);
        assert_eq!(DealGrade::from_score(60), DealGrade::B);
        assert_eq!(DealGrade::from_score(59), DealGrade::C);
        assert_eq!(DealGrade::from_score(40), DealGrade::C);
        assert_eq!(DealGrade::from_score(39), DealGrade::D);
        assert_eq!(DealGrade::from_score(20), DealGrade::D);
        assert_eq!(DealGrade::from_score(19), DealGrade::F);
        assert_eq!(DealGrade::from_score(0), DealGrade::F);
    }

    #[test]
    fn round2_keeps_cents() {
        assert_eq!(round2(2683.333333), 2683.33);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.0), 0.0);
    }
}
