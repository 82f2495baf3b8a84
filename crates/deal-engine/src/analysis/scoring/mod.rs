mod config;
mod rules;

pub use config::ScoringConfig;

use super::domain::DealGrade;
use serde::{Deserialize, Serialize};

/// Signals the scorer consumes. All derived upstream; the scorer never
/// reaches back into the property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    /// ROI percentage, e.g. 28.44.
    pub roi: f64,
    /// MAO minus offer price, in dollars.
    pub wholesale_spread: f64,
    pub comp_count: usize,
    /// Owner equity as a fraction (0.50 = 50%). A proxy derived from
    /// assessed value and asking price; may legitimately be negative.
    pub estimated_equity: f64,
    pub distress_signal: Option<String>,
    pub days_on_market: Option<u32>,
    pub zip_code: Option<String>,
}

/// Per-factor breakdown. Factor maxima: 25 + 20 + 15 + 15 + 10 + 10 + 5 = 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub roi: u8,
    pub wholesale_spread: u8,
    pub arv_confidence: u8,
    pub equity_position: u8,
    pub distress_signal: u8,
    pub location_quality: u8,
    pub days_on_market: u8,
}

impl ScoreFactors {
    pub fn sum(&self) -> u8 {
        self.roi
            + self.wholesale_spread
            + self.arv_confidence
            + self.equity_position
            + self.distress_signal
            + self.location_quality
            + self.days_on_market
    }
}

/// Weighted 0-100 score and letter grade with the factor trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total_score: u8,
    pub grade: DealGrade,
    pub factors: ScoreFactors,
}

/// Stateless scorer applying the weighted rubric to one deal's signals.
#[derive(Debug, Clone, Default)]
pub struct DealScorer {
    config: ScoringConfig,
}

impl DealScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &ScoreInput) -> ScoreResult {
        let factors = ScoreFactors {
            roi: rules::score_roi(input.roi),
            wholesale_spread: rules::score_wholesale_spread(input.wholesale_spread),
            arv_confidence: rules::score_arv_confidence(input.comp_count),
            equity_position: rules::score_equity_position(input.estimated_equity),
            distress_signal: rules::score_distress_signal(input.distress_signal.as_deref()),
            location_quality: rules::score_location(input.zip_code.as_deref(), &self.config),
            days_on_market: rules::score_days_on_market(input.days_on_market),
        };

        let total_score = factors.sum();

        ScoreResult {
            total_score,
            grade: DealGrade::from_score(total_score),
            factors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_deal_scores_ninety_seven() {
        let scorer = DealScorer::default();
        let result = scorer.score(&ScoreInput {
            roi: 35.0,
            wholesale_spread: 16_000.0,
            comp_count: 4,
            estimated_equity: 0.55,
            distress_signal: Some("Pre-foreclosure".to_string()),
            days_on_market: Some(5),
            zip_code: Some("78704".to_string()),
        });

        assert_eq!(result.factors.roi, 25);
        assert_eq!(result.factors.wholesale_spread, 20);
        assert_eq!(result.factors.arv_confidence, 15);
        assert_eq!(result.factors.equity_position, 15);
        assert_eq!(result.factors.distress_signal, 10);
        assert_eq!(result.factors.location_quality, 7);
        assert_eq!(result.factors.days_on_market, 5);
        assert_eq!(result.total_score, 97);
        assert_eq!(result.grade, DealGrade::A);
    }

    #[test]
    fn total_is_the_exact_factor_sum_and_bounded() {
        let scorer = DealScorer::default();

        let best = scorer.score(&ScoreInput {
            roi: 40.0,
            wholesale_spread: 20_000.0,
            comp_count: 5,
            estimated_equity: 0.60,
            distress_signal: Some("Pre-foreclosure".to_string()),
            days_on_market: Some(3),
            zip_code: Some("78701".to_string()),
        });
        assert_eq!(best.total_score, best.factors.sum());
        assert_eq!(best.total_score, 100);

        let worst = scorer.score(&ScoreInput {
            roi: -10.0,
            wholesale_spread: -5_000.0,
            comp_count: 1,
            estimated_equity: 0.0,
            distress_signal: None,
            days_on_market: Some(200),
            zip_code: Some("79901".to_string()),
        });
        assert_eq!(worst.total_score, worst.factors.sum());
        assert_eq!(worst.total_score, 9);
        assert_eq!(worst.grade, DealGrade::F);
    }

    #[test]
    fn zero_roi_earns_no_roi_points() {
        let scorer = DealScorer::default();
        let result = scorer.score(&ScoreInput {
            roi: 0.0,
            wholesale_spread: 0.0,
            comp_count: 0,
            estimated_equity: 0.0,
            distress_signal: None,
            days_on_market: None,
            zip_code: None,
        });

        assert_eq!(result.factors.roi, 0);
        // AVM-only 2, unknown zip 5, unknown DOM 2.
        assert_eq!(result.total_score, 9);
    }
}
