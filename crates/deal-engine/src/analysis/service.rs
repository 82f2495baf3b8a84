use std::sync::Arc;

use super::analyzer::{DealAnalysisInput, DealAnalysisResult, DealAnalyzer};
use super::repository::{AnalysisRepository, AnalysisRow, RepositoryError};
use chrono::NaiveDate;
use tracing::info;

/// Service composing the analyzer with the storage seam: run an analysis,
/// append the flattened row, hand the result back.
pub struct DealAnalysisService<R> {
    analyzer: DealAnalyzer,
    repository: Arc<R>,
}

impl<R> DealAnalysisService<R>
where
    R: AnalysisRepository + 'static,
{
    pub fn new(analyzer: DealAnalyzer, repository: Arc<R>) -> Self {
        Self {
            analyzer,
            repository,
        }
    }

    /// Analyze a property and record the run. Each call appends a fresh
    /// row; prior analyses are never updated in place.
    pub fn analyze_and_store(
        &self,
        property_id: &str,
        input: &DealAnalysisInput,
        today: NaiveDate,
    ) -> Result<DealAnalysisResult, AnalysisServiceError> {
        let result = self.analyzer.analyze(input, today);

        let row = AnalysisRow::from_result(property_id, today, &result);
        self.repository.append(row)?;

        info!(
            property_id,
            grade = result.score.grade.label(),
            score = result.score.total_score,
            offer = result.offer_price,
            arv = result.arv,
            "deal analyzed"
        );

        Ok(result)
    }

    /// Stored analysis history for a property, oldest first.
    pub fn history(&self, property_id: &str) -> Result<Vec<AnalysisRow>, AnalysisServiceError> {
        Ok(self.repository.history(property_id)?)
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
