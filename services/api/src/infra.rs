use chrono::NaiveDate;
use deal_engine::analysis::finance::FinanceDefaults;
use deal_engine::analysis::rehab::RehabCostTable;
use deal_engine::analysis::repository::{AnalysisRepository, AnalysisRow, RepositoryError};
use deal_engine::analysis::scoring::ScoringConfig;
use deal_engine::analysis::{DealAnalysisService, DealAnalyzer};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

/// Concrete service type the routes work against; the api only ships the
/// in-memory repository.
pub(crate) type ApiService = DealAnalysisService<InMemoryAnalysisRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append-only in-memory store keyed by property id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    rows: Arc<Mutex<HashMap<String, Vec<AnalysisRow>>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn append(&self, row: AnalysisRow) -> Result<AnalysisRow, RepositoryError> {
        let mut guard = self.rows.lock().expect("repository mutex poisoned");
        guard
            .entry(row.property_id.clone())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn history(&self, property_id: &str) -> Result<Vec<AnalysisRow>, RepositoryError> {
        let guard = self.rows.lock().expect("repository mutex poisoned");
        match guard.get(property_id) {
            Some(rows) => Ok(rows.clone()),
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub(crate) fn build_service(
    finance: FinanceDefaults,
    repository: Arc<InMemoryAnalysisRepository>,
) -> Arc<ApiService> {
    let analyzer = DealAnalyzer::new(finance, RehabCostTable::default(), ScoringConfig::default());
    Arc::new(DealAnalysisService::new(analyzer, repository))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
