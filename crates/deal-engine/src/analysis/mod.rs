pub mod comps;
pub mod domain;
pub mod finance;
pub mod rehab;
pub mod repository;
pub mod scoring;

mod analyzer;
mod service;

pub use analyzer::{DealAnalysisInput, DealAnalysisResult, DealAnalyzer};
pub use service::{AnalysisServiceError, DealAnalysisService};
