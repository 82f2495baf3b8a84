use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Location catalog for the scorer. Read-only after startup; the `Default`
/// carries the Austin submarket tiers the acquisition team works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub premium_zips: BTreeSet<String>,
    pub good_zips: BTreeSet<String>,
}

impl ScoringConfig {
    pub fn with_zip_tiers<I, J>(premium: I, good: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            premium_zips: premium.into_iter().collect(),
            good_zips: good.into_iter().collect(),
        }
    }
}

const PREMIUM_ZIPS: &[&str] = &[
    "78701", "78702", "78703", "78705", "78731", "78746", "78751", "78756", "78757",
];

const GOOD_ZIPS: &[&str] = &[
    "78704", "78722", "78723", "78727", "78729", "78735", "78739", "78745", "78748", "78749",
    "78750", "78759", "78613", "78681",
];

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::with_zip_tiers(
            PREMIUM_ZIPS.iter().map(|zip| zip.to_string()),
            GOOD_ZIPS.iter().map(|zip| zip.to_string()),
        )
    }
}
