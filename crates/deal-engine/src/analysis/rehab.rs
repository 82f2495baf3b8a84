use super::domain::Property;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Unit costs for the rehab line items. Injected at startup; the `Default`
/// carries the acquisition team's cost matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabCostTable {
    pub kitchen: f64,
    pub bath_per_unit: f64,
    pub interior_paint_per_sqft: f64,
    pub exterior_paint_per_sqft: f64,
    pub flooring_per_sqft: f64,
    pub window_per_unit: f64,
    pub misc: f64,
    pub roof: f64,
    pub sheetrock_per_room: f64,
    pub framing_per_sqft: f64,
    pub electrical: f64,
    pub plumbing: f64,
    pub hvac: f64,
    pub landscape: f64,
    pub foundation_min: f64,
    /// Ceiling for manual foundation overrides; never applied automatically.
    pub foundation_max: f64,
}

impl Default for RehabCostTable {
    fn default() -> Self {
        Self {
            kitchen: 8_000.0,
            bath_per_unit: 2_000.0,
            interior_paint_per_sqft: 2.0,
            exterior_paint_per_sqft: 2.0,
            flooring_per_sqft: 3.0,
            window_per_unit: 350.0,
            misc: 2_000.0,
            roof: 10_000.0,
            sheetrock_per_room: 500.0,
            framing_per_sqft: 7.0,
            electrical: 5_000.0,
            plumbing: 8_000.0,
            hvac: 10_000.0,
            landscape: 2_000.0,
            foundation_min: 10_000.0,
            foundation_max: 50_000.0,
        }
    }
}

/// Renovation severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehabLevel {
    Light,
    Medium,
    Heavy,
}

impl RehabLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Itemized rehab estimate. `total` always equals the sum of the sixteen
/// line items; any mutation goes through [`RehabEstimate::apply`] or ends
/// with [`RehabEstimate::recompute_total`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabEstimate {
    pub level: RehabLevel,
    pub kitchen: f64,
    pub bath: f64,
    pub interior_paint: f64,
    pub exterior_paint: f64,
    pub flooring: f64,
    pub windows: f64,
    pub misc: f64,
    pub roof: f64,
    pub sheetrock: f64,
    pub framing: f64,
    pub electrical: f64,
    pub plumbing: f64,
    pub hvac: f64,
    pub landscape: f64,
    pub foundation: f64,
    pub other: f64,
    pub total: f64,
}

/// Partial line-item override, layered onto a base estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RehabPatch {
    pub kitchen: Option<f64>,
    pub bath: Option<f64>,
    pub interior_paint: Option<f64>,
    pub exterior_paint: Option<f64>,
    pub flooring: Option<f64>,
    pub windows: Option<f64>,
    pub misc: Option<f64>,
    pub roof: Option<f64>,
    pub sheetrock: Option<f64>,
    pub framing: Option<f64>,
    pub electrical: Option<f64>,
    pub plumbing: Option<f64>,
    pub hvac: Option<f64>,
    pub landscape: Option<f64>,
    pub foundation: Option<f64>,
    pub other: Option<f64>,
}

impl RehabEstimate {
    fn zeroed(level: RehabLevel) -> Self {
        Self {
            level,
            kitchen: 0.0,
            bath: 0.0,
            interior_paint: 0.0,
            exterior_paint: 0.0,
            flooring: 0.0,
            windows: 0.0,
            misc: 0.0,
            roof: 0.0,
            sheetrock: 0.0,
            framing: 0.0,
            electrical: 0.0,
            plumbing: 0.0,
            hvac: 0.0,
            landscape: 0.0,
            foundation: 0.0,
            other: 0.0,
            total: 0.0,
        }
    }

    pub fn line_items(&self) -> [f64; 16] {
        [
            self.kitchen,
            self.bath,
            self.interior_paint,
            self.exterior_paint,
            self.flooring,
            self.windows,
            self.misc,
            self.roof,
            self.sheetrock,
            self.framing,
            self.electrical,
            self.plumbing,
            self.hvac,
            self.landscape,
            self.foundation,
            self.other,
        ]
    }

    /// Restore the `total == sum(line items)` invariant.
    pub fn recompute_total(&mut self) {
        self.total = self.line_items().iter().sum();
    }

    /// Merge a manual override onto this estimate and recompute the total.
    pub fn apply(&mut self, patch: &RehabPatch) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })+
            };
        }
        merge!(
            kitchen,
            bath,
            interior_paint,
            exterior_paint,
            flooring,
            windows,
            misc,
            roof,
            sheetrock,
            framing,
            electrical,
            plumbing,
            hvac,
            landscape,
            foundation,
            other,
        );
        self.recompute_total();
    }

    /// Build an estimate entirely from manually entered line items.
    pub fn from_line_items(patch: &RehabPatch) -> Self {
        let mut estimate = Self::zeroed(RehabLevel::Medium);
        estimate.apply(patch);
        estimate
    }
}

// Larger houses carry more windows; small ones still have a handful.
fn estimated_window_count(sqft: f64) -> f64 {
    (sqft / 150.0).round().max(6.0)
}

// Bedrooms plus shared living space, sized off the footprint.
fn estimated_room_count(beds: u32, sqft: f64) -> f64 {
    beds as f64 + (sqft / 600.0).floor().max(1.0)
}

/// Infer the renovation severity tier from property signals.
///
/// Accumulates a risk score from age, asking-to-assessed ratio, days on
/// market, and the distress category; risk >= 6 is heavy, >= 3 medium.
pub fn infer_rehab_level(property: &Property, today: NaiveDate) -> RehabLevel {
    let age = property
        .year_built
        .map(|year| today.year() - year)
        .unwrap_or(30);
    let price_to_assessed = match (property.asking_price, property.tax_assessed_value) {
        (Some(asking), Some(assessed)) if assessed > 0.0 => asking / assessed,
        _ => 1.0,
    };
    let dom = property.days_on_market.unwrap_or(30);

    let mut risk = 0;

    if age > 50 {
        risk += 3;
    } else if age > 30 {
        risk += 2;
    } else if age > 15 {
        risk += 1;
    }

    // Asking well below assessed value is the strongest condition signal.
    if price_to_assessed < 0.5 {
        risk += 3;
    } else if price_to_assessed < 0.7 {
        risk += 2;
    } else if price_to_assessed < 0.85 {
        risk += 1;
    }

    if dom > 120 {
        risk += 2;
    } else if dom > 60 {
        risk += 1;
    }

    match property.list_type.as_deref() {
        Some("Pre-foreclosure") | Some("Auction") => risk += 2,
        Some("REO") => risk += 1,
        _ => {}
    }

    if risk >= 6 {
        RehabLevel::Heavy
    } else if risk >= 3 {
        RehabLevel::Medium
    } else {
        RehabLevel::Light
    }
}

/// Price out the rehab catalog for a property at the given (or inferred)
/// severity tier.
///
/// Light covers the cosmetic items; medium adds roof, HVAC, windows, and
/// sheetrock; heavy adds framing over 15% of the footprint, electrical,
/// plumbing, and the minimum foundation allowance.
pub fn estimate_rehab(
    property: &Property,
    override_level: Option<RehabLevel>,
    today: NaiveDate,
    costs: &RehabCostTable,
) -> RehabEstimate {
    let level = override_level.unwrap_or_else(|| infer_rehab_level(property, today));
    let sqft = property.sqft.unwrap_or(1500.0);
    let beds = property.beds.unwrap_or(3);
    let baths = property.baths.unwrap_or(2.0);

    let mut estimate = RehabEstimate::zeroed(level);

    estimate.kitchen = costs.kitchen;
    estimate.bath = costs.bath_per_unit * baths;
    estimate.interior_paint = costs.interior_paint_per_sqft * sqft;
    estimate.exterior_paint = costs.exterior_paint_per_sqft * sqft;
    estimate.flooring = costs.flooring_per_sqft * sqft;
    estimate.misc = costs.misc;
    estimate.landscape = costs.landscape;

    if matches!(level, RehabLevel::Medium | RehabLevel::Heavy) {
        estimate.roof = costs.roof;
        estimate.hvac = costs.hvac;
        estimate.windows = costs.window_per_unit * estimated_window_count(sqft);
        estimate.sheetrock = costs.sheetrock_per_room * estimated_room_count(beds, sqft);
    }

    if level == RehabLevel::Heavy {
        estimate.framing = costs.framing_per_sqft * (sqft * 0.15).round();
        estimate.electrical = costs.electrical;
        estimate.plumbing = costs.plumbing;
        estimate.foundation = costs.foundation_min;
    }

    estimate.recompute_total();
    estimate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
    }

    fn bare_property() -> Property {
        Property {
            address: "500 Test Ave".to_string(),
            city: None,
            state: None,
            zip_code: None,
            beds: None,
            baths: None,
            sqft: None,
            lot_sqft: None,
            year_built: None,
            property_type: None,
            list_type: None,
            asking_price: None,
            tax_assessed_value: None,
            last_sale_price: None,
            last_sale_date: None,
            days_on_market: None,
        }
    }

    fn total_matches_sum(estimate: &RehabEstimate) -> bool {
        (estimate.total - estimate.line_items().iter().sum::<f64>()).abs() < 1e-9
    }

    #[test]
    fn defaults_produce_a_light_estimate() {
        let estimate = estimate_rehab(&bare_property(), None, today(), &RehabCostTable::default());

        assert_eq!(estimate.level, RehabLevel::Light);
        // sqft 1500, baths 2: kitchen 8000, bath 4000, paint 3000+3000,
        // flooring 4500, misc 2000, landscape 2000.
        assert_eq!(estimate.kitchen, 8_000.0);
        assert_eq!(estimate.bath, 4_000.0);
        assert_eq!(estimate.flooring, 4_500.0);
        assert_eq!(estimate.roof, 0.0);
        assert_eq!(estimate.total, 26_500.0);
        assert!(total_matches_sum(&estimate));
    }

    #[test]
    fn medium_tier_adds_mechanicals_windows_and_sheetrock() {
        let mut property = bare_property();
        property.sqft = Some(1500.0);
        property.beds = Some(3);

        let estimate = estimate_rehab(
            &property,
            Some(RehabLevel::Medium),
            today(),
            &RehabCostTable::default(),
        );

        // windows: max(6, round(1500/150)) = 10 -> 3500
        // sheetrock: 3 beds + max(1, floor(1500/600)) = 5 rooms -> 2500
        assert_eq!(estimate.windows, 3_500.0);
        assert_eq!(estimate.sheetrock, 2_500.0);
        assert_eq!(estimate.roof, 10_000.0);
        assert_eq!(estimate.hvac, 10_000.0);
        assert_eq!(estimate.framing, 0.0);
        assert!(total_matches_sum(&estimate));
    }

    #[test]
    fn heavy_tier_adds_structural_systems() {
        let estimate = estimate_rehab(
            &bare_property(),
            Some(RehabLevel::Heavy),
            today(),
            &RehabCostTable::default(),
        );

        // framing: 7 * round(1500 * 0.15) = 7 * 225 = 1575
        assert_eq!(estimate.framing, 1_575.0);
        assert_eq!(estimate.electrical, 5_000.0);
        assert_eq!(estimate.plumbing, 8_000.0);
        assert_eq!(estimate.foundation, 10_000.0);
        assert!(total_matches_sum(&estimate));
    }

    #[test]
    fn small_house_still_counts_six_windows() {
        assert_eq!(estimated_window_count(600.0), 6.0);
        assert_eq!(estimated_window_count(1500.0), 10.0);
    }

    #[test]
    fn infers_heavy_for_old_discounted_stale_listing() {
        let mut property = bare_property();
        property.year_built = Some(1950); // age 76 -> +3
        property.asking_price = Some(90_000.0);
        property.tax_assessed_value = Some(200_000.0); // ratio 0.45 -> +3
        property.days_on_market = Some(140); // +2
        property.list_type = Some("Pre-foreclosure".to_string()); // +2

        assert_eq!(infer_rehab_level(&property, today()), RehabLevel::Heavy);
    }

    #[test]
    fn infers_medium_for_moderate_signals() {
        let mut property = bare_property();
        property.year_built = Some(1990); // age 36 -> +2
        property.days_on_market = Some(70); // +1

        assert_eq!(infer_rehab_level(&property, today()), RehabLevel::Medium);
    }

    #[test]
    fn missing_signals_default_to_light() {
        // Assumed age 30 only trips the >15y bracket; ratio 1 and DOM 30
        // add nothing, so risk stays below the medium threshold.
        assert_eq!(infer_rehab_level(&bare_property(), today()), RehabLevel::Light);
    }

    #[test]
    fn applying_a_patch_recomputes_the_total() {
        let mut estimate = estimate_rehab(&bare_property(), None, today(), &RehabCostTable::default());
        let before = estimate.total;

        estimate.apply(&RehabPatch {
            foundation: Some(25_000.0),
            other: Some(1_200.0),
            ..RehabPatch::default()
        });

        assert_eq!(estimate.foundation, 25_000.0);
        assert_eq!(estimate.total, before + 25_000.0 + 1_200.0);
        assert!(total_matches_sum(&estimate));
    }

    #[test]
    fn manual_estimates_sum_their_line_items() {
        let estimate = RehabEstimate::from_line_items(&RehabPatch {
            kitchen: Some(12_000.0),
            flooring: Some(6_000.0),
            ..RehabPatch::default()
        });

        assert_eq!(estimate.level, RehabLevel::Medium);
        assert_eq!(estimate.total, 18_000.0);
        assert!(total_matches_sum(&estimate));
    }
}
