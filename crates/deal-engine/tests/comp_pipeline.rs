use chrono::NaiveDate;
use deal_engine::analysis::comps::{
    analyze_comps, filter_comps, CompCsvImporter, CompFilterConfig,
};
use deal_engine::analysis::domain::{CompConfidence, Property};
use deal_engine::analysis::{DealAnalysisInput, DealAnalyzer};
use std::io::Cursor;

const COMPS_CSV: &str = "\
Address,Sale Price,Sqft,Beds,Baths,Sale Date,Distance Miles
101 Oak St,\"$300,000\",1500,3,2,2026-01-20,0.30
205 Elm Dr,315000,1500,3,2,2026-02-02,0.10
310 Pine Ct,330000,1500,4,2.5,2026-01-05,0.20
412 Birch Rd,500000,2400,5,3,2026-01-12,0.15
577 Ash Way,295000,1480,3,2,2024-11-30,0.05
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

#[test]
fn csv_export_flows_through_filter_aggregate_and_analysis() {
    let comps = CompCsvImporter::from_reader(Cursor::new(COMPS_CSV.as_bytes()))
        .expect("comp export parses");
    assert_eq!(comps.len(), 5);

    let config = CompFilterConfig::default();
    let filtered = filter_comps(&comps, 1500.0, today(), &config);

    // Birch is oversized, Ash sold too long ago; survivors closest-first.
    let order: Vec<&str> = filtered.iter().map(|c| c.address.as_str()).collect();
    assert_eq!(order, vec!["205 Elm Dr", "310 Pine Ct", "101 Oak St"]);

    let analysis = analyze_comps(&filtered, 1500.0, &config);
    assert_eq!(analysis.comp_count, 3);
    assert_eq!(analysis.confidence, CompConfidence::High);
    assert_eq!(analysis.median_price_per_sqft, 210.0);
    assert_eq!(analysis.avg_price_per_sqft, 210.0);
    assert_eq!(analysis.estimated_arv, 315_000.0);

    let property = Property {
        address: "99 Subject St".to_string(),
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        zip_code: Some("78723".to_string()),
        beds: Some(3),
        baths: Some(2.0),
        sqft: Some(1500.0),
        lot_sqft: None,
        year_built: Some(2010),
        property_type: Some("Single Family".to_string()),
        list_type: Some("Vacant".to_string()),
        asking_price: Some(220_000.0),
        tax_assessed_value: Some(280_000.0),
        last_sale_price: None,
        last_sale_date: None,
        days_on_market: Some(12),
    };

    let mut input = DealAnalysisInput::for_property(property);
    input.comp_analysis = Some(analysis);

    let result = DealAnalyzer::default().analyze(&input, today());

    // Comp-derived ARV wins the fallback chain over the assessed markup.
    assert_eq!(result.arv, 315_000.0);
    assert_eq!(result.offer_price, 220_000.0);
    assert_eq!(result.score.factors.arv_confidence, 15);
    assert_eq!(result.comp_addresses.len(), 3);
}

#[test]
fn aggregation_is_idempotent_over_the_same_filtered_set() {
    let comps = CompCsvImporter::from_reader(Cursor::new(COMPS_CSV.as_bytes()))
        .expect("comp export parses");
    let config = CompFilterConfig::default();
    let filtered = filter_comps(&comps, 1500.0, today(), &config);

    let first = analyze_comps(&filtered, 1500.0, &config);
    let second = analyze_comps(&filtered, 1500.0, &config);

    assert_eq!(first, second);
}
