use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use deal_engine::analysis::comps::{
    analyze_comps, filter_comps, CompAnalysis, CompCsvImporter, CompFilterConfig,
};
use deal_engine::analysis::domain::{CompSale, Property};
use deal_engine::analysis::rehab::RehabLevel;
use deal_engine::analysis::{DealAnalysisInput, DealAnalysisResult, DealAnalyzer};
use deal_engine::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Property snapshot as a JSON file
    #[arg(long)]
    pub(crate) property: PathBuf,
    /// Optional comparable-sales CSV export
    #[arg(long)]
    pub(crate) comps: Option<PathBuf>,
    /// Override the after-repair value
    #[arg(long)]
    pub(crate) arv: Option<f64>,
    /// Override the offer price
    #[arg(long)]
    pub(crate) offer: Option<f64>,
    /// Force a rehab severity tier (light, medium, heavy)
    #[arg(long, value_parser = parse_rehab_level)]
    pub(crate) rehab_level: Option<RehabLevel>,
    /// Reference date for comp recency math (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the demo run (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn parse_rehab_level(raw: &str) -> Result<RehabLevel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "light" => Ok(RehabLevel::Light),
        "medium" => Ok(RehabLevel::Medium),
        "heavy" => Ok(RehabLevel::Heavy),
        other => Err(format!("unknown rehab level '{other}'")),
    }
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        property,
        comps,
        arv,
        offer,
        rehab_level,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let raw = std::fs::read_to_string(property)?;
    let property: Property = serde_json::from_str(&raw)
        .map_err(|err| AppError::InvalidInput(format!("property JSON: {err}")))?;

    let comp_analysis = match comps {
        Some(path) => {
            let comps = CompCsvImporter::from_path(path)?;
            Some(run_comp_pipeline(&comps, &property, today))
        }
        None => None,
    };

    let mut input = DealAnalysisInput::for_property(property);
    input.arv = arv;
    input.offer_price = offer;
    input.rehab_level = rehab_level;
    input.comp_analysis = comp_analysis;

    let result = DealAnalyzer::default().analyze(&input, today);
    render_analysis(&input.property, &result, today);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Deal analysis demo");
    let property = demo_property();
    let comps = demo_comps(today);

    println!(
        "\nSubject: {} ({} bd / {} ba, {} sqft, asking ${:.0})",
        property.address,
        property.beds.unwrap_or_default(),
        property.baths.unwrap_or_default(),
        property.sqft.unwrap_or_default(),
        property.asking_price.unwrap_or_default(),
    );

    let comp_analysis = run_comp_pipeline(&comps, &property, today);
    println!(
        "Comps: {} usable, median ${:.2}/sqft, estimated ARV ${:.0} ({} confidence)",
        comp_analysis.comp_count,
        comp_analysis.median_price_per_sqft,
        comp_analysis.estimated_arv,
        comp_analysis.confidence.label(),
    );

    let mut input = DealAnalysisInput::for_property(property);
    input.comp_analysis = Some(comp_analysis);

    let result = DealAnalyzer::default().analyze(&input, today);
    render_analysis(&input.property, &result, today);

    Ok(())
}

fn run_comp_pipeline(comps: &[CompSale], property: &Property, today: NaiveDate) -> CompAnalysis {
    let config = CompFilterConfig::default();
    let target_sqft = property.sqft.unwrap_or(1500.0);
    let filtered = filter_comps(comps, target_sqft, today, &config);
    analyze_comps(&filtered, target_sqft, &config)
}

fn render_analysis(property: &Property, result: &DealAnalysisResult, today: NaiveDate) {
    println!("\nAnalysis for {} as of {}", property.address, today);

    println!("\nOffer analysis");
    println!("  offer price        ${:>12.2}  (${:.2}/sqft)", result.offer_price, result.offer_per_sqft);
    println!("  ARV                ${:>12.2}  (${:.2}/sqft)", result.arv, result.arv_per_sqft);
    println!("  spread (ARV-offer) ${:>12.2}", result.diff);

    println!("\nRehab ({})", result.rehab.level.label());
    for (name, amount) in [
        ("kitchen", result.rehab.kitchen),
        ("bath", result.rehab.bath),
        ("interior paint", result.rehab.interior_paint),
        ("exterior paint", result.rehab.exterior_paint),
        ("flooring", result.rehab.flooring),
        ("windows", result.rehab.windows),
        ("misc", result.rehab.misc),
        ("roof", result.rehab.roof),
        ("sheetrock", result.rehab.sheetrock),
        ("framing", result.rehab.framing),
        ("electrical", result.rehab.electrical),
        ("plumbing", result.rehab.plumbing),
        ("hvac", result.rehab.hvac),
        ("landscape", result.rehab.landscape),
        ("foundation", result.rehab.foundation),
        ("other", result.rehab.other),
    ] {
        if amount > 0.0 {
            println!("  {name:<16} ${amount:>12.2}");
        }
    }
    println!("  {:<16} ${:>12.2}", "total", result.rehab.total);

    println!("\nCosts and profit");
    println!("  selling costs      ${:>12.2}", result.selling_costs);
    println!("  total cost         ${:>12.2}", result.total_cost);
    println!("  est. profit        ${:>12.2}", result.est_profit);

    println!("\nFinancing ({} months @ {:.1}% + {:.1} pts)",
        result.finance.months_held,
        result.finance.interest_pct * 100.0,
        result.finance.points_pct * 100.0,
    );
    println!("  loan amount        ${:>12.2}", result.finance.loan_amount);
    println!("  monthly payment    ${:>12.2}", result.finance.monthly_payment);
    println!("  total finance cost ${:>12.2}", result.finance.total_finance_cost);
    println!("  profit w/ finance  ${:>12.2}", result.profit_with_finance);
    println!("  ROI                {:>13.2}%", result.roi);

    println!("\nWholesale");
    println!("  MAO                ${:>12.2}", result.mao);
    println!("  wholesale profit   ${:>12.2}", result.wholesale_profit);

    let factors = &result.score.factors;
    println!("\nScore: {} ({} / 100)", result.score.grade.label(), result.score.total_score);
    println!("  roi {}  spread {}  comps {}  equity {}  distress {}  location {}  dom {}",
        factors.roi,
        factors.wholesale_spread,
        factors.arv_confidence,
        factors.equity_position,
        factors.distress_signal,
        factors.location_quality,
        factors.days_on_market,
    );
}

fn demo_property() -> Property {
    Property {
        address: "4812 Loyola Ln".to_string(),
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        zip_code: Some("78723".to_string()),
        beds: Some(3),
        baths: Some(2.0),
        sqft: Some(1450.0),
        lot_sqft: Some(7_800.0),
        year_built: Some(1968),
        property_type: Some("Single Family".to_string()),
        list_type: Some("Pre-foreclosure".to_string()),
        asking_price: Some(265_000.0),
        tax_assessed_value: Some(340_000.0),
        last_sale_price: Some(118_000.0),
        last_sale_date: NaiveDate::from_ymd_opt(2009, 6, 12),
        days_on_market: Some(18),
    }
}

fn demo_comps(today: NaiveDate) -> Vec<CompSale> {
    let recent = today - chrono::Duration::days(45);
    let sale_date = recent.format("%Y-%m-%d").to_string();

    vec![
        CompSale {
            address: "4904 Loyola Ln".to_string(),
            sale_price: 410_000.0,
            sqft: 1500.0,
            beds: 3,
            baths: 2.0,
            sale_date: sale_date.clone(),
            distance_miles: 0.12,
        },
        CompSale {
            address: "1204 Larkwood Dr".to_string(),
            sale_price: 395_000.0,
            sqft: 1380.0,
            beds: 3,
            baths: 2.0,
            sale_date: sale_date.clone(),
            distance_miles: 0.28,
        },
        CompSale {
            address: "5010 Creek Bend Cv".to_string(),
            sale_price: 428_000.0,
            sqft: 1540.0,
            beds: 4,
            baths: 2.5,
            sale_date,
            distance_miles: 0.41,
        },
    ]
}
