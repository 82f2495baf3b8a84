use crate::analysis::domain::CompSale;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

/// Reads comparable sales out of a provider CSV export.
///
/// Expected columns: Address, Sale Price, Sqft, Beds, Baths, Sale Date,
/// Distance Miles. Prices may carry `$` and thousands separators.
pub struct CompCsvImporter;

#[derive(Debug, thiserror::Error)]
pub enum CompImportError {
    #[error("failed to read comp export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid comp CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {field} '{value}' is not a number")]
    BadNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

impl CompCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CompSale>, CompImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CompSale>, CompImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut comps = Vec::new();
        for (index, record) in csv_reader.deserialize::<CompRow>().enumerate() {
            let row = record?;
            comps.push(row.into_comp(index + 2)?);
        }

        Ok(comps)
    }
}

#[derive(Debug, Deserialize)]
struct CompRow {
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Sale Price")]
    sale_price: String,
    #[serde(rename = "Sqft")]
    sqft: String,
    #[serde(rename = "Beds", default, deserialize_with = "empty_string_as_none")]
    beds: Option<String>,
    #[serde(rename = "Baths", default, deserialize_with = "empty_string_as_none")]
    baths: Option<String>,
    #[serde(rename = "Sale Date", default)]
    sale_date: String,
    #[serde(rename = "Distance Miles")]
    distance_miles: String,
}

impl CompRow {
    fn into_comp(self, row: usize) -> Result<CompSale, CompImportError> {
        let sale_price = parse_money(&self.sale_price).ok_or_else(|| CompImportError::BadNumber {
            row,
            field: "Sale Price",
            value: self.sale_price.clone(),
        })?;
        let sqft = parse_money(&self.sqft).ok_or_else(|| CompImportError::BadNumber {
            row,
            field: "Sqft",
            value: self.sqft.clone(),
        })?;
        let distance_miles =
            parse_money(&self.distance_miles).ok_or_else(|| CompImportError::BadNumber {
                row,
                field: "Distance Miles",
                value: self.distance_miles.clone(),
            })?;

        // Beds/baths are informational on a comp; missing values default.
        let beds = self
            .beds
            .as_deref()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let baths = self
            .baths
            .as_deref()
            .and_then(parse_money)
            .unwrap_or(2.0);

        Ok(CompSale {
            address: self.address,
            sale_price,
            sqft,
            beds,
            baths,
            sale_date: self.sale_date,
            distance_miles,
        })
    }
}

fn parse_money(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Address,Sale Price,Sqft,Beds,Baths,Sale Date,Distance Miles
101 Oak St,\"$312,000\",1480,3,2,2026-01-20,0.18
205 Elm Dr,305000,1525,,,2026-02-02,0.42
";

    #[test]
    fn imports_rows_with_formatted_prices_and_defaults() {
        let comps =
            CompCsvImporter::from_reader(Cursor::new(SAMPLE.as_bytes())).expect("import succeeds");

        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].address, "101 Oak St");
        assert_eq!(comps[0].sale_price, 312_000.0);
        assert_eq!(comps[0].distance_miles, 0.18);
        assert_eq!(comps[1].beds, 3);
        assert_eq!(comps[1].baths, 2.0);
        assert_eq!(comps[1].sale_date, "2026-02-02");
    }

    #[test]
    fn rejects_rows_with_unreadable_prices() {
        let bad = "\
Address,Sale Price,Sqft,Beds,Baths,Sale Date,Distance Miles
101 Oak St,call agent,1480,3,2,2026-01-20,0.18
";
        let result = CompCsvImporter::from_reader(Cursor::new(bad.as_bytes()));

        match result {
            Err(CompImportError::BadNumber { row, field, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "Sale Price");
            }
            other => panic!("expected bad-number error, got {other:?}"),
        }
    }
}
