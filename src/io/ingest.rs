//! CSV ingest of the external sales table.
//!
//! This module is responsible for turning a sales CSV into validated
//! `SalesRecord`s. No aggregation happens here.
//!
//! - **Strict schema** for required columns (`product_name`, `year`, `monthly_sales`)
//! - **Optional month**: a `month` column, or the month of an ISO `date` column
//! - **Row-level validation** (skip bad rows, but report what happened)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;

use crate::domain::{MONTHS_PER_YEAR, SalesRecord};
use crate::error::ForecastError;

const PRODUCT_COLUMNS: [&str; 2] = ["product_name", "product"];
const SALES_COLUMNS: [&str; 2] = ["monthly_sales", "sales"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated records plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<SalesRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Whether the month could be read (from `month` or `date`).
    pub has_month: bool,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    product: usize,
    year: usize,
    sales: usize,
    month: Option<usize>,
    date: Option<usize>,
}

/// Load and validate a sales CSV from disk.
///
/// A missing file, missing required columns, or zero valid rows are all
/// `MissingInputData`: there is nothing to forecast from.
pub fn load_sales_records(path: &Path) -> Result<IngestedData, ForecastError> {
    let file = File::open(path)
        .map_err(|e| ForecastError::MissingInputData(format!("failed to open '{}': {e}", path.display())))?;
    let data = read_sales_records(file)?;

    if data.records.is_empty() {
        return Err(ForecastError::MissingInputData(format!(
            "'{}' contains no valid sales rows ({} read, {} rejected)",
            path.display(),
            data.rows_read,
            data.row_errors.len()
        )));
    }
    Ok(data)
}

/// Read sales records from any CSV source.
pub fn read_sales_records<R: Read>(reader: R) -> Result<IngestedData, ForecastError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::MissingInputData(format!("failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &columns));
        match parsed {
            Ok(r) => records.push(r),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        has_month: columns.month.is_some() || columns.date.is_some(),
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase().replace(' ', "_")
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, ForecastError> {
    let find = |names: &[&str]| names.iter().find_map(|n| header_map.get(*n).copied());

    let product = find(&PRODUCT_COLUMNS)
        .ok_or_else(|| ForecastError::MissingInputData("missing required column: `product_name`".to_string()))?;
    let year = find(&["year"])
        .ok_or_else(|| ForecastError::MissingInputData("missing required column: `year`".to_string()))?;
    let sales = find(&SALES_COLUMNS)
        .ok_or_else(|| ForecastError::MissingInputData("missing required column: `monthly_sales`".to_string()))?;

    Ok(Columns {
        product,
        year,
        sales,
        month: find(&["month"]),
        date: find(&["date"]),
    })
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<SalesRecord, String> {
    let product = get_required(record, columns.product, "product_name")?.to_string();

    let year_raw = get_required(record, columns.year, "year")?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|_| format!("Invalid `year` '{year_raw}'."))?;

    let sales_raw = get_required(record, columns.sales, "monthly_sales")?;
    let monthly_sales = sales_raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `monthly_sales` '{sales_raw}'."))?;
    if !monthly_sales.is_finite() || monthly_sales < 0.0 {
        return Err(format!("`monthly_sales` must be finite and non-negative, got {sales_raw}."));
    }

    let month = match (get_optional(record, columns.month), get_optional(record, columns.date)) {
        (Some(m), _) => Some(parse_month(m)?),
        (None, Some(d)) => Some(parse_date(d)?.month()),
        (None, None) => None,
    };

    Ok(SalesRecord {
        product,
        year,
        month,
        monthly_sales,
    })
}

fn parse_month(s: &str) -> Result<u32, String> {
    let month = s.parse::<u32>().map_err(|_| format!("Invalid `month` '{s}'."))?;
    if !(1..=MONTHS_PER_YEAR).contains(&month) {
        return Err(format!("`month` must be within 1..=12, got {month}."));
    }
    Ok(month)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD."))
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    record.get(idx?).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_canonical_headers() {
        let csv = "\u{feff}Product_Name,Year,Monthly_Sales,Cost\nLaptop Pro,2021,1200,999.5\nSmartphone X,2022,800,500\n";
        let data = read_sales_records(csv.as_bytes()).unwrap();
        assert_eq!(data.records.len(), 2);
        assert!(!data.has_month);
        assert_eq!(data.records[0].product, "Laptop Pro");
        assert_eq!(data.records[0].year, 2021);
        assert_eq!(data.records[0].month, None);
        assert_eq!(data.records[0].monthly_sales, 1200.0);
    }

    #[test]
    fn month_can_be_derived_from_date() {
        let csv = "product,year,date,sales\nA,2021,2021-07-15,10\n";
        let data = read_sales_records(csv.as_bytes()).unwrap();
        assert!(data.has_month);
        assert_eq!(data.records[0].month, Some(7));
    }

    #[test]
    fn bad_rows_are_reported_and_skipped() {
        let csv = "Product_Name,Year,Month,Monthly_Sales\nA,2020,1,10\nA,20x0,1,10\nA,2020,13,10\nA,2020,2,-5\n,2020,2,5\n";
        let data = read_sales_records(csv.as_bytes()).unwrap();
        assert_eq!(data.rows_read, 5);
        assert_eq!(data.records.len(), 1);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
    }

    #[test]
    fn missing_required_column_is_missing_input() {
        let csv = "Product_Name,Month,Monthly_Sales\nA,1,10\n";
        let err = read_sales_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::MissingInputData(_)));
        assert!(err.to_string().contains("year"));
    }

    #[test]
    fn absent_file_is_missing_input() {
        let err = load_sales_records(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ForecastError::MissingInputData(_)));
    }
}
