//! Combined price CSV adapter.
//!
//! Reads a comma-separated file with a header row and picks the stock, date
//! and close columns by name. Rows with an empty close are missing data and
//! are skipped; anything else malformed is an error naming the file and line.

use crate::domain::error::DispoError;
use crate::domain::price::{PriceRow, PriceTable};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const STOCK_COLUMNS: [&str; 3] = ["Stkcd", "stock_id", "stock_code"];
const DATE_COLUMNS: [&str; 2] = ["Trddt", "date"];
const CLOSE_COLUMNS: [&str; 3] = ["Clsprc", "close", "close_price"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

pub struct CsvPriceAdapter {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    stock: usize,
    date: usize,
    close: usize,
}

impl CsvPriceAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl Into<String>) -> DispoError {
        DispoError::PriceData {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn locate_columns(&self, headers: &csv::StringRecord) -> Result<Columns, DispoError> {
        let find = |names: &[&str], what: &str| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
                .ok_or_else(|| {
                    self.error(format!(
                        "missing {what} column (expected one of: {})",
                        names.join(", ")
                    ))
                })
        };
        Ok(Columns {
            stock: find(&STOCK_COLUMNS, "stock id")?,
            date: find(&DATE_COLUMNS, "date")?,
            close: find(&CLOSE_COLUMNS, "close price")?,
        })
    }

    /// Read every row, returning the rows kept and the number skipped for a
    /// missing close.
    pub fn read_rows(&self) -> Result<(Vec<PriceRow>, usize), DispoError> {
        let file = File::open(&self.path)
            .map_err(|e| self.error(format!("failed to open: {e}")))?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let headers = rdr
            .headers()
            .map_err(|e| self.error(format!("failed to read header: {e}")))?
            .clone();
        let cols = self.locate_columns(&headers)?;

        let mut rows = Vec::new();
        let mut missing_close = 0;
        for result in rdr.records() {
            let record = result.map_err(|e| self.error(format!("CSV parse error: {e}")))?;
            let line = record.position().map_or(0, |p| p.line());

            let stock_id = record.get(cols.stock).map(str::trim).unwrap_or_default();
            if stock_id.is_empty() {
                return Err(self.error(format!("line {line}: missing stock id")));
            }

            let date_str = record.get(cols.date).map(str::trim).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| {
                self.error(format!("line {line}: invalid date '{date_str}'"))
            })?;

            let close_str = record.get(cols.close).map(str::trim).unwrap_or_default();
            if close_str.is_empty() {
                missing_close += 1;
                continue;
            }
            let close: f64 = close_str.parse().map_err(|_| {
                self.error(format!("line {line}: invalid close value '{close_str}'"))
            })?;
            if !close.is_finite() || close <= 0.0 {
                return Err(self.error(format!(
                    "line {line}: close price must be positive, got {close_str}"
                )));
            }

            rows.push(PriceRow::new(stock_id, date, close));
        }

        Ok((rows, missing_close))
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // tolerate a trailing time component such as "2024-01-02 00:00:00"
    let day = s.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

impl PricePort for CsvPriceAdapter {
    fn load_prices(&self) -> Result<PriceTable, DispoError> {
        let (rows, missing_close) = self.read_rows()?;
        if missing_close > 0 {
            warn!(
                path = %self.path.display(),
                rows = missing_close,
                "skipped rows with no close price"
            );
        }

        let table = PriceTable::from_rows(rows);
        if table.duplicate_count() > 0 {
            warn!(
                path = %self.path.display(),
                rows = table.duplicate_count(),
                "duplicate (stock, date) rows ignored, first occurrence kept"
            );
        }
        info!(
            path = %self.path.display(),
            stocks = table.stock_count(),
            dates = table.date_count(),
            quotes = table.quote_count(),
            "price table loaded"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("combined_stock_data.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn loads_raw_column_names() {
        let (_dir, path) = write_csv(
            "Stkcd,Trddt,Trdsta,Opnprc,Clsprc\n\
             600000,2024-01-02,1,10.0,10.5\n\
             000001,2024-01-02,1,9.0,9.2\n\
             600000,2024-01-03,1,10.5,10.8\n",
        );
        let table = CsvPriceAdapter::new(path).load_prices().unwrap();

        assert_eq!(table.stocks(), ["600000", "000001"]);
        assert_eq!(table.date_count(), 2);
        assert_eq!(table.close("600000", d("2024-01-03")), Some(10.8));
        assert_eq!(table.close("000001", d("2024-01-02")), Some(9.2));
    }

    #[test]
    fn loads_normalized_column_names() {
        let (_dir, path) = write_csv("date,stock_id,close\n2024/01/05,BHP,45.1\n");
        let table = CsvPriceAdapter::new(path).load_prices().unwrap();
        assert_eq!(table.close("BHP", d("2024-01-05")), Some(45.1));
    }

    #[test]
    fn accepts_timestamp_dates() {
        let (_dir, path) = write_csv("Stkcd,Trddt,Clsprc\n1,2024-01-02 00:00:00,3.5\n");
        let table = CsvPriceAdapter::new(path).load_prices().unwrap();
        assert_eq!(table.close("1", d("2024-01-02")), Some(3.5));
    }

    #[test]
    fn empty_close_is_skipped() {
        let (_dir, path) = write_csv(
            "Stkcd,Trddt,Clsprc\n\
             1,2024-01-02,\n\
             1,2024-01-03,4.0\n",
        );
        let adapter = CsvPriceAdapter::new(path);
        let (rows, missing) = adapter.read_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(missing, 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let (_dir, path) = write_csv("Stkcd,Trddt,Opnprc\n1,2024-01-02,3.0\n");
        let err = CsvPriceAdapter::new(path).load_prices().unwrap_err();
        assert!(matches!(&err, DispoError::PriceData { reason, .. } if reason.contains("close price column")));
    }

    #[test]
    fn invalid_date_names_line() {
        let (_dir, path) = write_csv(
            "Stkcd,Trddt,Clsprc\n\
             1,2024-01-02,3.0\n\
             1,not-a-date,3.0\n",
        );
        let err = CsvPriceAdapter::new(path).load_prices().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("not-a-date"), "{msg}");
    }

    #[test]
    fn non_positive_close_is_an_error() {
        let (_dir, path) = write_csv("Stkcd,Trddt,Clsprc\n1,2024-01-02,0\n");
        let err = CsvPriceAdapter::new(path).load_prices().unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CsvPriceAdapter::new("/nonexistent/prices.csv")
            .load_prices()
            .unwrap_err();
        assert!(matches!(&err, DispoError::PriceData { path, .. } if path == "/nonexistent/prices.csv"));
    }

    #[test]
    fn header_only_file_gives_empty_table() {
        let (_dir, path) = write_csv("Stkcd,Trddt,Clsprc\n");
        let table = CsvPriceAdapter::new(path).load_prices().unwrap();
        assert!(table.is_empty());
    }
}
