//! Raw daily price file combiner.
//!
//! Market data vendors ship daily returns as a series of tab-separated
//! `TRD_Dalyr*.txt` files, one per period, each with its own header line and
//! a companion `[DES]` description file. This adapter concatenates them into
//! one comma-separated table with a single header row, which is the input
//! format [`CsvPriceAdapter`](super::csv_price_adapter::CsvPriceAdapter) reads.

use crate::domain::error::DispoError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const RAW_FILE_PREFIX: &str = "TRD_Dalyr";
pub const RAW_FILE_EXTENSION: &str = "txt";
const DESCRIPTION_MARKER: &str = "[DES]";

pub const RAW_COLUMNS: [&str; 24] = [
    "Stkcd",
    "Trddt",
    "Trdsta",
    "Opnprc",
    "Hiprc",
    "Loprc",
    "Clsprc",
    "Dnshrtrd",
    "Dnvaltrd",
    "Dsmvosd",
    "Dsmvtll",
    "Dretwd",
    "Dretnd",
    "Adjprcwd",
    "Adjprcnd",
    "Markettype",
    "Capchgdt",
    "Ahshrtrd_D",
    "Ahvaltrd_D",
    "PreClosePrice",
    "ChangeRatio",
    "LimitDown",
    "LimitUp",
    "LimitStatus",
];

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub file: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineReport {
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
    pub total_rows: usize,
}

pub struct RawPriceCombiner {
    dir: PathBuf,
}

impl RawPriceCombiner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Raw data files in the directory, sorted by file name. Description
    /// files are excluded.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, DispoError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| DispoError::PriceData {
            path: self.dir.display().to_string(),
            reason: format!("failed to read directory: {e}"),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if is_raw_data_file(&name) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Combine every raw file into `output`. A file that fails to parse is
    /// reported and left out. Every file is parsed before `output` is opened,
    /// so when none is usable the error leaves an existing output untouched.
    pub fn combine(&self, output: &Path) -> Result<CombineReport, DispoError> {
        let files = self.list_files()?;
        if files.is_empty() {
            return Err(DispoError::NoPriceFiles {
                dir: self.dir.display().to_string(),
            });
        }
        info!(dir = %self.dir.display(), files = files.len(), "combining raw price files");

        let mut report = CombineReport::default();
        let mut parsed = Vec::with_capacity(files.len());
        for file in files {
            match read_raw_file(&file) {
                Ok(records) => {
                    info!(file = %file.display(), rows = records.len(), "read raw price file");
                    report.total_rows += records.len();
                    report.files.push(FileReport {
                        file,
                        rows: records.len(),
                    });
                    parsed.push(records);
                }
                Err(reason) => {
                    warn!(file = %file.display(), %reason, "skipping raw price file");
                    report.skipped.push(SkippedFile { file, reason });
                }
            }
        }
        if report.files.is_empty() {
            return Err(DispoError::NoPriceFiles {
                dir: self.dir.display().to_string(),
            });
        }

        let out_err = |e: &dyn std::fmt::Display| DispoError::Output {
            path: output.display().to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::Writer::from_path(output).map_err(|e| out_err(&e))?;
        wtr.write_record(RAW_COLUMNS).map_err(|e| out_err(&e))?;
        for record in parsed.iter().flatten() {
            wtr.write_record(record).map_err(|e| out_err(&e))?;
        }
        wtr.flush()?;

        info!(
            output = %output.display(),
            rows = report.total_rows,
            skipped = report.skipped.len(),
            "combined price data written"
        );
        Ok(report)
    }
}

pub fn is_raw_data_file(name: &str) -> bool {
    name.starts_with(RAW_FILE_PREFIX)
        && !name.contains(DESCRIPTION_MARKER)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RAW_FILE_EXTENSION))
}

/// Parse one raw file fully before anything is written, so a bad file never
/// leaves partial rows in the combined output. Short rows are padded to the
/// full column count.
fn read_raw_file(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open: {e}"))?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| format!("parse error: {e}"))?;
        if record.len() > RAW_COLUMNS.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(format!(
                "line {line}: {} fields, expected at most {}",
                record.len(),
                RAW_COLUMNS.len()
            ));
        }
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let mut row: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
        row.resize(RAW_COLUMNS.len(), String::new());
        rows.push(row);
    }
    Ok(rows)
}
