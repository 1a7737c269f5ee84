//! CSV trade log writer.

use crate::domain::error::DispoError;
use crate::domain::trade::{TRADE_COLUMNS, TradeRecord};
use crate::ports::trade_sink::TradeSink;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl std::fmt::Display) -> DispoError {
        DispoError::Output {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl TradeSink for CsvTradeAdapter {
    fn write_trades(&self, records: &[TradeRecord]) -> Result<(), DispoError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }

        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| self.error(e))?;
        wtr.write_record(TRADE_COLUMNS).map_err(|e| self.error(e))?;
        for record in records {
            wtr.write_record(record.to_fields())
                .map_err(|e| self.error(e))?;
        }
        wtr.flush().map_err(|e| self.error(e))?;

        info!(path = %self.path.display(), records = records.len(), "trade log written");
        Ok(())
    }
}
