#![allow(dead_code)]

use chrono::NaiveDate;
use dispotrader::domain::draws::DrawSource;
use dispotrader::domain::error::DispoError;
use dispotrader::domain::price::{PriceRow, PriceTable};
use dispotrader::domain::simulation::SimulationConfig;
use dispotrader::domain::trade::TradeRecord;
use dispotrader::ports::price_port::PricePort;
use dispotrader::ports::trade_sink::TradeSink;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;

/// Replays scripted draws. Uniform values fall back to `0.999` (no trade)
/// once the script runs out; share draws are clamped into the requested range.
#[derive(Default)]
pub struct ScriptedDraws {
    pub uniforms: VecDeque<f64>,
    pub shares: VecDeque<u64>,
    pub uniform_calls: usize,
    pub share_calls: Vec<(u64, u64)>,
}

impl ScriptedDraws {
    pub fn new(uniforms: &[f64], shares: &[u64]) -> Self {
        Self {
            uniforms: uniforms.iter().copied().collect(),
            shares: shares.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl DrawSource for ScriptedDraws {
    fn uniform(&mut self) -> f64 {
        self.uniform_calls += 1;
        self.uniforms.pop_front().unwrap_or(0.999)
    }

    fn shares(&mut self, low: u64, high: u64) -> u64 {
        self.share_calls.push((low, high));
        self.shares.pop_front().unwrap_or(low).clamp(low, high)
    }
}

/// Every uniform draw is zero, so every decision with positive probability fires.
pub struct AlwaysTrade;

impl DrawSource for AlwaysTrade {
    fn uniform(&mut self) -> f64 {
        0.0
    }

    fn shares(&mut self, low: u64, _high: u64) -> u64 {
        low
    }
}

pub struct MockPricePort {
    pub rows: Vec<PriceRow>,
    pub error: Option<String>,
}

impl MockPricePort {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl PricePort for MockPricePort {
    fn load_prices(&self) -> Result<PriceTable, DispoError> {
        if let Some(reason) = &self.error {
            return Err(DispoError::PriceData {
                path: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(PriceTable::from_rows(self.rows.clone()))
    }
}

/// Keeps every batch it is asked to write.
#[derive(Default)]
pub struct RecordingSink {
    pub written: RefCell<Vec<Vec<TradeRecord>>>,
}

impl TradeSink for RecordingSink {
    fn write_trades(&self, records: &[TradeRecord]) -> Result<(), DispoError> {
        self.written.borrow_mut().push(records.to_vec());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn row(stock: &str, d: NaiveDate, close: f64) -> PriceRow {
    PriceRow::new(stock, d, close)
}

/// `stocks` x `days` table starting 2024-01-01; closes follow a per-stock
/// zig-zag so positions flip between winner and loser.
pub fn generate_rows(stocks: &[&str], days: u32, start_price: f64) -> Vec<PriceRow> {
    let mut rows = Vec::new();
    for day in 0..days {
        let d = date(2024, 1, 1) + chrono::Duration::days(i64::from(day));
        for (i, stock) in stocks.iter().enumerate() {
            let swing = if (day as usize + i) % 2 == 0 { 1.0 } else { -1.0 };
            let close = start_price + i as f64 + swing * (1.0 + f64::from(day % 3));
            rows.push(row(stock, d, close));
        }
    }
    rows
}

pub fn sample_table() -> PriceTable {
    PriceTable::from_rows(generate_rows(&["600000", "000001", "300750"], 20, 10.0))
}

pub fn sample_config(investors: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        investor_count: investors,
        base_trade_probability: 0.3,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Combined-format price CSV for `rows`.
pub fn price_csv(rows: &[PriceRow]) -> String {
    let mut out = String::from("Stkcd,Trddt,Clsprc\n");
    for r in rows {
        out.push_str(&format!(
            "{},{},{}\n",
            r.stock_id,
            r.date.format("%Y-%m-%d"),
            r.close
        ));
    }
    out
}
