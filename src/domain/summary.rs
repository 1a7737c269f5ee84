//! Run summary over an emitted trade log.

use std::collections::HashSet;

use super::trade::{Side, TradeRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub investors: usize,
    pub active_investors: usize,
    pub stocks_traded: usize,
    pub records: usize,
    pub buys: usize,
    pub sells: usize,
    pub shares_bought: u64,
    pub shares_sold: u64,
    pub buy_amount: f64,
    pub sell_amount: f64,
}

impl SimulationSummary {
    pub fn from_records(records: &[TradeRecord], investors: usize) -> Self {
        let mut active: HashSet<&str> = HashSet::new();
        let mut stocks: HashSet<&str> = HashSet::new();
        let mut summary = SimulationSummary {
            investors,
            active_investors: 0,
            stocks_traded: 0,
            records: records.len(),
            buys: 0,
            sells: 0,
            shares_bought: 0,
            shares_sold: 0,
            buy_amount: 0.0,
            sell_amount: 0.0,
        };

        for rec in records {
            active.insert(&rec.investor_id);
            stocks.insert(&rec.stock_id);
            match rec.side() {
                Side::Buy => {
                    summary.buys += 1;
                    summary.shares_bought += rec.shares();
                    summary.buy_amount += rec.amount();
                }
                Side::Sell => {
                    summary.sells += 1;
                    summary.shares_sold += rec.shares();
                    summary.sell_amount += rec.amount();
                }
            }
        }

        summary.active_investors = active.len();
        summary.stocks_traded = stocks.len();
        summary
    }

    /// Sells per buy; 0 when nothing was bought.
    pub fn sell_buy_ratio(&self) -> f64 {
        if self.buys == 0 {
            0.0
        } else {
            self.sells as f64 / self.buys as f64
        }
    }

    /// Shares still held across all investors at the end of the run.
    pub fn net_shares_held(&self) -> u64 {
        self.shares_bought.saturating_sub(self.shares_sold)
    }
}
