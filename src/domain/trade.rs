//! Emitted trade records.

use chrono::NaiveDate;

/// Column names of the persisted trade log, in output order.
pub const TRADE_COLUMNS: [&str; 7] = [
    "stock_code",
    "user_id",
    "p_date",
    "buy_stock_cnt",
    "buy_stock_amt",
    "sell_stock_cnt",
    "sell_stock_amt",
];

/// One side of one trade. Exactly one of the buy or sell pairs is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub stock_id: String,
    pub investor_id: String,
    pub date: NaiveDate,
    pub buy_shares: u64,
    pub buy_amount: f64,
    pub sell_shares: u64,
    pub sell_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl TradeRecord {
    pub fn buy(stock_id: &str, investor_id: &str, date: NaiveDate, shares: u64, price: f64) -> Self {
        TradeRecord {
            stock_id: stock_id.to_string(),
            investor_id: investor_id.to_string(),
            date,
            buy_shares: shares,
            buy_amount: shares as f64 * price,
            sell_shares: 0,
            sell_amount: 0.0,
        }
    }

    pub fn sell(
        stock_id: &str,
        investor_id: &str,
        date: NaiveDate,
        shares: u64,
        price: f64,
    ) -> Self {
        TradeRecord {
            stock_id: stock_id.to_string(),
            investor_id: investor_id.to_string(),
            date,
            buy_shares: 0,
            buy_amount: 0.0,
            sell_shares: shares,
            sell_amount: shares as f64 * price,
        }
    }

    pub fn side(&self) -> Side {
        if self.buy_shares > 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn shares(&self) -> u64 {
        self.buy_shares + self.sell_shares
    }

    pub fn amount(&self) -> f64 {
        self.buy_amount + self.sell_amount
    }

    /// Fields rendered in [`TRADE_COLUMNS`] order. Amounts always carry a
    /// decimal point (`1225.0`, `0.0`) so the amount columns read as floats.
    pub fn to_fields(&self) -> [String; 7] {
        [
            self.stock_id.clone(),
            self.investor_id.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            self.buy_shares.to_string(),
            amount_field(self.buy_amount),
            self.sell_shares.to_string(),
            amount_field(self.sell_amount),
        ]
    }
}

fn amount_field(amount: f64) -> String {
    format!("{amount:?}")
}
