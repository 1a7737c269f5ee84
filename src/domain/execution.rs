//! Trade execution: lot sizing, portfolio updates and record emission.

use chrono::NaiveDate;

use super::draws::DrawSource;
use super::portfolio::Portfolio;
use super::price::StockIdx;
use super::trade::TradeRecord;

pub const DEFAULT_MIN_TRADE_SHARES: u64 = 100;
pub const DEFAULT_MAX_TRADE_SHARES: u64 = 10_000;

/// Inclusive bounds on the number of shares in a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotSizing {
    pub min_shares: u64,
    pub max_shares: u64,
}

impl Default for LotSizing {
    fn default() -> Self {
        LotSizing {
            min_shares: DEFAULT_MIN_TRADE_SHARES,
            max_shares: DEFAULT_MAX_TRADE_SHARES,
        }
    }
}

impl LotSizing {
    pub fn buy_range(&self) -> (u64, u64) {
        (self.min_shares, self.max_shares)
    }

    /// Sell range for a holding of `held` shares: `[min, min(held, max)]`.
    ///
    /// When `held < min` the range collapses to `[held, held]` and the whole
    /// remaining position is sold.
    pub fn sell_range(&self, held: u64) -> (u64, u64) {
        let high = held.min(self.max_shares);
        (self.min_shares.min(high), high)
    }
}

/// Where a unit of work is happening: who, what and when.
#[derive(Debug, Clone, Copy)]
pub struct TradeContext<'a> {
    pub investor_id: &'a str,
    pub stock_id: &'a str,
    pub stock: StockIdx,
    pub date: NaiveDate,
    pub price: f64,
}

/// Sample a buy size, add it to the portfolio and build the buy record.
pub fn execute_buy(
    portfolio: &mut Portfolio,
    ctx: &TradeContext<'_>,
    sizing: &LotSizing,
    draws: &mut impl DrawSource,
) -> TradeRecord {
    let (low, high) = sizing.buy_range();
    let shares = draws.shares(low, high);
    portfolio.buy(ctx.stock, shares, ctx.price);
    TradeRecord::buy(ctx.stock_id, ctx.investor_id, ctx.date, shares, ctx.price)
}

/// Sample a sell size bounded by the holding, reduce the position and build
/// the sell record. Returns `None` when nothing is held.
pub fn execute_sell(
    portfolio: &mut Portfolio,
    ctx: &TradeContext<'_>,
    sizing: &LotSizing,
    draws: &mut impl DrawSource,
) -> Option<TradeRecord> {
    let held = portfolio.get_position(ctx.stock)?.shares;
    let (low, high) = sizing.sell_range(held);
    let shares = draws.shares(low, high);
    let sold = portfolio.sell(ctx.stock, shares);
    Some(TradeRecord::sell(
        ctx.stock_id,
        ctx.investor_id,
        ctx.date,
        sold,
        ctx.price,
    ))
}
