//! Disposition trading simulation.
//!
//! Investors are simulated one after another. Each starts with an empty
//! portfolio and walks every date in order, and on each date every stock that
//! has a close price, in first-seen order. For each such unit the buy decision
//! is drawn and applied before the sell decision.

use tracing::debug;

use super::draws::{DrawSource, RngDraws};
use super::error::DispoError;
use super::execution::{LotSizing, TradeContext, execute_buy, execute_sell};
use super::policy::{DispositionPolicy, Holding};
use super::portfolio::Portfolio;
use super::price::PriceTable;
use super::trade::TradeRecord;

pub const DEFAULT_INVESTOR_COUNT: usize = 1000;
pub const DEFAULT_BASE_TRADE_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub investor_count: usize,
    pub base_trade_probability: f64,
    pub seed: Option<u64>,
    pub policy: DispositionPolicy,
    pub sizing: LotSizing,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            investor_count: DEFAULT_INVESTOR_COUNT,
            base_trade_probability: DEFAULT_BASE_TRADE_PROBABILITY,
            seed: None,
            policy: DispositionPolicy::default(),
            sizing: LotSizing::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), DispoError> {
        if self.investor_count < 1 {
            return Err(DispoError::invalid(
                "simulation",
                "investor_count",
                "investor_count must be at least 1",
            ));
        }
        let p = self.base_trade_probability;
        if !(p > 0.0 && p < 1.0) {
            return Err(DispoError::invalid(
                "simulation",
                "base_trade_probability",
                "base_trade_probability must be between 0 and 1 (exclusive)",
            ));
        }
        if self.sizing.min_shares < 1 {
            return Err(DispoError::invalid(
                "simulation",
                "min_trade_shares",
                "min_trade_shares must be at least 1",
            ));
        }
        if self.sizing.min_shares > self.sizing.max_shares {
            return Err(DispoError::invalid(
                "simulation",
                "max_trade_shares",
                "max_trade_shares must not be below min_trade_shares",
            ));
        }
        for (key, value) in self.policy.multipliers() {
            if !value.is_finite() || value < 0.0 {
                return Err(DispoError::invalid(
                    "policy",
                    key,
                    format!("{key} must be a non-negative number"),
                ));
            }
        }
        Ok(())
    }
}

/// Investor IDs are 1-based and zero-padded: `INV_000001`.
pub fn investor_id(n: usize) -> String {
    format!("INV_{n:06}")
}

/// Run the full simulation with draws seeded from `config.seed`.
pub fn run_simulation(
    table: &PriceTable,
    config: &SimulationConfig,
) -> Result<Vec<TradeRecord>, DispoError> {
    let mut draws = RngDraws::seeded(config.seed);
    simulate(table, config, &mut draws)
}

/// Simulate every investor in ascending ID order.
///
/// Fails before drawing anything if the config is invalid or the table is
/// empty.
pub fn simulate<D: DrawSource>(
    table: &PriceTable,
    config: &SimulationConfig,
    draws: &mut D,
) -> Result<Vec<TradeRecord>, DispoError> {
    config.validate()?;
    if table.is_empty() {
        return Err(DispoError::EmptyPriceTable);
    }

    let mut records = Vec::new();
    for n in 1..=config.investor_count {
        let id = investor_id(n);
        let before = records.len();
        let portfolio = simulate_investor(table, &id, config, draws, &mut records);
        debug!(
            investor = %id,
            records = records.len() - before,
            open_positions = portfolio.position_count(),
            "investor simulated"
        );
    }
    Ok(records)
}

/// Append one investor's trades to `out` and return the final portfolio.
pub fn simulate_investor<D: DrawSource>(
    table: &PriceTable,
    investor_id: &str,
    config: &SimulationConfig,
    draws: &mut D,
    out: &mut Vec<TradeRecord>,
) -> Portfolio {
    let mut portfolio = Portfolio::new(table.stock_count());
    for (date, quotes) in table.days() {
        for quote in quotes {
            let ctx = TradeContext {
                investor_id,
                stock_id: table.stock_id(quote.stock),
                stock: quote.stock,
                date,
                price: quote.close,
            };
            evaluate_unit(&mut portfolio, &ctx, config, draws, out);
        }
    }
    portfolio
}

/// One trading unit: buy decision, then sell decision, both against the
/// probabilities set by the holding as it stood before the buy.
pub fn evaluate_unit<D: DrawSource>(
    portfolio: &mut Portfolio,
    ctx: &TradeContext<'_>,
    config: &SimulationConfig,
    draws: &mut D,
    out: &mut Vec<TradeRecord>,
) {
    let holding = Holding::classify(portfolio.get_position(ctx.stock), ctx.price);
    let probs = config
        .policy
        .probabilities(holding, config.base_trade_probability);

    if draws.uniform() < probs.buy {
        out.push(execute_buy(portfolio, ctx, &config.sizing, draws));
    }

    if portfolio.has_position(ctx.stock) && draws.uniform() < probs.sell {
        out.extend(execute_sell(portfolio, ctx, &config.sizing, draws));
    }
}
