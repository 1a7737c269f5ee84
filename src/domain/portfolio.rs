//! Per-investor portfolio state.
//!
//! Positions live in a slot per stock index. A slot holds `Some` only while
//! the position has shares; `sell` clears it the moment the count hits zero.

use super::position::Position;
use super::price::StockIdx;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    slots: Vec<Option<Position>>,
    open: usize,
}

impl Portfolio {
    pub fn new(stock_count: usize) -> Self {
        Portfolio {
            slots: vec![None; stock_count],
            open: 0,
        }
    }

    pub fn get_position(&self, stock: StockIdx) -> Option<&Position> {
        self.slots.get(stock.0).and_then(Option::as_ref)
    }

    pub fn has_position(&self, stock: StockIdx) -> bool {
        self.get_position(stock).is_some()
    }

    pub fn position_count(&self) -> usize {
        self.open
    }

    /// Add `shares` bought at `price`, opening a fresh position when none is
    /// held. Returns the position after the buy.
    pub fn buy(&mut self, stock: StockIdx, shares: u64, price: f64) -> Position {
        if stock.0 >= self.slots.len() {
            self.slots.resize(stock.0 + 1, None);
        }
        let slot = &mut self.slots[stock.0];
        match slot.as_mut() {
            Some(pos) => {
                pos.add_shares(shares, price);
                *pos
            }
            None => {
                let pos = Position::open(shares, price);
                *slot = Some(pos);
                self.open += 1;
                pos
            }
        }
    }

    /// Remove up to `shares`; returns the count removed. The position is
    /// dropped when nothing remains.
    pub fn sell(&mut self, stock: StockIdx, shares: u64) -> u64 {
        let Some(slot) = self.slots.get_mut(stock.0) else {
            return 0;
        };
        let Some(pos) = slot.as_mut() else {
            return 0;
        };
        let removed = pos.remove_shares(shares);
        if pos.is_closed() {
            *slot = None;
            self.open -= 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_portfolio_is_empty() {
        let portfolio = Portfolio::new(3);
        assert_eq!(portfolio.position_count(), 0);
        assert!(!portfolio.has_position(StockIdx(0)));
    }

    #[test]
    fn buy_opens_then_averages() {
        let mut portfolio = Portfolio::new(2);
        portfolio.buy(StockIdx(1), 100, 10.0);
        let pos = portfolio.buy(StockIdx(1), 200, 13.0);
        assert_eq!(pos.shares, 300);
        assert_relative_eq!(pos.average_cost, 12.0);
        assert_eq!(portfolio.position_count(), 1);
    }

    #[test]
    fn partial_sell_keeps_position() {
        let mut portfolio = Portfolio::new(1);
        portfolio.buy(StockIdx(0), 500, 10.0);
        assert_eq!(portfolio.sell(StockIdx(0), 200), 200);
        let pos = portfolio.get_position(StockIdx(0)).unwrap();
        assert_eq!(pos.shares, 300);
        assert_relative_eq!(pos.average_cost, 10.0);
    }

    #[test]
    fn full_sell_removes_entry_and_resets_cost() {
        let mut portfolio = Portfolio::new(1);
        portfolio.buy(StockIdx(0), 500, 10.0);
        assert_eq!(portfolio.sell(StockIdx(0), 500), 500);
        assert!(!portfolio.has_position(StockIdx(0)));
        assert_eq!(portfolio.position_count(), 0);

        let pos = portfolio.buy(StockIdx(0), 100, 7.0);
        assert_eq!(pos.shares, 100);
        assert_relative_eq!(pos.average_cost, 7.0);
    }

    #[test]
    fn sell_without_position_is_noop() {
        let mut portfolio = Portfolio::new(1);
        assert_eq!(portfolio.sell(StockIdx(0), 100), 0);
        assert_eq!(portfolio.sell(StockIdx(9), 100), 0);
        assert_eq!(portfolio.position_count(), 0);
    }

    #[test]
    fn buy_grows_slots_for_unknown_index() {
        let mut portfolio = Portfolio::new(0);
        portfolio.buy(StockIdx(4), 100, 1.0);
        assert!(portfolio.has_position(StockIdx(4)));
        assert!(!portfolio.has_position(StockIdx(3)));
        assert_eq!(portfolio.position_count(), 1);
    }
}
