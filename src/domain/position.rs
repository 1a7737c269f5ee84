//! Position tracking with average-cost accounting.

/// Shares held in one stock and their shares-weighted average buy price.
///
/// A `Position` is only ever stored while `shares > 0`; the portfolio drops
/// it as soon as a sell brings the count to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub shares: u64,
    pub average_cost: f64,
}

impl Position {
    pub fn open(shares: u64, price: f64) -> Self {
        Position {
            shares,
            average_cost: price,
        }
    }

    /// Cost basis of the held shares.
    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.average_cost
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.average_cost)
    }

    /// Strict gain only; break-even counts as a loser.
    pub fn is_winner(&self, price: f64) -> bool {
        self.unrealized_pnl(price) > 0.0
    }

    /// (old_shares * old_cost + shares * price) / (old_shares + shares)
    pub fn add_shares(&mut self, shares: u64, price: f64) {
        let total = self.shares + shares;
        let total_cost = self.cost_basis() + shares as f64 * price;
        self.average_cost = total_cost / total as f64;
        self.shares = total;
    }

    /// Remove up to `shares`; returns the count actually removed.
    pub fn remove_shares(&mut self, shares: u64) -> u64 {
        let removed = shares.min(self.shares);
        self.shares -= removed;
        removed
    }

    pub fn is_closed(&self) -> bool {
        self.shares == 0
    }
}
