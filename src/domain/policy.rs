//! Disposition-adjusted buy/sell probabilities.
//!
//! A held stock trading above its average cost is a winner: selling becomes
//! more likely and adding to it less likely. At or below cost it is a loser:
//! the investor holds on and averages down instead.

use super::position::Position;

/// How the current price relates to the investor's holding in a stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holding {
    Flat,
    Winner,
    Loser,
}

impl Holding {
    pub fn classify(position: Option<&Position>, price: f64) -> Self {
        match position {
            None => Holding::Flat,
            Some(pos) if pos.is_winner(price) => Holding::Winner,
            Some(_) => Holding::Loser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeProbabilities {
    pub buy: f64,
    pub sell: f64,
}

/// Multipliers applied to the base trade probability.
#[derive(Debug, Clone, PartialEq)]
pub struct DispositionPolicy {
    pub sell_premium_winner: f64,
    pub buy_discount_winner: f64,
    pub sell_discount_loser: f64,
    pub buy_premium_loser: f64,
}

impl Default for DispositionPolicy {
    fn default() -> Self {
        DispositionPolicy {
            sell_premium_winner: 2.0,
            buy_discount_winner: 0.5,
            sell_discount_loser: 0.5,
            buy_premium_loser: 2.0,
        }
    }
}

impl DispositionPolicy {
    /// A policy with every multiplier at 1.0: no disposition effect.
    pub fn neutral() -> Self {
        DispositionPolicy {
            sell_premium_winner: 1.0,
            buy_discount_winner: 1.0,
            sell_discount_loser: 1.0,
            buy_premium_loser: 1.0,
        }
    }

    pub fn probabilities(&self, holding: Holding, base: f64) -> TradeProbabilities {
        match holding {
            Holding::Flat => TradeProbabilities {
                buy: base,
                sell: 0.0,
            },
            Holding::Winner => TradeProbabilities {
                buy: base * self.buy_discount_winner,
                sell: base * self.sell_premium_winner,
            },
            Holding::Loser => TradeProbabilities {
                buy: base * self.buy_premium_loser,
                sell: base * self.sell_discount_loser,
            },
        }
    }

    /// Multipliers with their config key names, in config file order.
    pub fn multipliers(&self) -> [(&'static str, f64); 4] {
        [
            ("sell_premium_winner", self.sell_premium_winner),
            ("buy_discount_winner", self.buy_discount_winner),
            ("sell_discount_loser", self.sell_discount_loser),
            ("buy_premium_loser", self.buy_premium_loser),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_buys_at_base_and_never_sells() {
        let probs = DispositionPolicy::default().probabilities(Holding::Flat, 0.1);
        assert_relative_eq!(probs.buy, 0.1);
        assert_eq!(probs.sell, 0.0);
    }

    #[test]
    fn winner_sells_more_buys_less() {
        let pos = Position::open(500, 10.0);
        let holding = Holding::classify(Some(&pos), 15.0);
        assert_eq!(holding, Holding::Winner);

        let probs = DispositionPolicy::default().probabilities(holding, 0.1);
        assert_relative_eq!(probs.sell, 0.2);
        assert_relative_eq!(probs.buy, 0.05);
    }

    #[test]
    fn loser_holds_and_averages_down() {
        let pos = Position::open(500, 10.0);
        let holding = Holding::classify(Some(&pos), 5.0);
        assert_eq!(holding, Holding::Loser);

        let probs = DispositionPolicy::default().probabilities(holding, 0.1);
        assert_relative_eq!(probs.sell, 0.05);
        assert_relative_eq!(probs.buy, 0.2);
    }

    #[test]
    fn break_even_is_a_loser() {
        let pos = Position::open(500, 10.0);
        assert_eq!(Holding::classify(Some(&pos), 10.0), Holding::Loser);
    }

    #[test]
    fn no_position_is_flat() {
        assert_eq!(Holding::classify(None, 10.0), Holding::Flat);
    }

    #[test]
    fn neutral_policy_matches_base() {
        let policy = DispositionPolicy::neutral();
        for holding in [Holding::Winner, Holding::Loser] {
            let probs = policy.probabilities(holding, 0.3);
            assert_relative_eq!(probs.buy, 0.3);
            assert_relative_eq!(probs.sell, 0.3);
        }
    }

    #[test]
    fn custom_multipliers_apply() {
        let policy = DispositionPolicy {
            sell_premium_winner: 3.0,
            buy_discount_winner: 0.0,
            sell_discount_loser: 0.25,
            buy_premium_loser: 1.5,
        };
        let win = policy.probabilities(Holding::Winner, 0.1);
        assert_relative_eq!(win.sell, 0.3, epsilon = 1e-12);
        assert_eq!(win.buy, 0.0);

        let lose = policy.probabilities(Holding::Loser, 0.1);
        assert_relative_eq!(lose.sell, 0.025);
        assert_relative_eq!(lose.buy, 0.15, epsilon = 1e-12);
    }
}
