//! Random draws consumed by the simulator.
//!
//! Every decision takes exactly one `uniform` draw and every executed trade
//! one `shares` draw, in investor -> date -> stock order. Swapping the source
//! changes nothing else about a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

pub trait DrawSource {
    /// Uniform value in [0, 1).
    fn uniform(&mut self) -> f64;

    /// Uniform integer in `low..=high`. Callers guarantee `low <= high`.
    fn shares(&mut self, low: u64, high: u64) -> u64;
}

/// Draws backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDraws<R> {
    rng: R,
}

impl<R: Rng> RngDraws<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDraws<Pcg64> {
    /// PCG64 seeded from `seed`, or from OS entropy when `None`.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Pcg64::seed_from_u64(s),
            None => Pcg64::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> DrawSource for RngDraws<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn shares(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..=high)
    }
}
