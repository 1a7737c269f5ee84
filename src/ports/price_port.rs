//! Price table source port trait.

use crate::domain::error::DispoError;
use crate::domain::price::PriceTable;

pub trait PricePort {
    fn load_prices(&self) -> Result<PriceTable, DispoError>;
}
