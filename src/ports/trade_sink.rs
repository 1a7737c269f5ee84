//! Trade log output port trait.

use crate::domain::error::DispoError;
use crate::domain::trade::TradeRecord;

/// Destination for the generated trade log. Records arrive in generation
/// order and must be persisted in that order.
pub trait TradeSink {
    fn write_trades(&self, records: &[TradeRecord]) -> Result<(), DispoError>;
}
