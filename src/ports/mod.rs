//! Port traits decoupling the domain from I/O.

pub mod config_port;
pub mod price_port;
pub mod trade_sink;
