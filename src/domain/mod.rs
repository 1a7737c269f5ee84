//! Core domain types and logic.

pub mod price;
pub mod position;
pub mod portfolio;
pub mod policy;
pub mod draws;
pub mod trade;
pub mod execution;
pub mod simulation;
pub mod summary;
pub mod config_validation;
pub mod error;
