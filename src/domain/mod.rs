//! Core domain types and logic.

pub mod price;
pub mod rates;
pub mod indicator;
pub mod strategy;
pub mod xirr;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
