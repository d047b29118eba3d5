//! Retrospective backtester for simple single-instrument strategies.
//!
//! Hexagonal architecture: simulation logic in [`domain`], port traits in [`ports`],
//! file-backed implementations in [`adapters`], operator surface in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
