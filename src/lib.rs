//! Quant core for a football betting advisory pipeline: signal fusion into
//! goal expectancies, a Poisson scoreline model, edge detection against
//! market prices, and fractional-Kelly stake sizing.
//!
//! Everything here is pure and synchronous. Fetching odds, chat delivery and
//! persistence live in the surrounding orchestrator, not in this crate.

pub mod engine;
pub mod market;
pub mod quant_config;
pub mod scoreline;
pub mod signals;
