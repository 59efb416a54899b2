//! Core domain types and logic.

pub mod ohlcv;
pub mod normalize;
pub mod indicator;
pub mod engine;
pub mod fetch_config;
pub mod error;
