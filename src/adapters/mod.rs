//! Concrete adapter implementations for ports.

#[cfg(feature = "http")]
pub mod http_feed_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod svg_chart_adapter;
