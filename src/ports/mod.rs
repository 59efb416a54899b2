//! Port traits: the seams between the indicator core and its collaborators.

pub mod chart_port;
pub mod config_port;
pub mod price_feed;
pub mod table_writer;
