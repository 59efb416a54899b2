//! HTTP price feed: daily history from a Financial Modeling Prep style API.
//!
//! `GET {base_url}/historical-price-full/{symbol}?from=..&to=..&apikey=..`
//! returns `{"symbol": "...", "historical": [{date, open, high, low, close, volume, ..}]}`,
//! newest first. One blocking request, no retry.

use crate::domain::error::PricelensError;
use crate::domain::fetch_config::FetchConfig;
use crate::domain::ohlcv::RawRow;
use crate::ports::price_feed::PriceFeed;
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    historical: Vec<RawRow>,
}

pub struct HttpFeedAdapter {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpFeedAdapter {
    pub fn new(base_url: &str) -> Result<Self, PricelensError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(fetch_error)?;
        let base_url = Url::parse(base_url).map_err(|e| PricelensError::Fetch {
            reason: format!("invalid base url {:?}: {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PricelensError::Fetch {
                reason: format!("base url {} cannot hold a path", base_url),
            });
        }
        Ok(Self { client, base_url })
    }

    /// The symbol is pushed as a single encoded path segment.
    fn history_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("historical-price-full")
                .push(symbol);
        }
        url
    }
}

impl PriceFeed for HttpFeedAdapter {
    fn fetch_rows(&self, fetch: &FetchConfig) -> Result<Vec<RawRow>, PricelensError> {
        let url = self.history_url(&fetch.symbol);
        info!(
            symbol = %fetch.symbol,
            from = %fetch.from_date,
            to = %fetch.to_date,
            "fetching daily prices"
        );

        let body = self
            .client
            .get(url)
            .query(&[
                ("from", fetch.from_date.format("%Y-%m-%d").to_string()),
                ("to", fetch.to_date.format("%Y-%m-%d").to_string()),
                ("apikey", fetch.api_key.clone()),
            ])
            .send()
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?
            .text()
            .map_err(fetch_error)?;

        let rows = decode_history(&body, &fetch.symbol)?;
        info!(rows = rows.len(), "received price rows");
        Ok(rows)
    }
}

/// Decodes a history response body. A body without `historical` yields no rows.
pub fn decode_history(body: &str, expected_symbol: &str) -> Result<Vec<RawRow>, PricelensError> {
    let response: HistoryResponse =
        serde_json::from_str(body).map_err(|e| PricelensError::Fetch {
            reason: format!("failed to decode price history: {}", e),
        })?;

    if let Some(symbol) = response.symbol.as_deref() {
        if !symbol.eq_ignore_ascii_case(expected_symbol) {
            warn!(expected = expected_symbol, got = symbol, "feed returned a different symbol");
        }
    }
    Ok(response.historical)
}

fn fetch_error(e: reqwest::Error) -> PricelensError {
    // the request URL carries the api key
    PricelensError::Fetch {
        reason: e.without_url().to_string(),
    }
}
