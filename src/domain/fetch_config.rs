//! Fetch window configuration.
//!
//! The feed never reads the clock or a built-in key: everything it needs is in
//! a [`FetchConfig`] resolved from configuration plus a caller-supplied `today`.

use crate::domain::error::PricelensError;
use crate::ports::config_port::ConfigPort;
use chrono::{Months, NaiveDate};

pub const FEED_SECTION: &str = "feed";
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub symbol: String,
    pub api_key: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

fn one_year_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Builds a [`FetchConfig`] from the `[feed]` section.
///
/// `api_key_override` wins over the configured key. A missing `to_date`
/// resolves to `today`; a missing `from_date` to one year before `to_date`.
pub fn build_fetch_config(
    config: &dyn ConfigPort,
    api_key_override: Option<&str>,
    today: NaiveDate,
) -> Result<FetchConfig, PricelensError> {
    let symbol = config
        .get_non_empty(FEED_SECTION, "symbol")
        .map(|s| s.to_uppercase())
        .ok_or_else(|| missing("symbol"))?;

    let api_key = api_key_override
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| config.get_non_empty(FEED_SECTION, "api_key"))
        .ok_or_else(|| missing("api_key"))?;

    let to_date = optional_date(config, "to_date")?.unwrap_or(today);
    let from_date = optional_date(config, "from_date")?.unwrap_or_else(|| one_year_before(to_date));

    let fetch = FetchConfig {
        symbol,
        api_key,
        from_date,
        to_date,
    };
    validate_fetch_config(&fetch)?;
    Ok(fetch)
}

pub fn validate_fetch_config(fetch: &FetchConfig) -> Result<(), PricelensError> {
    if fetch.symbol.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(invalid("symbol", "symbol must not contain whitespace or '/'"));
    }
    if fetch.from_date >= fetch.to_date {
        return Err(invalid("from_date", "from_date must be before to_date"));
    }
    Ok(())
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, PricelensError> {
    match config.get_non_empty(FEED_SECTION, key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(key, &format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

fn missing(key: &str) -> PricelensError {
    PricelensError::ConfigMissing {
        section: FEED_SECTION.to_string(),
        key: key.to_string(),
    }
}

fn invalid(key: &str, reason: &str) -> PricelensError {
    PricelensError::ConfigInvalid {
        section: FEED_SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn one_year_to(symbol: &str, api_key: &str, to_date: NaiveDate) -> FetchConfig {
        FetchConfig {
            symbol: symbol.to_string(),
            api_key: api_key.to_string(),
            from_date: one_year_before(to_date),
            to_date,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn adapter(ini: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(ini).unwrap()
    }

    #[test]
    fn full_config() {
        let cfg = adapter(
            "[feed]\nsymbol = aapl\napi_key = secret\nfrom_date = 2023-01-01\nto_date = 2023-12-31\n",
        );
        let fetch = build_fetch_config(&cfg, None, today()).unwrap();

        assert_eq!(fetch.symbol, "AAPL");
        assert_eq!(fetch.api_key, "secret");
        assert_eq!(fetch.from_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(fetch.to_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn defaults_to_one_year_ending_today() {
        let cfg = adapter("[feed]\nsymbol = MSFT\napi_key = k\n");
        let fetch = build_fetch_config(&cfg, None, today()).unwrap();

        assert_eq!(fetch, one_year_to("MSFT", "k", today()));
        assert_eq!(fetch.from_date, NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
    }

    #[test]
    fn from_date_defaults_relative_to_configured_to_date() {
        let cfg = adapter("[feed]\nsymbol = MSFT\napi_key = k\nto_date = 2020-03-15\n");
        let fetch = build_fetch_config(&cfg, None, today()).unwrap();
        assert_eq!(fetch.from_date, NaiveDate::from_ymd_opt(2019, 3, 15).unwrap());
    }

    #[test]
    fn leap_day_lookback_clamps() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let fetch = one_year_to("X", "k", leap);
        assert_eq!(fetch.from_date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn override_key_wins() {
        let cfg = adapter("[feed]\nsymbol = MSFT\napi_key = from_file\n");
        let fetch = build_fetch_config(&cfg, Some("from_cli"), today()).unwrap();
        assert_eq!(fetch.api_key, "from_cli");
    }

    #[test]
    fn missing_symbol() {
        let cfg = adapter("[feed]\napi_key = k\n");
        let err = build_fetch_config(&cfg, None, today()).unwrap_err();
        assert!(matches!(err, PricelensError::ConfigMissing { key, .. } if key == "symbol"));
    }

    #[test]
    fn missing_api_key() {
        let cfg = adapter("[feed]\nsymbol = MSFT\n");
        let err = build_fetch_config(&cfg, None, today()).unwrap_err();
        assert!(matches!(err, PricelensError::ConfigMissing { key, .. } if key == "api_key"));
    }

    #[test]
    fn invalid_date_format() {
        let cfg = adapter("[feed]\nsymbol = MSFT\napi_key = k\nfrom_date = 2023/01/01\n");
        let err = build_fetch_config(&cfg, None, today()).unwrap_err();
        assert!(matches!(err, PricelensError::ConfigInvalid { key, .. } if key == "from_date"));
    }

    #[test]
    fn inverted_window() {
        let cfg = adapter(
            "[feed]\nsymbol = MSFT\napi_key = k\nfrom_date = 2024-01-01\nto_date = 2023-01-01\n",
        );
        let err = build_fetch_config(&cfg, None, today()).unwrap_err();
        assert!(matches!(err, PricelensError::ConfigInvalid { key, .. } if key == "from_date"));
    }

    #[test]
    fn symbol_with_slash_is_invalid() {
        let fetch = one_year_to("A/B", "k", today());
        assert!(validate_fetch_config(&fetch).is_err());
    }
}
