//! INI file configuration adapter.
//!
//! ```ini
//! [feed]
//! symbol = AAPL
//! api_key = ...
//! from_date = 2023-01-01
//! to_date = 2023-12-31
//!
//! [output]
//! csv_path = aapl.csv
//! chart_path = aapl.svg
//! ```

use crate::domain::error::PricelensError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PricelensError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| PricelensError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, PricelensError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| PricelensError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}
