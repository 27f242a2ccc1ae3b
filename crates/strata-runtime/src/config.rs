// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration, stored as RON.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::platform::WindowSettings;

/// Default number of event batches a window mailbox holds.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 8;

/// Settings for one runtime instance.
///
/// Every field has a default, so a config file only needs to list what it changes:
///
/// ```ron
/// (
///     window: (title: "Demo", width: 640, height: 480),
///     mailbox_capacity: 4,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Settings for the initial window.
    pub window: WindowSettings,
    /// Bounded capacity of each window's mailbox, in batches.
    pub mailbox_capacity: usize,
    /// Log filter handed to the logger when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration from RON text.
    ///
    /// ## Arguments
    /// * `text` - The RON source.
    ///
    /// ## Returns
    /// * `Result<Self, ConfigError>` - The validated configuration.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded runtime config from '{}'.", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                log::debug!("No config path given; using defaults.");
                Ok(Self::default())
            }
        }
    }

    /// Serializes the configuration as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "mailbox_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.window.framerate.is_finite() && self.window.framerate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "window.framerate",
                reason: format!("{} is not a positive rate", self.window.framerate),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::platform::WindowFlags;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = RuntimeConfig::from_ron_str(
            r#"(window: (title: "Demo", width: 640, height: 480), mailbox_capacity: 4)"#,
        )
        .expect("valid config");
        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.flags, WindowFlags::SHOWN | WindowFlags::RESIZABLE);
        assert_eq!(config.mailbox_capacity, 4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(
            RuntimeConfig::from_ron_str("()").expect("valid config"),
            RuntimeConfig::default()
        );
    }

    #[test]
    fn pretty_output_parses_back() {
        let mut config = RuntimeConfig::default();
        config.window.x = Some(12);
        config.log_filter = "debug".to_string();
        let text = config.to_ron_string().expect("serializable");
        assert_eq!(RuntimeConfig::from_ron_str(&text).expect("parses"), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RuntimeConfig::from_ron_str("(mailbox_capacity: 0)"),
            Err(ConfigError::Invalid { field: "mailbox_capacity", .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_ron_str("(window: (framerate: -1.0))"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_ron_str("(mailbox_capacity: \"x\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RuntimeConfig::from_file("/nonexistent/strata.ron").expect_err("no such file");
        assert!(err.to_string().contains("/nonexistent/strata.ron"));
    }
}
