//! Editor configuration.

use crate::autosave::DEFAULT_DEBOUNCE_MS;
use crate::gesture::{MIN_RESIZE_HEIGHT, MIN_RESIZE_WIDTH, ResizeLimits};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::persistence::{DEFAULT_BACKGROUND_LIMIT, DEFAULT_RICH_CONTENT_LIMIT, SizeLimits};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Tunables for a [`FormEditor`](crate::FormEditor).
///
/// Every key is optional in JSON and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub autosave_debounce_ms: u64,
    pub rich_content_limit: usize,
    pub background_limit: usize,
    pub min_resize_width: f64,
    pub min_resize_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            autosave_debounce_ms: DEFAULT_DEBOUNCE_MS,
            rich_content_limit: DEFAULT_RICH_CONTENT_LIMIT,
            background_limit: DEFAULT_BACKGROUND_LIMIT,
            min_resize_width: MIN_RESIZE_WIDTH,
            min_resize_height: MIN_RESIZE_HEIGHT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "historyCapacity",
                reason: "must be at least 1".to_string(),
            });
        }
        for (key, value) in [
            ("minResizeWidth", self.min_resize_width),
            ("minResizeHeight", self.min_resize_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("{} is not a valid size", value),
                });
            }
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            rich_content: self.rich_content_limit,
            background: self.background_limit,
        }
    }

    pub fn resize_limits(&self) -> ResizeLimits {
        ResizeLimits {
            min_width: self.min_resize_width,
            min_height: self.min_resize_height,
        }
    }
}
