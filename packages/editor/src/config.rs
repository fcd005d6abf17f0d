//! Editor configuration
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```json
//! { "resize": { "min_column_width_pct": 15.0 }, "validator": { "enabled": true } }
//! ```

use crate::errors::EditorResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub resize: ResizeConfig,
    pub history: HistoryConfig,
    pub validator: ValidatorConfig,
}

impl EditorConfig {
    pub fn from_json(source: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Distance from a column boundary, in pixels, that still grabs it
    pub hit_tolerance_px: f64,
    /// Floor for either column of a resized pair, in percent
    pub min_column_width_pct: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: 12.0,
            min_column_width_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo levels (0 = unlimited)
    pub max_levels: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_levels: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Unset: on in debug builds or with the `validate-structure` feature
    pub enabled: Option<bool>,
}

impl ValidatorConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled
            .unwrap_or(cfg!(debug_assertions) || cfg!(feature = "validate-structure"))
    }
}
