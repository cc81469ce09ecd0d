//! Configuration for the grid processor.

use serde::{Deserialize, Serialize};

/// Configuration for windowed grid loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridProcessorConfig {
    /// Half-width in degrees of the window loaded around a query.
    pub margin_deg: f64,
}

impl Default for GridProcessorConfig {
    fn default() -> Self {
        Self { margin_deg: 2.0 }
    }
}

impl GridProcessorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("METADATA_MARGIN_DEG") {
            if let Ok(margin) = val.parse() {
                config.margin_deg = margin;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.margin_deg.is_finite() || self.margin_deg <= 0.0 {
            return Err("margin_deg must be a positive number".to_string());
        }

        if self.margin_deg > 90.0 {
            return Err("margin_deg must be <= 90".to_string());
        }

        Ok(())
    }
}
