use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fretwise_core::{Instrument, DEFAULT_WRAP_WIDTH};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "fretwise.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Semitones applied to the lowest string
    #[serde(default)]
    pub tuning_offset: i32,
    #[serde(default)]
    pub capo: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_wrap_width")]
    pub wrap_width: usize,
}

impl RenderConfig {
    fn default_wrap_width() -> usize {
        DEFAULT_WRAP_WIDTH
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap_width: Self::default_wrap_width(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretwiseConfig {
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl FretwiseConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let cfg = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// An explicit path must exist; otherwise `fretwise.toml` is used when
    /// present and defaults when not
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line values on top of the file
    pub fn with_overrides(
        mut self,
        tuning: Option<i32>,
        capo: Option<i32>,
        width: Option<usize>,
    ) -> Self {
        if let Some(tuning) = tuning {
            self.instrument.tuning_offset = tuning;
        }
        if let Some(capo) = capo {
            self.instrument.capo = capo;
        }
        if let Some(width) = width {
            self.render.wrap_width = width;
        }
        self
    }

    pub fn instrument(&self) -> Instrument {
        Instrument::new(self.instrument.tuning_offset, self.instrument.capo)
    }
}
