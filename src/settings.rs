//! Runtime settings.
//!
//! Settings are read from an optional TOML file and then overridden by
//! environment variables prefixed with `MARKOVIAN`, using `__` to reach into
//! sections (e.g. `MARKOVIAN_ENGINE__STEP_LIMIT=500`). Every value has a
//! default, so running without any configuration is fine.
//!
//! ```toml
//! log_level = "info"
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! request_timeout_ms = 10000
//!
//! [engine]
//! step_limit = 10000
//! length_limit = 65536
//!
//! [sampling]
//! scales = [2, 4, 8, 16, 32, 64, 128]
//! max_scales = 12
//! step_limit = 10000
//! length_limit = 65536
//! tolerance = 0.2
//! ```

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::engine::{DEFAULT_STEP_LIMIT, Limits};
use crate::error::{MarkovianError, Result};
use crate::growth::DEFAULT_TOLERANCE;
use crate::scale;

pub const DEFAULT_CONFIG_FILE: &str = "markovian.toml";
pub const ENV_PREFIX: &str = "MARKOVIAN";
/// Word-length ceiling (in chars) for runs and per-scale sampling guards.
pub const DEFAULT_LENGTH_LIMIT: usize = 1 << 16;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub sampling: SamplingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub request_timeout_ms: u64,
}

/// Limits for a single `/api/run` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub step_limit: usize,
    pub length_limit: Option<usize>,
}

/// Per-scale guards and budgets for the complexity samplers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    pub scales: Vec<usize>,
    /// Scales past this many are dropped.
    pub max_scales: usize,
    pub step_limit: usize,
    pub length_limit: usize,
    pub tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            server: ServerSettings::default(),
            engine: EngineSettings::default(),
            sampling: SamplingSettings::default(),
        }
    }
}
impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1:5000".into(), request_timeout_ms: 10_000 }
    }
}
impl Default for EngineSettings {
    fn default() -> Self {
        Self { step_limit: DEFAULT_STEP_LIMIT, length_limit: Some(DEFAULT_LENGTH_LIMIT) }
    }
}
impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            scales: vec![2, 4, 8, 16, 32, 64, 128],
            max_scales: 12,
            step_limit: DEFAULT_STEP_LIMIT,
            length_limit: DEFAULT_LENGTH_LIMIT,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl EngineSettings {
    pub fn limits(&self) -> Limits {
        Limits { step_limit: self.step_limit, length_limit: self.length_limit }
    }
}

impl SamplingSettings {
    /// The guard every per-scale run is held to.
    pub fn guard(&self) -> Limits {
        Limits { step_limit: self.step_limit, length_limit: Some(self.length_limit) }
    }
}

impl Settings {
    /// Loads settings from `path` (or `markovian.toml` when present) and the
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sampling.step_limit == 0 {
            return Err(MarkovianError::Config("sampling.step_limit must be positive".into()));
        }
        if self.sampling.max_scales == 0 {
            return Err(MarkovianError::Config("sampling.max_scales must be positive".into()));
        }
        if self.sampling.tolerance.is_nan() || self.sampling.tolerance <= 0.0 {
            return Err(MarkovianError::Config("sampling.tolerance must be positive".into()));
        }
        scale::validate(&self.sampling.scales)
            .map_err(|e| MarkovianError::Config(format!("sampling.scales: {e}")))
    }
}
