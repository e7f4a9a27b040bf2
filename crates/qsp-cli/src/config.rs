//! Run configuration for the CLI.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML, or JSON by `.json` extension)
//! 2. Environment variables (`QSP_SHOTS`, `QSP_SEED`, `QSP_QUBITS`)
//! 3. Command-line flags
//!
//! Later sources override earlier ones; anything unset falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use qsp_evolve::Potential;

/// Largest register the CLI will simulate.
pub const MAX_CLI_QUBITS: u32 = 16;

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Register size
    #[serde(default = "default_qubits")]
    pub num_qubits: u32,

    /// Number of measurement shots
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Sampling seed; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Distribution and Grover–Rudolph settings
    #[serde(default)]
    pub prep: PrepConfig,

    /// Wave-packet evolution settings
    #[serde(default)]
    pub evolve: EvolveConfig,
}

/// Continuous distribution loaded by Grover–Rudolph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Gaussian mean
    #[serde(default)]
    pub mean: f64,

    /// Gaussian standard deviation
    #[serde(default = "default_std_dev")]
    pub std_dev: f64,

    /// Domain lower bound
    #[serde(default = "default_lo")]
    pub lo: f64,

    /// Domain upper bound
    #[serde(default = "default_hi")]
    pub hi: f64,

    /// Drop identity rotations
    #[serde(default)]
    pub skip_trivial_rotations: bool,

    /// Reject non-log-concave inputs
    #[serde(default)]
    pub strict_log_concave: bool,
}

/// Gaussian wave packet evolved on a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolveConfig {
    /// Grid left end
    #[serde(default = "default_x_min")]
    pub x_min: f64,

    /// Grid right end, excluded
    #[serde(default = "default_x_max")]
    pub x_max: f64,

    /// Packet centre
    #[serde(default = "default_center")]
    pub center: f64,

    /// Packet position spread
    #[serde(default = "default_width")]
    pub width: f64,

    /// Momentum kick `p0`
    #[serde(default)]
    pub momentum: f64,

    /// Particle mass
    #[serde(default = "default_mass")]
    pub mass: f64,

    /// Total evolution time
    #[serde(default = "default_time")]
    pub time: f64,

    /// Number of split-operator steps
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// External potential
    #[serde(default = "default_potential")]
    pub potential: Potential,
}

// Default value functions

fn default_qubits() -> u32 {
    5
}

fn default_shots() -> u32 {
    4096
}

fn default_std_dev() -> f64 {
    1.0
}

fn default_lo() -> f64 {
    -4.0
}

fn default_hi() -> f64 {
    4.0
}

fn default_x_min() -> f64 {
    -8.0
}

fn default_x_max() -> f64 {
    8.0
}

fn default_center() -> f64 {
    -2.0
}

fn default_width() -> f64 {
    1.0
}

fn default_mass() -> f64 {
    1.0
}

fn default_time() -> f64 {
    1.0
}

fn default_steps() -> usize {
    4
}

fn default_potential() -> Potential {
    Potential::Free
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            num_qubits: default_qubits(),
            shots: default_shots(),
            seed: None,
            prep: PrepConfig::default(),
            evolve: EvolveConfig::default(),
        }
    }
}

impl Default for PrepConfig {
    fn default() -> Self {
        PrepConfig {
            mean: 0.0,
            std_dev: default_std_dev(),
            lo: default_lo(),
            hi: default_hi(),
            skip_trivial_rotations: false,
            strict_log_concave: false,
        }
    }
}

impl Default for EvolveConfig {
    fn default() -> Self {
        EvolveConfig {
            x_min: default_x_min(),
            x_max: default_x_max(),
            center: default_center(),
            width: default_width(),
            momentum: 0.0,
            mass: default_mass(),
            time: default_time(),
            steps: default_steps(),
            potential: default_potential(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config: RunConfig = if is_json {
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            serde_yaml_ng::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?
        };
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => RunConfig::default(),
        };
        config.merge_env(|key| std::env::var(key).ok())
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set override the current values; set but
    /// unparsable values are an error.
    pub fn merge_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = var("QSP_QUBITS") {
            self.num_qubits = parse_env("QSP_QUBITS", &v)?;
        }
        if let Some(v) = var("QSP_SHOTS") {
            self.shots = parse_env("QSP_SHOTS", &v)?;
        }
        if let Some(v) = var("QSP_SEED") {
            self.seed = Some(parse_env("QSP_SEED", &v)?);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_qubits == 0 || self.num_qubits > MAX_CLI_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "num_qubits must be in 1..={MAX_CLI_QUBITS}, got {}",
                self.num_qubits
            )));
        }
        if self.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        let prep = &self.prep;
        if !(prep.std_dev.is_finite() && prep.std_dev > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "prep.std_dev must be positive, got {}",
                prep.std_dev
            )));
        }
        if !(prep.lo < prep.hi) {
            return Err(ConfigError::ValidationError(format!(
                "prep domain [{}, {}) is empty",
                prep.lo, prep.hi
            )));
        }

        let evolve = &self.evolve;
        if !(evolve.x_min < evolve.x_max) {
            return Err(ConfigError::ValidationError(format!(
                "evolve grid [{}, {}) is empty",
                evolve.x_min, evolve.x_max
            )));
        }
        if !(evolve.width > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "evolve.width must be positive, got {}",
                evolve.width
            )));
        }
        if !(evolve.mass > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "evolve.mass must be positive, got {}",
                evolve.mass
            )));
        }
        if evolve.steps == 0 {
            return Err(ConfigError::ValidationError(
                "evolve.steps must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}={value} is not a valid value")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
