//! Runtime configuration.
//!
//! Every section is optional in TOML; missing values take their defaults.
//! Unknown keys are rejected rather than silently ignored.

use crate::{
    codec::reseed_sampling,
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::set_metrics_enabled,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Default upper bound on a composite key, in bytes.
pub const DEFAULT_MAX_KEY_BYTES: usize = 32_767;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::ConstraintViolation, ErrorOrigin::Config, err.to_string())
    }
}

///
/// CoreConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub key: KeyConfig,
    pub metrics: MetricsConfig,
    pub sampling: SamplingConfig,
}

impl CoreConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.max_key_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "key.max_key_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Apply the process-wide settings: metrics switch and sampling seed.
    pub fn install(&self) -> Result<(), InternalError> {
        self.validate()?;
        set_metrics_enabled(self.metrics.enabled);
        reseed_sampling(self.sampling.seed);

        Ok(())
    }
}

///
/// KeyConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyConfig {
    pub max_key_bytes: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
        }
    }
}

///
/// MetricsConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

///
/// SamplingConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub seed: u64,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_defaults() {
        let config = CoreConfig::from_toml_str("").expect("empty config parses");

        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.key.max_key_bytes, DEFAULT_MAX_KEY_BYTES);
        assert!(config.metrics.enabled);
        assert_eq!(config.sampling.seed, 0);
    }

    #[test]
    fn sections_override_defaults() {
        let config = CoreConfig::from_toml_str(
            "[key]\nmax_key_bytes = 64\n\n[metrics]\nenabled = false\n\n[sampling]\nseed = 7\n",
        )
        .expect("config parses");

        assert_eq!(config.key.max_key_bytes, 64);
        assert!(!config.metrics.enabled);
        assert_eq!(config.sampling.seed, 7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CoreConfig::from_toml_str("[key]\nmax_bytes = 10\n").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = CoreConfig::from_toml_str("[logging]\nlevel = \"debug\"\n").expect_err("unknown section");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_key_budget_is_invalid() {
        let err = CoreConfig::from_toml_str("[key]\nmax_key_bytes = 0\n").expect_err("zero budget");
        assert!(matches!(err, ConfigError::Invalid { field: "key.max_key_bytes", .. }));

        let internal = InternalError::from(err);
        assert_eq!(internal.class, ErrorClass::ConstraintViolation);
        assert_eq!(internal.origin, ErrorOrigin::Config);
    }
}
