//! Configuration Module
//!
//! This module defines all configuration structures for the pre-flight validator.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::ValidationRequest;
use anyhow::{bail, Context};
use ethers::types::{Address, I256};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fs;
use std::str::FromStr;

/// Main configuration structure
///
/// Contains all configuration sections for the validator.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [rpc]
/// url = "http://127.0.0.1:8545"
///
/// [preflight]
/// rate_limit_ms = 100
/// minipools = ["0x1111111111111111111111111111111111111111"]
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub preflight: PreflightConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Execution layer connection configuration
///
/// # Fields
/// - `url`: Ethereum JSON-RPC endpoint (e.g., "http://127.0.0.1:8545")
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
}

/// What to validate
///
/// # Fields
/// - `node_address`: Node operator address; omit to discover it from the minipools
/// - `tip_override_wei`: Priority-fee tip override in wei; omit for the default tip.
///   Either a TOML integer or a decimal string, so values beyond `i64` still
///   reach the validator's bounds check (e.g. `"5000000000000000000"`)
/// - `rate_limit_ms`: Delay after every successful RPC read (0 disables)
/// - `minipools`: Minipool addresses, checked in order, no duplicates
#[derive(Debug, Clone, Deserialize)]
pub struct PreflightConfig {
    #[serde(default)]
    pub node_address: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_wei")]
    pub tip_override_wei: Option<I256>,
    #[serde(default)]
    pub rate_limit_ms: u64,
    pub minipools: Vec<Address>,
}

/// Raw wei amount as written in TOML
#[derive(Deserialize)]
#[serde(untagged)]
enum WeiAmount {
    Integer(i64),
    Decimal(String),
}

fn deserialize_wei<'de, D>(deserializer: D) -> Result<Option<I256>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<WeiAmount>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw {
        WeiAmount::Integer(value) => Ok(Some(I256::from(value))),
        WeiAmount::Decimal(text) => I256::from_dec_str(text.trim())
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid wei amount {text:?}: {e}"))),
    }
}

/// Logging configuration
///
/// `level` is one of "trace", "debug", "info", "warn", "error".
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded, parsed and checked
    /// * `Err` if the file couldn't be read, the TOML is invalid, or a value is rejected
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        Self::parse(&content).with_context(|| format!("loading {path}"))
    }

    /// Parse and check configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for minipool in &self.preflight.minipools {
            if !seen.insert(minipool) {
                bail!("minipool {:?} is listed more than once", minipool);
            }
        }
        self.log_level()?;
        Ok(())
    }

    /// Parsed log level
    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        tracing::Level::from_str(&self.logging.level)
            .with_context(|| format!("invalid log level {:?}", self.logging.level))
    }

    /// Build the validation request described by the `[preflight]` section
    pub fn request(&self) -> ValidationRequest {
        ValidationRequest {
            node_address: self.preflight.node_address,
            tip_override: self.preflight.tip_override_wei,
            minipools: self.preflight.minipools.clone(),
            rate_limit_ms: self.preflight.rate_limit_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [rpc]
        url = "http://127.0.0.1:8545"

        [preflight]
        node_address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        tip_override_wei = 1000000000
        rate_limit_ms = 250
        minipools = [
            "0x1111111111111111111111111111111111111111",
            "0x2222222222222222222222222222222222222222",
        ]

        [logging]
        level = "debug"
    "#;

    #[test]
    fn test_full_config_builds_request() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.rpc.url, "http://127.0.0.1:8545");
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);

        let request = config.request();
        assert_eq!(request.node_address, Some(Address::repeat_byte(0xaa)));
        assert_eq!(request.tip_override, Some(I256::from(1_000_000_000i64)));
        assert_eq!(request.rate_limit_ms, 250);
        assert_eq!(
            request.minipools,
            vec![Address::repeat_byte(0x11), Address::repeat_byte(0x22)]
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let config = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            minipools = []
            "#,
        )
        .unwrap();

        let request = config.request();
        assert_eq!(request.node_address, None);
        assert_eq!(request.tip_override, None);
        assert_eq!(request.rate_limit_ms, 0);
        assert!(request.minipools.is_empty());
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_negative_tip_is_loaded_as_is() {
        // bounds are enforced by the validator, not the loader
        let config = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            tip_override_wei = -5
            minipools = []
            "#,
        )
        .unwrap();
        assert_eq!(config.request().tip_override, Some(I256::from(-5)));
    }

    #[test]
    fn test_tip_beyond_i64_reaches_bounds_check() {
        let config = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            tip_override_wei = "50000000000000000000"
            minipools = []
            "#,
        )
        .unwrap();

        let request = config.request();
        let expected = I256::from_dec_str("50000000000000000000").unwrap();
        assert_eq!(request.tip_override, Some(expected));
        match crate::validation::check_tip(request.tip_override.as_ref()) {
            Err(crate::PreflightError::TipTooHigh { tip, .. }) => assert_eq!(tip, expected),
            other => panic!("expected TipTooHigh, got {:?}", other),
        }
    }

    #[test]
    fn test_tip_as_decimal_string() {
        let config = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            tip_override_wei = "-7"
            minipools = []
            "#,
        )
        .unwrap();
        assert_eq!(config.request().tip_override, Some(I256::from(-7)));
    }

    #[test]
    fn test_non_numeric_tip_is_rejected() {
        let result = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            tip_override_wei = "5 gwei"
            minipools = []
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_minipools_are_rejected() {
        let result = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            minipools = [
                "0x1111111111111111111111111111111111111111",
                "0x1111111111111111111111111111111111111111",
            ]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let result = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            minipools = []

            [logging]
            level = "loud"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_address_is_rejected() {
        let result = Config::parse(
            r#"
            [rpc]
            url = "http://localhost:8545"

            [preflight]
            minipools = ["0x1234"]
            "#,
        );
        assert!(result.is_err());
    }
}
