/*!
 * Shim Configuration
 *
 * Environment variables:
 * - STIK_ALLOCATOR_BUDGET: allocator pool size in bytes (default: 102400)
 * - STIK_CONNECT_TIMEOUT_MS: active-open timeout for the std engine (default: 30000)
 * - STIK_TTL: default TTL published in the host configuration (default: 64)
 * - STIK_VARS: initial engine variables, `NAME=VALUE;NAME=VALUE`
 */

use crate::core::errors::{ShimError, ShimResult};
use crate::core::limits::{DEFAULT_ALLOCATOR_BUDGET, DEFAULT_CONNECT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    pub allocator_budget: usize,
    pub connect_timeout_ms: u64,
    pub ttl: u8,
    pub variables: BTreeMap<String, String>,
}

impl ShimConfig {
    pub fn new() -> Self {
        Self {
            allocator_budget: DEFAULT_ALLOCATOR_BUDGET,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            ttl: 64,
            variables: BTreeMap::new(),
        }
    }

    /// Defaults overridden by `STIK_*` environment variables
    pub fn from_env() -> ShimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ShimConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> ShimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(raw) = lookup("STIK_ALLOCATOR_BUDGET") {
            config.allocator_budget = parse_number("STIK_ALLOCATOR_BUDGET", &raw)?;
        }
        if let Some(raw) = lookup("STIK_CONNECT_TIMEOUT_MS") {
            config.connect_timeout_ms = parse_number("STIK_CONNECT_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("STIK_TTL") {
            config.ttl = parse_number("STIK_TTL", &raw)?;
        }
        if let Some(raw) = lookup("STIK_VARS") {
            config.variables = parse_variables(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> ShimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    fn validate(&self) -> ShimResult<()> {
        if self.allocator_budget == 0 {
            return Err(ShimError::configuration("allocator budget must be positive"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ShimError::configuration("connect timeout must be positive"));
        }
        if self.ttl == 0 {
            return Err(ShimError::configuration("ttl must be positive"));
        }
        Ok(())
    }
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> ShimResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| ShimError::configuration(format!("{key}: not a number: {raw:?}")))
}

fn parse_variables(raw: &str) -> ShimResult<BTreeMap<String, String>> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(ShimError::configuration(format!(
                "STIK_VARS: expected NAME=VALUE, got {pair:?}"
            ))),
        })
        .collect()
}
