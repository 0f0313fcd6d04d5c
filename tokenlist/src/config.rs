use crate::address::AddressPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com/tokenlist/tokenlist/main";

/// Settings for a validation pass. The address policy has no default; see [`AddressPolicy`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ValidatorConfig {
    pub address_policy: AddressPolicy,
    /// Raw-content URL prefix under which this repository's files are served
    pub raw_base_url: String,
    pub logo: LogoConfig,
}

impl ValidatorConfig {
    pub fn new(address_policy: AddressPolicy) -> Self {
        ValidatorConfig {
            address_policy,
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            logo: LogoConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LogoConfig {
    pub max_size_bytes: u64,
    pub max_dimension: u32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        LogoConfig {
            max_size_bytes: 100 * 1024,
            max_dimension: 1024,
        }
    }
}

/// Limits for remote logo probing
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Requests in flight per batch
    pub concurrency: usize,
    pub max_retries: u32,
    /// Base delay, multiplied by the attempt number
    pub retry_delay_ms: u64,
    pub batch_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            concurrency: 5,
            max_retries: 3,
            retry_delay_ms: 1000,
            batch_delay_ms: 500,
            timeout_secs: 10,
        }
    }
}

impl ProbeConfig {
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(attempt as u64))
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
