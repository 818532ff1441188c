use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::sampler::DEFAULT_SEGMENTS;

/// Sentinel shipped in sample configs; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_ETHERSCAN_API_KEY";

const DEFAULT_TRANSACTIONS_PER_PAGE: u32 = 500;
const DEFAULT_MAX_TRANSACTIONS_TO_SCAN: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub explorer: ExplorerConfig,
    pub chart_segments: usize,
    pub http_bind_addr: String,
}

/// Inputs of one analysis run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub api_key: String,
    pub contract_address: String,
    pub transactions_per_page: u32,
    pub max_transactions_to_scan: u32,
}

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub api_url: String,
    pub tx_url_base: String,
    pub chain_id: u64,
    pub max_concurrent_requests: usize,
    pub request_timeout: Duration,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Error: Please input your Etherscan API key")]
    MissingApiKey,
    #[error("Error: Please input a contract address")]
    MissingContractAddress,
    #[error("Error: Transactions per page must be greater than zero")]
    ZeroPageSize,
    #[error("invalid value {value:?} for {var}")]
    InvalidNumber { var: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            env::var("ETHERSCAN_API_KEY").unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string());
        let contract_address = env::var("CONTRACT_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let analysis = AnalysisConfig {
            api_key,
            contract_address,
            transactions_per_page: env_number(
                "TRANSACTIONS_PER_PAGE",
                DEFAULT_TRANSACTIONS_PER_PAGE,
            )?,
            max_transactions_to_scan: env_number(
                "MAX_TRANSACTIONS_TO_SCAN",
                DEFAULT_MAX_TRANSACTIONS_TO_SCAN,
            )?,
        };

        let explorer = ExplorerConfig {
            api_url: env::var("EXPLORER_API_URL")
                .unwrap_or_else(|_| "https://api.etherscan.io/v2/api".to_string()),
            tx_url_base: env::var("EXPLORER_TX_URL")
                .unwrap_or_else(|_| "https://etherscan.io/tx/".to_string()),
            chain_id: env_number("CHAIN_ID", 1)?,
            max_concurrent_requests: env_number("MAX_CONCURRENT_REQUESTS", 4usize)?.max(1),
            request_timeout: Duration::from_secs(env_number("REQUEST_TIMEOUT_SECS", 30)?),
        };

        let chart_segments = env_number("CHART_SEGMENTS", DEFAULT_SEGMENTS)?;
        let http_bind_addr = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        Ok(Self {
            analysis,
            explorer,
            chart_segments,
            http_bind_addr,
        })
    }
}

impl AnalysisConfig {
    /// Rejects inputs that cannot produce a single explorer request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::MissingApiKey);
        }
        if self.contract_address.trim().is_empty() {
            return Err(ConfigError::MissingContractAddress);
        }
        if self.transactions_per_page == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    /// Copy safe to log or hand to a display.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: mask_api_key(&self.api_key),
            ..self.clone()
        }
    }
}

pub fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "Not Provided".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn env_number<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => parse_number(var, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_number<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> AnalysisConfig {
        AnalysisConfig {
            api_key: "ABCD1234EFGH5678".to_string(),
            contract_address: "0x0dE8bf93dA2f7eecb3d9169422413A9bef4ef628".to_string(),
            transactions_per_page: 500,
            max_transactions_to_scan: 1000,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(analysis().validate(), Ok(()));
    }

    #[test]
    fn placeholder_or_empty_key_rejected() {
        let mut cfg = analysis();
        cfg.api_key = PLACEHOLDER_API_KEY.to_string();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
        cfg.api_key = "  ".to_string();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn key_is_checked_before_address() {
        let mut cfg = analysis();
        cfg.api_key.clear();
        cfg.contract_address.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn missing_address_and_zero_page_rejected() {
        let mut cfg = analysis();
        cfg.contract_address.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingContractAddress));

        let mut cfg = analysis();
        cfg.transactions_per_page = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPageSize));
    }

    #[test]
    fn mask_keeps_only_edges() {
        assert_eq!(mask_api_key("ABCD1234EFGH5678"), "ABCD...5678");
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key(""), "Not Provided");
        assert_eq!(analysis().redacted().api_key, "ABCD...5678");
    }

    #[test]
    fn parse_number_reports_variable() {
        assert_eq!(parse_number::<u32>("CHAIN_ID", " 10 "), Ok(10));
        assert_eq!(
            parse_number::<u32>("CHAIN_ID", "ten"),
            Err(ConfigError::InvalidNumber {
                var: "CHAIN_ID",
                value: "ten".to_string()
            })
        );
    }
}
