use crate::domain::Address;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

// DAI on mainnet, the original frontend's fallback token.
const DEFAULT_TOKEN_ADDRESS: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
const DEFAULT_MAX_INTEREST_RATE: &str = "200";
const DEFAULT_RATE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound for drate/frate in display units (percent).
    pub max_interest_rate: Decimal,
    /// Token used when no token is selected at workflow entry.
    pub default_token_address: Address,
    /// Decimal precision rates are converted at for submission.
    pub rate_decimals: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let max_interest_rate = Decimal::from_str(
            env_map
                .get("MAX_INTEREST_RATE")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_MAX_INTEREST_RATE),
        )
        .map_err(|_| {
            ConfigError::InvalidValue(
                "MAX_INTEREST_RATE".to_string(),
                "must be a valid decimal".to_string(),
            )
        })?;
        if max_interest_rate.is_sign_negative() {
            return Err(ConfigError::InvalidValue(
                "MAX_INTEREST_RATE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let default_token_address = Address::new(
            env_map
                .get("DEFAULT_TOKEN_ADDRESS")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOKEN_ADDRESS),
        );

        let rate_decimals = env_map
            .get("RATE_DECIMALS")
            .map(|s| s.as_str())
            .map(|s| {
                s.parse::<u32>().map_err(|_| {
                    ConfigError::InvalidValue(
                        "RATE_DECIMALS".to_string(),
                        "must be a valid u32".to_string(),
                    )
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_RATE_DECIMALS);

        Ok(Config {
            max_interest_rate,
            default_token_address,
            rate_decimals,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_interest_rate: Decimal::from_str(DEFAULT_MAX_INTEREST_RATE)
                .unwrap_or(Decimal::ONE_HUNDRED),
            default_token_address: Address::new(DEFAULT_TOKEN_ADDRESS),
            rate_decimals: DEFAULT_RATE_DECIMALS,
        }
    }
}
