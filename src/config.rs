use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::services::inventory::{DispatchOptions, ProductIdPolicy};

const DEFAULT_INVENTORY_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TEMPLATES_GLOB: &str = "templates/**/*";

/// Errors raised while reading the console configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value `{value}`")]
    InvalidValue { name: &'static str, value: String },
    #[error("configuration is invalid: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Runtime settings of the console server.
#[derive(Debug, Clone, Validate)]
pub struct ConsoleConfig {
    /// Base URL of the remote `/inventory` resource.
    #[validate(url)]
    pub inventory_service_url: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Key material for the flash message cookie; generated when absent.
    #[validate(length(min = 64))]
    pub secret_key: Option<String>,
    pub product_ids: ProductIdPolicy,
    pub stamp_on_create: bool,
    #[validate(length(min = 1))]
    pub templates_glob: String,
}

impl ConsoleConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let product_ids = match lookup("PRODUCT_ID_POLICY") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PRODUCT_ID_POLICY",
                value,
            })?,
            None => ProductIdPolicy::default(),
        };

        let stamp_on_create = match lookup("STAMP_ON_CREATE") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                name: "STAMP_ON_CREATE",
                value,
            })?,
            None => false,
        };

        let config = Self {
            inventory_service_url: lookup("INVENTORY_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_INVENTORY_SERVICE_URL.to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            secret_key: lookup("SECRET_KEY").filter(|key| !key.is_empty()),
            product_ids,
            stamp_on_create,
            templates_glob: lookup("TEMPLATES_GLOB")
                .unwrap_or_else(|| DEFAULT_TEMPLATES_GLOB.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            product_ids: self.product_ids,
            stamp_on_create: self.stamp_on_create,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).expect("defaults should be valid");

        assert_eq!(config.inventory_service_url, "http://localhost:8000");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.secret_key, None);
        assert_eq!(config.dispatch_options(), DispatchOptions::default());
        assert_eq!(config.templates_glob, "templates/**/*");
    }

    #[test]
    fn reads_dispatch_settings() {
        let config = config_from(&[
            ("PRODUCT_ID_POLICY", "client-random"),
            ("STAMP_ON_CREATE", "yes"),
            ("PORT", "9090"),
        ])
        .expect("config should be valid");

        assert_eq!(config.port, 9090);
        assert_eq!(
            config.dispatch_options(),
            DispatchOptions {
                product_ids: ProductIdPolicy::ClientRandom,
                stamp_on_create: true,
            }
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = config_from(&[("PRODUCT_ID_POLICY", "guess")]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "PRODUCT_ID_POLICY",
                ..
            })
        ));
    }

    #[test]
    fn rejects_port_zero_and_garbage() {
        assert!(matches!(
            config_from(&[("PORT", "0")]),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
    }

    #[test]
    fn rejects_short_secret_key() {
        let result = config_from(&[("SECRET_KEY", "too-short")]);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_invalid_service_url() {
        let result = config_from(&[("INVENTORY_SERVICE_URL", "inventory service")]);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
