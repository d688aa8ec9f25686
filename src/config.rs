//! Service configuration
//!
//! Loaded from `~/.config/paseo-checkout/config.toml` (or `PASEO_CONFIG`).
//! Secrets and deployment-specific values may be overridden from the
//! environment:
//!
//! | Variable                   | Field                           |
//! |----------------------------|---------------------------------|
//! | `DATABASE_URL`             | `database.url`                  |
//! | `PAYPAL_CLIENT_ID`         | `paypal.client_id`              |
//! | `PAYPAL_CLIENT_SECRET`     | `paypal.client_secret`          |
//! | `PAYPAL_API`               | `paypal.api_base`               |
//! | `EXCHANGE_RATE_CLP_TO_USD` | `currency.rate_source_to_target`|
//! | `FRONTEND_URL`             | `checkout.frontend_url`         |
//! | `JWT_SECRET`               | `security.jwt_secret`           |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::CheckoutSettings;
use crate::domain::money::ExchangeRate;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::paypal::{PayPalSettings, ProviderCredentials};
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::ConfigError;

const SANDBOX_API: &str = "https://api-m.sandbox.paypal.com";
const LIVE_API: &str = "https://api-m.paypal.com";

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "PASEO_CONFIG";

/// Default config location: `~/.config/paseo-checkout/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paseo-checkout")
        .join("config.toml")
}

/// `PASEO_CONFIG` when set, the default location otherwise
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub paypal: PayPalSection,
    pub currency: CurrencySection,
    pub checkout: CheckoutSection,
    pub security: SecuritySection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayPalSection {
    /// `sandbox` or `live`; picks the API base when `api_base` is unset
    pub mode: String,
    pub api_base: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub brand_name: String,
    pub currency: String,
    pub token_safety_margin_secs: i64,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for PayPalSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPalSection")
            .field("mode", &self.mode)
            .field("api_base", &self.api_base)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("brand_name", &self.brand_name)
            .field("currency", &self.currency)
            .finish()
    }
}

impl Default for PayPalSection {
    fn default() -> Self {
        Self {
            mode: "sandbox".to_string(),
            api_base: None,
            client_id: None,
            client_secret: None,
            brand_name: "Paseo Amigo".to_string(),
            currency: "USD".to_string(),
            token_safety_margin_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl PayPalSection {
    pub fn resolved_api_base(&self) -> String {
        match &self.api_base {
            Some(base) if !base.trim().is_empty() => base.trim_end_matches('/').to_string(),
            _ if self.mode.eq_ignore_ascii_case("live") => LIVE_API.to_string(),
            _ => SANDBOX_API.to_string(),
        }
    }

    fn credentials(&self) -> Option<ProviderCredentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(ProviderCredentials {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySection {
    /// Units of the charge currency per source unit
    pub rate_source_to_target: Decimal,
    pub source_code: String,
}

impl Default for CurrencySection {
    fn default() -> Self {
        Self {
            rate_source_to_target: ExchangeRate::default().value(),
            source_code: "CLP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSection {
    pub bind_orders: bool,
    /// Base of the payer return/cancel URLs
    pub frontend_url: Option<String>,
    pub default_description: String,
}

impl Default for CheckoutSection {
    fn default() -> Self {
        let defaults = CheckoutSettings::default();
        Self {
            bind_orders: defaults.bind_orders,
            frontend_url: None,
            default_description: defaults.default_description,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl std::fmt::Debug for SecuritySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuritySection")
            .field("jwt_secret", &"***")
            .field("jwt_issuer", &self.jwt_issuer)
            .finish()
    }
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "paseo-amigo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `RUST_LOG` syntax; `RUST_LOG` itself wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the TOML file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in practice).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(id) = get("PAYPAL_CLIENT_ID") {
            self.paypal.client_id = Some(id);
        }
        if let Some(secret) = get("PAYPAL_CLIENT_SECRET") {
            self.paypal.client_secret = Some(secret);
        }
        if let Some(base) = get("PAYPAL_API") {
            self.paypal.api_base = Some(base);
        }
        if let Some(rate) = get("EXCHANGE_RATE_CLP_TO_USD") {
            self.currency.rate_source_to_target = Decimal::from_str(rate.trim()).map_err(|e| {
                ConfigError::Invalid(format!("EXCHANGE_RATE_CLP_TO_USD '{}': {}", rate, e))
            })?;
        }
        if let Some(url) = get("FRONTEND_URL") {
            self.checkout.frontend_url = Some(url);
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        Ok(())
    }

    /// Checks run by `--check` and before the server starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }
        if !matches!(self.paypal.mode.to_ascii_lowercase().as_str(), "sandbox" | "live") {
            return Err(ConfigError::Invalid(format!(
                "paypal.mode must be 'sandbox' or 'live', got '{}'",
                self.paypal.mode
            )));
        }
        if self.paypal.client_id.is_some() != self.paypal.client_secret.is_some() {
            return Err(ConfigError::Invalid(
                "paypal.client_id and paypal.client_secret must be set together".into(),
            ));
        }
        if self.paypal.token_safety_margin_secs < 0 {
            return Err(ConfigError::Invalid(
                "paypal.token_safety_margin_secs must not be negative".into(),
            ));
        }
        self.exchange_rate()?;
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "security.jwt_secret is empty (set it or JWT_SECRET)".into(),
            ));
        }
        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn has_provider_credentials(&self) -> bool {
        self.paypal.credentials().is_some()
    }

    pub fn exchange_rate(&self) -> Result<ExchangeRate, ConfigError> {
        ExchangeRate::new(self.currency.rate_source_to_target)
            .map_err(|e| ConfigError::Invalid(format!("currency.rate_source_to_target: {}", e)))
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            issuer: self.security.jwt_issuer.clone(),
        }
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            bind_orders: self.checkout.bind_orders,
            default_description: self.checkout.default_description.clone(),
        }
    }

    pub fn paypal_settings(&self) -> Result<PayPalSettings, ConfigError> {
        Ok(PayPalSettings {
            api_base: self.paypal.resolved_api_base(),
            credentials: self.paypal.credentials(),
            brand_name: self.paypal.brand_name.clone(),
            currency: self.paypal.currency.clone(),
            rate: self.exchange_rate()?,
            frontend_url: self
                .checkout
                .frontend_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            token_safety_margin_secs: self.paypal.token_safety_margin_secs,
            request_timeout_secs: self.paypal.request_timeout_secs,
        })
    }
}
