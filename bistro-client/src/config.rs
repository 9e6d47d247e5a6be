//! Client configuration

use rust_decimal::Decimal;
use std::str::FromStr;

/// Default number of tables in the dining room
pub const DEFAULT_TABLE_COUNT: u32 = 12;

/// Client configuration for connecting to the restaurant API
///
/// # Environment
///
/// | variable | default | meaning |
/// |----------|---------|---------|
/// | BISTRO_API_URL | http://localhost:8080/api | API base URL |
/// | BISTRO_TOKEN | (none) | bearer token |
/// | BISTRO_TIMEOUT_SECS | 30 | request timeout |
/// | BISTRO_TABLE_COUNT | 12 | tables offered for reservation |
/// | BISTRO_TAX_RATE | 0.10 | tax rate applied to the cart subtotal |
/// | BISTRO_LOG_LEVEL | info | default log filter |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Number of tables (1-based, contiguous); fixed per deployment
    pub table_count: u32,

    /// Tax rate applied to the cart subtotal
    pub tax_rate: Decimal,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            table_count: DEFAULT_TABLE_COUNT,
            tax_rate: Decimal::new(10, 2),
            log_level: "info".into(),
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from `BISTRO_*` values supplied by `lookup`.
    ///
    /// Unparseable values, a zero table count, a negative tax rate and an
    /// empty token all fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("BISTRO_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            token: lookup("BISTRO_TOKEN").filter(|t| !t.is_empty()),
            timeout: lookup("BISTRO_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            table_count: lookup("BISTRO_TABLE_COUNT")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.table_count),
            tax_rate: lookup("BISTRO_TAX_RATE")
                .and_then(|v| Decimal::from_str(&v).ok())
                .filter(|r| !r.is_sign_negative())
                .unwrap_or(defaults.tax_rate),
            log_level: lookup("BISTRO_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the number of tables
    pub fn with_table_count(mut self, table_count: u32) -> Self {
        self.table_count = table_count;
        self
    }

    /// Set the tax rate
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
