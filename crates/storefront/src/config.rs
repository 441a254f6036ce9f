//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory holding the device-local cart record (default: .go-marketplace)
//! - `CART_STORAGE_KEY` - Key the cart record is stored under (default: @GoMarketplace:products)
//! - `CART_WRITE_MAX_ATTEMPTS` - Attempts per cart write before giving up (default: 3)
//! - `CART_WRITE_RETRY_DELAY_MS` - Delay between write attempts in milliseconds (default: 100)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Key the cart has always been stored under on device.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

const DEFAULT_STORAGE_DIR: &str = ".go-marketplace";
const DEFAULT_WRITE_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_WRITE_RETRY_DELAY_MS: u64 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory for file-backed storage
    pub storage_dir: PathBuf,
    /// Key the whole cart is stored under
    pub storage_key: String,
    /// How a failed record write is retried
    pub retry: RetryPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Retry policy for persisting cart snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per snapshot, including the first. Never zero.
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_WRITE_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_WRITE_RETRY_DELAY_MS),
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            retry: RetryPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the storage key or attempt count is empty/zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = lookup("CART_STORAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        let storage_key =
            lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let max_attempts = parse_or_default(
            &lookup,
            "CART_WRITE_MAX_ATTEMPTS",
            DEFAULT_WRITE_MAX_ATTEMPTS,
        )?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_WRITE_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let delay_ms = parse_or_default(
            &lookup,
            "CART_WRITE_RETRY_DELAY_MS",
            DEFAULT_WRITE_RETRY_DELAY_MS,
        )?;

        Ok(Self {
            storage_dir,
            storage_key,
            retry: RetryPolicy {
                max_attempts,
                delay: Duration::from_millis(delay_ms),
            },
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, or fall back to a default.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
