use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use category_storage::PoolSettings;

/// What the duplicate-name check does when its query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistsCheckPolicy {
    /// Reject the request with an internal error.
    #[default]
    FailClosed,
    /// Log the failure and continue to the insert, leaving the uniqueness
    /// constraint as the only duplicate guard.
    FailOpen,
}

impl FromStr for ExistsCheckPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-closed" | "closed" => Ok(Self::FailClosed),
            "fail-open" | "open" => Ok(Self::FailOpen),
            other => bail!("unknown EXISTS_CHECK_POLICY '{}' (expected fail-open or fail-closed)", other),
        }
    }
}

/// Where database credentials are fetched from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    AwsSecretsManager {
        secret_name: String,
        region: Option<String>,
    },
    Env,
}

/// Settings consulted on every create-category request.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub required_role: String,
    pub exists_policy: ExistsCheckPolicy,
    /// Include the internal error text in 500 responses.
    pub expose_error_detail: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            required_role: "admin".to_string(),
            exists_policy: ExistsCheckPolicy::default(),
            expose_error_detail: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub secret_source: SecretSource,
    pub pool: PoolSettings,
    pub pipeline: PipelineSettings,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = PipelineSettings::default();
        let pool_defaults = PoolSettings::default();

        let secret_source = match optional("SECRET_SOURCE").as_deref() {
            None | Some("aws") => SecretSource::AwsSecretsManager {
                secret_name: std::env::var("DB_SECRET_NAME")
                    .context("Cannot load DB_SECRET_NAME env variable")?,
                region: optional("AWS_REGION"),
            },
            Some("env") => SecretSource::Env,
            Some(other) => bail!("unknown SECRET_SOURCE '{}' (expected aws or env)", other),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: optional("PORT")
                .map(|p| p.parse())
                .transpose()
                .context("PORT must be a number")?
                .unwrap_or(3000),
            secret_source,
            pool: PoolSettings {
                max_connections: optional("DB_MAX_CONNECTIONS")
                    .map(|v| v.parse())
                    .transpose()
                    .context("DB_MAX_CONNECTIONS must be a number")?
                    .unwrap_or(pool_defaults.max_connections),
                acquire_timeout: optional("DB_ACQUIRE_TIMEOUT_SECS")
                    .map(|v| v.parse().map(Duration::from_secs))
                    .transpose()
                    .context("DB_ACQUIRE_TIMEOUT_SECS must be a number")?
                    .unwrap_or(pool_defaults.acquire_timeout),
            },
            pipeline: PipelineSettings {
                required_role: optional("REQUIRED_ROLE").unwrap_or(defaults.required_role),
                exists_policy: optional("EXISTS_CHECK_POLICY")
                    .map(|v| v.parse())
                    .transpose()?
                    .unwrap_or(defaults.exists_policy),
                expose_error_detail: flag("EXPOSE_ERROR_DETAIL")?,
            },
            run_migrations: flag("RUN_MIGRATIONS")?,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag(key: &str) -> Result<bool> {
    optional(key)
        .map(|v| parse_flag(&v))
        .transpose()
        .with_context(|| format!("{} must be true or false", key))
        .map(Option::unwrap_or_default)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("invalid boolean '{}'", other),
    }
}
