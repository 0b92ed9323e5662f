//! Database credential providers.
//!
//! Credentials are fetched once, before the server starts accepting requests.
//! There is no in-process refresh: after a rotation the process must be
//! restarted to pick up the new secret.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
};
use category_storage::DatabaseCredentials;
use thiserror::Error;

use crate::config::SecretSource;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secrets Manager could not decrypt the secret with the configured KMS key")]
    DecryptionFailure,

    #[error("Secrets Manager reported an internal error")]
    InternalServiceError,

    #[error("Invalid parameter in secret request: {0}")]
    InvalidParameter(String),

    #[error("Invalid secret request: {0}")]
    InvalidRequest(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Unexpected Secrets Manager error: {0}")]
    Unexpected(String),

    #[error("Secret has no string value")]
    MissingSecretString,

    #[error("Secret is not valid credentials JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("DB_PORT must be a number")]
    InvalidPort,
}

#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn database_credentials(&self) -> Result<DatabaseCredentials, SecretError>;
}

/// Builds the provider named by the configuration.
pub async fn provider_for(source: &SecretSource) -> Box<dyn SecretProvider> {
    match source {
        SecretSource::AwsSecretsManager {
            secret_name,
            region,
        } => Box::new(AwsSecretsManagerProvider::new(secret_name.clone(), region.clone()).await),
        SecretSource::Env => Box::new(EnvSecretProvider),
    }
}

pub struct AwsSecretsManagerProvider {
    client: Client,
    secret_id: String,
}

impl AwsSecretsManagerProvider {
    pub async fn new(secret_id: String, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared_config = loader.load().await;

        Self {
            client: Client::new(&shared_config),
            secret_id,
        }
    }
}

#[async_trait]
impl SecretProvider for AwsSecretsManagerProvider {
    async fn database_credentials(&self) -> Result<DatabaseCredentials, SecretError> {
        tracing::debug!(secret_id = %self.secret_id, "Fetching database credentials");

        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let secret = output
            .secret_string()
            .ok_or(SecretError::MissingSecretString)?;

        parse_credentials(secret)
    }
}

/// Reads `DB_HOST`, `DB_USERNAME`, `DB_PASSWORD`, `DB_NAME` and the optional
/// `DB_PORT`.
pub struct EnvSecretProvider;

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn database_credentials(&self) -> Result<DatabaseCredentials, SecretError> {
        let var = |key: &'static str| std::env::var(key).map_err(|_| SecretError::MissingEnv(key));

        Ok(DatabaseCredentials {
            host: var("DB_HOST")?,
            username: var("DB_USERNAME")?,
            password: var("DB_PASSWORD")?,
            dbname: var("DB_NAME")?,
            port: std::env::var("DB_PORT")
                .ok()
                .map(|p| p.parse().map_err(|_| SecretError::InvalidPort))
                .transpose()?,
        })
    }
}

pub fn parse_credentials(secret: &str) -> Result<DatabaseCredentials, SecretError> {
    Ok(serde_json::from_str(secret)?)
}

/// Service errors are classified by code. Everything else (timeouts, dispatch
/// and credential failures) carries no code, so its full context is kept.
pub fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> SecretError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service) => {
            let err = service.err();
            classify_service_error(err.code(), err.message().unwrap_or_default())
        }
        other => SecretError::Unexpected(DisplayErrorContext(&other).to_string()),
    }
}

/// Maps a Secrets Manager error code to a [`SecretError`]. Both the current
/// code names and the legacy `...Exception` spellings are accepted.
pub fn classify_service_error(code: Option<&str>, message: &str) -> SecretError {
    match code {
        Some("DecryptionFailure" | "DecryptionFailureException") => SecretError::DecryptionFailure,
        Some("InternalServiceError" | "InternalServiceErrorException") => {
            SecretError::InternalServiceError
        }
        Some("InvalidParameterException") => SecretError::InvalidParameter(message.to_string()),
        Some("InvalidRequestException") => SecretError::InvalidRequest(message.to_string()),
        Some("ResourceNotFoundException") => SecretError::NotFound(message.to_string()),
        Some(other) => SecretError::Unexpected(format!("{}: {}", other, message)),
        None => SecretError::Unexpected(message.to_string()),
    }
}
