//! AWS Client
//!
//! Holds the service clients built from one shared SDK configuration and
//! runs their calls under a cancellation token.

use super::auth;
use crate::error::ApiError;
use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Main AWS client
#[derive(Clone, Debug)]
pub struct AwsClient {
    pub quicksight: aws_sdk_quicksight::Client,
    pub sts: aws_sdk_sts::Client,
    region: String,
}

impl AwsClient {
    /// Create a client from the standard provider chain
    pub async fn new(region: Option<&str>, profile: Option<&str>, endpoint: Option<&str>) -> Self {
        let config = auth::load_sdk_config(region, profile, endpoint).await;
        Self::from_config(&config)
    }

    /// Create a client with explicit credentials
    pub fn with_credentials(credentials: Credentials, region: &str, endpoint: Option<&str>) -> Self {
        Self::from_config(&auth::static_sdk_config(credentials, region, endpoint))
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            quicksight: aws_sdk_quicksight::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
            region: config
                .region()
                .map(ToString::to_string)
                .unwrap_or_else(|| auth::DEFAULT_REGION.to_string()),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Account of the caller, from STS GetCallerIdentity
    pub async fn caller_account_id(&self, cancel: &CancellationToken) -> Result<String, ApiError> {
        let output = cancellable(cancel, self.sts.get_caller_identity().send()).await?;
        output
            .account()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Response("GetCallerIdentity response has no Account".to_string()))
    }

    /// Account to use: explicit value, `AWS_ACCOUNT_ID`, or the caller identity
    pub async fn resolve_account_id(
        &self,
        cancel: &CancellationToken,
        explicit: Option<&str>,
    ) -> Result<String> {
        if let Some(account_id) = explicit {
            return Ok(account_id.to_string());
        }
        if let Some(account_id) = auth::get_default_account_id() {
            return Ok(account_id);
        }

        let account_id = self
            .caller_account_id(cancel)
            .await
            .context("Failed to determine AWS account id. Set AWS_ACCOUNT_ID or use --account-id")?;
        tracing::info!("Resolved account {} from caller identity", account_id);
        Ok(account_id)
    }
}

/// Await an SDK call unless `cancel` fires first
pub(crate) async fn cancellable<T, E>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, ApiError>
where
    ApiError: From<E>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        result = call => result.map_err(ApiError::from),
    }
}
