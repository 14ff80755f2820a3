//! AWS Authentication
//!
//! Credentials and region come from the standard AWS provider chain: the
//! environment, shared config and credentials files (including
//! `AWS_CONFIG_FILE` and `AWS_SHARED_CREDENTIALS_FILE`), SSO,
//! `credential_process`, assumed roles and instance metadata.

use aws_config::default_provider::region::DefaultRegionChain;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;

/// Region used when nothing else names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Load the shared SDK configuration
///
/// `region` and `profile` take precedence over the environment and the
/// shared config files. `endpoint` overrides every service endpoint.
pub async fn load_sdk_config(
    region: Option<&str>,
    profile: Option<&str>,
    endpoint: Option<&str>,
) -> SdkConfig {
    let mut default_region = DefaultRegionChain::builder();
    if let Some(profile) = profile {
        default_region = default_region.profile_name(profile);
    }
    let region_chain = RegionProviderChain::first_try(region.map(|r| Region::new(r.to_string())))
        .or_else(default_region.build())
        .or_else(DEFAULT_REGION);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_chain);
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// SDK configuration with fixed credentials, bypassing the provider chain
pub fn static_sdk_config(credentials: Credentials, region: &str, endpoint: Option<&str>) -> SdkConfig {
    let mut builder = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials));
    if let Some(endpoint) = endpoint {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

/// Validate an AWS account id: exactly 12 digits
pub fn validate_account_id(account_id: &str) -> bool {
    account_id.len() == 12 && account_id.chars().all(|c| c.is_ascii_digit())
}

/// Read the default account from `AWS_ACCOUNT_ID`
///
/// Malformed values are ignored.
pub fn get_default_account_id() -> Option<String> {
    let account_id = std::env::var("AWS_ACCOUNT_ID")
        .ok()
        .filter(|v| !v.is_empty())?;
    if validate_account_id(&account_id) {
        Some(account_id)
    } else {
        tracing::warn!("Invalid account id format in AWS_ACCOUNT_ID");
        None
    }
}
