//! AWS API interaction module
//!
//! Credential, region and endpoint resolution plus the service clients,
//! all on top of the AWS SDK.
//!
//! # Module Structure
//!
//! - [`auth`] - Shared SDK configuration and the default account
//! - [`client`] - Main AWS client holding the QuickSight and STS clients
//!
//! # Example
//!
//! ```ignore
//! use qsgroup::aws::client::AwsClient;
//!
//! async fn example(cancel: &CancellationToken) -> anyhow::Result<()> {
//!     let client = AwsClient::new(Some("us-east-1"), None, None).await;
//!     let account = client.caller_account_id(cancel).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
