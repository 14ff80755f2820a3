//! QuickSight group API surface
//!
//! The four remote calls the group resource needs, behind a trait so the
//! lifecycle handlers can run against a fake in tests.

use crate::error::ApiError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Address of a group: account, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub aws_account_id: String,
    pub namespace: String,
    pub group_name: String,
}

impl GroupKey {
    pub fn new(aws_account_id: &str, namespace: &str, group_name: &str) -> Self {
        Self {
            aws_account_id: aws_account_id.to_string(),
            namespace: namespace.to_string(),
            group_name: group_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupInput {
    pub key: GroupKey,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGroupInput {
    pub key: GroupKey,
    pub description: Option<String>,
}

/// A group as the service reports it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub arn: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub principal_id: Option<String>,
}

/// Response of create, describe and update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOutput {
    pub group: Option<Group>,
    pub request_id: Option<String>,
    pub status: Option<u16>,
}

/// Response of delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteGroupOutput {
    pub request_id: Option<String>,
    pub status: Option<u16>,
}

/// The remote calls behind the group resource
#[async_trait]
pub trait GroupApi: Send + Sync {
    async fn create_group(
        &self,
        cancel: &CancellationToken,
        input: CreateGroupInput,
    ) -> Result<GroupOutput, ApiError>;

    async fn describe_group(
        &self,
        cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<GroupOutput, ApiError>;

    async fn update_group(
        &self,
        cancel: &CancellationToken,
        input: UpdateGroupInput,
    ) -> Result<GroupOutput, ApiError>;

    async fn delete_group(
        &self,
        cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<DeleteGroupOutput, ApiError>;
}
