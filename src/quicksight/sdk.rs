//! QuickSight group calls through the SDK client

use super::api::{
    CreateGroupInput, DeleteGroupOutput, Group, GroupApi, GroupKey, GroupOutput, UpdateGroupInput,
};
use crate::aws::client::{cancellable, AwsClient};
use crate::error::ApiError;
use async_trait::async_trait;
use aws_sdk_quicksight::types;
use tokio_util::sync::CancellationToken;

impl From<&types::Group> for Group {
    fn from(group: &types::Group) -> Self {
        Self {
            arn: group.arn().map(str::to_string),
            group_name: group.group_name().map(str::to_string),
            description: group.description().map(str::to_string),
            principal_id: group.principal_id().map(str::to_string),
        }
    }
}

fn output(group: Option<&types::Group>, request_id: Option<&str>, status: i32) -> GroupOutput {
    GroupOutput {
        group: group.map(Group::from),
        request_id: request_id.map(str::to_string),
        status: u16::try_from(status).ok(),
    }
}

#[async_trait]
impl GroupApi for AwsClient {
    async fn create_group(
        &self,
        cancel: &CancellationToken,
        input: CreateGroupInput,
    ) -> Result<GroupOutput, ApiError> {
        let key = input.key;
        let call = self
            .quicksight
            .create_group()
            .aws_account_id(key.aws_account_id)
            .namespace(key.namespace)
            .group_name(key.group_name)
            .set_description(input.description)
            .send();

        let result = cancellable(cancel, call).await?;
        Ok(output(result.group(), result.request_id(), result.status()))
    }

    async fn describe_group(
        &self,
        cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<GroupOutput, ApiError> {
        let call = self
            .quicksight
            .describe_group()
            .aws_account_id(key.aws_account_id)
            .namespace(key.namespace)
            .group_name(key.group_name)
            .send();

        let result = cancellable(cancel, call).await?;
        Ok(output(result.group(), result.request_id(), result.status()))
    }

    async fn update_group(
        &self,
        cancel: &CancellationToken,
        input: UpdateGroupInput,
    ) -> Result<GroupOutput, ApiError> {
        let key = input.key;
        let call = self
            .quicksight
            .update_group()
            .aws_account_id(key.aws_account_id)
            .namespace(key.namespace)
            .group_name(key.group_name)
            .set_description(input.description)
            .send();

        let result = cancellable(cancel, call).await?;
        Ok(output(result.group(), result.request_id(), result.status()))
    }

    async fn delete_group(
        &self,
        cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<DeleteGroupOutput, ApiError> {
        let call = self
            .quicksight
            .delete_group()
            .aws_account_id(key.aws_account_id)
            .namespace(key.namespace)
            .group_name(key.group_name)
            .send();

        let result = cancellable(cancel, call).await?;
        Ok(DeleteGroupOutput {
            request_id: result.request_id().map(str::to_string),
            status: u16::try_from(result.status()).ok(),
        })
    }
}
