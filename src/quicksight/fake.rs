//! In-memory [`GroupApi`] used by unit tests

use super::api::{
    CreateGroupInput, DeleteGroupOutput, Group, GroupApi, GroupKey, GroupOutput, UpdateGroupInput,
};
use crate::error::ApiError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct FakeGroups {
    groups: Mutex<HashMap<GroupKey, Option<String>>>,
    next_error: Mutex<Option<ApiError>>,
    calls: AtomicUsize,
}

impl FakeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: GroupKey, description: Option<&str>) {
        self.groups
            .lock()
            .unwrap()
            .insert(key, description.map(str::to_string));
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.groups.lock().unwrap().contains_key(key)
    }

    pub fn description(&self, key: &GroupKey) -> Option<String> {
        self.groups.lock().unwrap().get(key).cloned().flatten()
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ApiError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Number of remote calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn output(key: &GroupKey, description: Option<String>) -> GroupOutput {
        GroupOutput {
            group: Some(Group {
                arn: Some(format!(
                    "arn:aws:quicksight:us-east-1:{}:group/{}/{}",
                    key.aws_account_id, key.namespace, key.group_name
                )),
                group_name: Some(key.group_name.clone()),
                description,
                principal_id: Some(format!("group/{}", key.group_name)),
            }),
            request_id: Some("fake-request".to_string()),
            status: Some(200),
        }
    }

    fn missing(key: &GroupKey) -> ApiError {
        ApiError::not_found(format!(
            "Group {} not found in namespace {}",
            key.group_name, key.namespace
        ))
    }
}

#[async_trait]
impl GroupApi for FakeGroups {
    async fn create_group(
        &self,
        _cancel: &CancellationToken,
        input: CreateGroupInput,
    ) -> Result<GroupOutput, ApiError> {
        self.begin()?;
        let mut groups = self.groups.lock().unwrap();
        if groups.contains_key(&input.key) {
            return Err(ApiError::Service {
                status: 409,
                code: "ResourceExistsException".to_string(),
                message: "Group already exists".to_string(),
            });
        }
        groups.insert(input.key.clone(), input.description.clone());
        Ok(Self::output(&input.key, input.description))
    }

    async fn describe_group(
        &self,
        _cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<GroupOutput, ApiError> {
        self.begin()?;
        let groups = self.groups.lock().unwrap();
        match groups.get(&key) {
            Some(description) => Ok(Self::output(&key, description.clone())),
            None => Err(Self::missing(&key)),
        }
    }

    async fn update_group(
        &self,
        _cancel: &CancellationToken,
        input: UpdateGroupInput,
    ) -> Result<GroupOutput, ApiError> {
        self.begin()?;
        let mut groups = self.groups.lock().unwrap();
        match groups.get_mut(&input.key) {
            Some(description) => {
                *description = input.description.clone();
                Ok(Self::output(&input.key, input.description))
            }
            None => Err(Self::missing(&input.key)),
        }
    }

    async fn delete_group(
        &self,
        _cancel: &CancellationToken,
        key: GroupKey,
    ) -> Result<DeleteGroupOutput, ApiError> {
        self.begin()?;
        match self.groups.lock().unwrap().remove(&key) {
            Some(_) => Ok(DeleteGroupOutput {
                request_id: Some("fake-request".to_string()),
                status: Some(200),
            }),
            None => Err(Self::missing(&key)),
        }
    }
}
