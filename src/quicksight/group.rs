//! QuickSight Group resource
//!
//! Manages `aws_quicksight_group`. The identifier is
//! `AWS_ACCOUNT_ID/NAMESPACE/GROUP_NAME`, built once on create and parsed on
//! every later call.

use super::api::{CreateGroupInput, GroupKey, UpdateGroupInput};
use crate::error::{ErrorKind, IdError};
use crate::provider::ProviderMeta;
use crate::resource::validation::{all, string_len_between, string_match};
use crate::resource::{Attribute, Diagnostics, Resource, ResourceData, Schema};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

pub const GROUP_RESOURCE_TYPE: &str = "aws_quicksight_group";

/// Namespace used when none is configured
pub const DEFAULT_GROUP_NAMESPACE: &str = "default";

const ID_SEPARATOR: char = '/';

fn namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-zA-Z0-9._-]*$").expect("namespace pattern is valid"))
}

/// Split an identifier into account id, namespace and group name
///
/// The group name is everything after the second separator.
pub fn group_parse_id(id: &str) -> Result<(&str, &str, &str), IdError> {
    let mut parts = id.splitn(3, ID_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(account), Some(namespace), Some(name))
            if !account.is_empty() && !namespace.is_empty() && !name.is_empty() =>
        {
            Ok((account, namespace, name))
        }
        _ => Err(IdError { id: id.to_string() }),
    }
}

pub fn group_create_id(aws_account_id: &str, namespace: &str, group_name: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        aws_account_id,
        namespace,
        group_name,
        sep = ID_SEPARATOR
    )
}

pub fn group_schema() -> Schema {
    Schema::new()
        .with_attribute(
            "arn",
            Attribute::computed_string().with_description("ARN of the group"),
        )
        .with_attribute(
            "aws_account_id",
            Attribute::optional_computed_string()
                .force_new()
                .with_description("Account owning the group; defaults to the provider account"),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description("Free-form description"),
        )
        .with_attribute(
            "group_name",
            Attribute::required_string()
                .force_new()
                .with_description("Name of the group"),
        )
        .with_attribute(
            "namespace",
            Attribute::optional_string()
                .force_new()
                .with_default(DEFAULT_GROUP_NAMESPACE)
                .with_description("QuickSight namespace the group lives in")
                .with_validator(all(vec![
                    string_len_between(1, 63),
                    string_match(
                        namespace_pattern(),
                        "must contain only alphanumeric characters, hyphens, underscores, and periods",
                    ),
                ])),
        )
}

/// The `aws_quicksight_group` resource
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResource;

#[async_trait]
impl Resource for GroupResource {
    fn type_name(&self) -> &'static str {
        GROUP_RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        group_schema()
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let conn = meta.quicksight();

        let aws_account_id = d
            .get_ok("aws_account_id")
            .unwrap_or(meta.account_id())
            .to_string();
        let namespace = d
            .get_ok("namespace")
            .unwrap_or(DEFAULT_GROUP_NAMESPACE)
            .to_string();
        let group_name = d.get("group_name").unwrap_or_default();

        let input = CreateGroupInput {
            key: GroupKey::new(&aws_account_id, &namespace, group_name),
            description: d.get_ok("description").map(str::to_string),
        };

        let output = match conn.create_group(cancel, input).await {
            Ok(output) => output,
            Err(e) => return diags.append_error(format!("creating QuickSight Group: {}", e)),
        };

        let created_name = output
            .group
            .and_then(|g| g.group_name)
            .unwrap_or_else(|| group_name.to_string());
        d.set_id(group_create_id(&aws_account_id, &namespace, &created_name));

        diags.extend(self.read(cancel, d, meta).await);
        diags
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics {
        let diags = Diagnostics::new();
        let conn = meta.quicksight();

        let id = d.id().to_string();
        let (aws_account_id, namespace, group_name) = match group_parse_id(&id) {
            Ok(parts) => parts,
            Err(e) => return diags.append_error(format!("reading QuickSight Group ({}): {}", id, e)),
        };

        let result = conn
            .describe_group(cancel, GroupKey::new(aws_account_id, namespace, group_name))
            .await;

        let output = match result {
            Err(e) if !d.is_new_resource() && e.kind() == ErrorKind::NotFound => {
                tracing::warn!("QuickSight Group ({}) not found, removing from state", id);
                d.set_id("");
                return diags;
            }
            Err(e) => return diags.append_error(format!("reading QuickSight Group ({}): {}", id, e)),
            Ok(output) => output,
        };

        let group = output.group.unwrap_or_default();
        d.set("arn", group.arn);
        d.set("aws_account_id", Some(aws_account_id));
        d.set("group_name", group.group_name);
        d.set("description", group.description);
        d.set("namespace", Some(namespace));

        diags
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let conn = meta.quicksight();

        let id = d.id().to_string();
        let (aws_account_id, namespace, group_name) = match group_parse_id(&id) {
            Ok(parts) => parts,
            Err(e) => {
                return diags.append_error(format!("updating QuickSight Group ({}): {}", id, e))
            }
        };

        let input = UpdateGroupInput {
            key: GroupKey::new(aws_account_id, namespace, group_name),
            description: d.get_ok("description").map(str::to_string),
        };

        if let Err(e) = conn.update_group(cancel, input).await {
            return diags.append_error(format!("updating QuickSight Group {}: {}", id, e));
        }

        diags.extend(self.read(cancel, d, meta).await);
        diags
    }

    async fn delete(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics {
        let diags = Diagnostics::new();
        let conn = meta.quicksight();

        let id = d.id().to_string();
        let (aws_account_id, namespace, group_name) = match group_parse_id(&id) {
            Ok(parts) => parts,
            Err(e) => {
                return diags.append_error(format!("deleting QuickSight Group ({}): {}", id, e))
            }
        };

        match conn
            .delete_group(cancel, GroupKey::new(aws_account_id, namespace, group_name))
            .await
        {
            Ok(_) => diags,
            Err(e) => match e.kind() {
                ErrorKind::NotFound => diags,
                ErrorKind::Other => {
                    diags.append_error(format!("deleting QuickSight Group {}: {}", id, e))
                }
            },
        }
    }
}
