//! Provider
//!
//! Holds what every lifecycle handler shares: the QuickSight client handle and
//! the account the provider resolved at start-up. [`Provider`] drives a
//! resource through its lifecycle, applying schema defaults and validation
//! before anything reaches the remote service.

use crate::quicksight::api::GroupApi;
use crate::resource::{get_registry, Diagnostic, Diagnostics, Resource, ResourceData, ResourceRegistry};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared, read-only state passed to every handler
#[derive(Clone)]
pub struct ProviderMeta {
    client: Arc<dyn GroupApi>,
    account_id: String,
}

impl ProviderMeta {
    pub fn new(client: Arc<dyn GroupApi>, account_id: &str) -> Self {
        Self {
            client,
            account_id: account_id.to_string(),
        }
    }

    /// QuickSight client
    pub fn quicksight(&self) -> &dyn GroupApi {
        self.client.as_ref()
    }

    /// Account used when a resource does not name one
    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

/// Attribute changes requested for an update; `None` unsets the attribute
pub type Changes = BTreeMap<String, Option<String>>;

/// Lifecycle driver over the resource registry
pub struct Provider {
    meta: ProviderMeta,
    registry: ResourceRegistry,
}

impl Provider {
    pub fn new(meta: ProviderMeta) -> Self {
        Self {
            meta,
            registry: get_registry().clone(),
        }
    }

    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.registry
            .get(type_name)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown resource type: {} (known: {})",
                    type_name,
                    self.registry.type_names().join(", ")
                )
            })
    }

    /// Create from configuration
    ///
    /// `d` holds the configured attribute values. Defaults are filled in and
    /// the configuration validated first; on validation errors the resource
    /// handler is never called.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        d: &mut ResourceData,
    ) -> Result<Diagnostics> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();

        schema.apply_defaults(d);
        let diags = schema.validate(d);
        if diags.has_error() {
            return Ok(diags);
        }

        tracing::info!("Creating {}", type_name);
        d.mark_new_resource(true);
        let diags = resource.create(cancel, d, &self.meta).await;
        d.mark_new_resource(false);

        Ok(diags)
    }

    /// Refresh from the remote service
    ///
    /// A resource that no longer exists remotely comes back with an empty
    /// identifier and a warning.
    pub async fn read(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        d: &mut ResourceData,
    ) -> Result<Diagnostics> {
        let resource = self.resource(type_name)?;
        let id = d.id().to_string();
        tracing::info!("Reading {} ({})", type_name, id);

        let mut diags = resource.read(cancel, d, &self.meta).await;
        if !diags.has_error() && !d.exists() {
            diags.push(Diagnostic::warning(format!(
                "{} ({}) no longer exists and was removed from state",
                type_name, id
            )));
        }
        Ok(diags)
    }

    /// Apply attribute changes in place, then update
    ///
    /// Changes to force-new attributes are refused since they would need the
    /// resource to be replaced.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        d: &mut ResourceData,
        changes: &Changes,
    ) -> Result<Diagnostics> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();
        let mut diags = Diagnostics::new();

        for (name, value) in changes {
            let Some(attribute) = schema.attribute(name) else {
                diags.push(
                    Diagnostic::error(format!("An argument named \"{}\" is not expected here", name))
                        .with_attribute(name),
                );
                continue;
            };

            if !attribute.is_configurable() {
                diags.push(
                    Diagnostic::error(format!("\"{}\" is computed and cannot be set", name))
                        .with_attribute(name),
                );
                continue;
            }

            if attribute.force_new && d.get(name) != value.as_deref() {
                diags.push(
                    Diagnostic::error(format!(
                        "changing \"{}\" requires replacing the resource",
                        name
                    ))
                    .with_attribute(name)
                    .with_detail("Delete the resource and create it again with the new value"),
                );
                continue;
            }

            if let Some(value) = value {
                for validator in &attribute.validators {
                    for message in validator.validate(name, value) {
                        diags.push(Diagnostic::error(message).with_attribute(name));
                    }
                }
            }
        }

        if diags.has_error() {
            return Ok(diags);
        }

        for (name, value) in changes {
            d.set(name, value.clone());
        }

        tracing::info!("Updating {} ({})", type_name, d.id());
        Ok(resource.update(cancel, d, &self.meta).await)
    }

    /// Delete; on success the identifier is cleared
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        d: &mut ResourceData,
    ) -> Result<Diagnostics> {
        let resource = self.resource(type_name)?;
        tracing::info!("Deleting {} ({})", type_name, d.id());

        let diags = resource.delete(cancel, d, &self.meta).await;
        if !diags.has_error() {
            d.set_id("");
        }
        Ok(diags)
    }

    /// Import an existing remote entity by identifier, then read it
    pub async fn import(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        id: &str,
    ) -> Result<(ResourceData, Diagnostics)> {
        let resource = self.resource(type_name)?;
        tracing::info!("Importing {} ({})", type_name, id);

        let mut d = ResourceData::new();
        let mut diags = resource.import(id, &mut d);
        if diags.has_error() {
            return Ok((d, diags));
        }

        diags.extend(resource.read(cancel, &mut d, &self.meta).await);
        if !diags.has_error() && !d.exists() {
            diags.push(Diagnostic::error(format!(
                "Cannot import non-existent remote object ({})",
                id
            )));
        }

        Ok((d, diags))
    }
}
