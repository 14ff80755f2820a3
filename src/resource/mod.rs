//! Resource abstraction layer
//!
//! This module provides the pieces a declarative resource type plugs into:
//! a static schema, a mutable state handle, diagnostics, and the lifecycle
//! trait every resource implements.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute definitions, defaults and validation
//! - [`validation`] - Reusable string validators
//! - [`data`] - [`ResourceData`], the state handle handlers mutate
//! - [`diag`] - [`Diagnostics`] returned by every handler
//! - [`registry`] - Lookup of resource implementations by type name
//!
//! # Example
//!
//! ```ignore
//! use qsgroup::resource::{get_resource, ResourceData};
//!
//! async fn refresh(meta: &ProviderMeta, cancel: &CancellationToken) {
//!     let resource = get_resource("aws_quicksight_group").unwrap();
//!     let mut data = ResourceData::new();
//!     data.set_id("123456789012/default/analysts");
//!     let diags = resource.read(cancel, &mut data, meta).await;
//! }
//! ```

pub mod data;
pub mod diag;
mod registry;
pub mod schema;
pub mod validation;

pub use data::ResourceData;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use registry::*;
pub use schema::{Attribute, AttributeType, Schema};

use crate::provider::ProviderMeta;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Lifecycle of one declarative resource type
///
/// Handlers never return `Err`; failures are reported as error diagnostics
/// and leave the identifier untouched unless stated otherwise.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name as used in configuration, e.g. `aws_quicksight_group`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Create the remote entity and set the identifier
    async fn create(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics;

    /// Refresh state from the remote entity; clears the identifier on drift
    async fn read(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics;

    /// Push mutable attributes to the remote entity
    async fn update(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics;

    async fn delete(
        &self,
        cancel: &CancellationToken,
        d: &mut ResourceData,
        meta: &ProviderMeta,
    ) -> Diagnostics;

    /// Adopt an existing remote entity. The default passes the identifier through.
    fn import(&self, id: &str, d: &mut ResourceData) -> Diagnostics {
        d.set_id(id);
        Diagnostics::new()
    }
}
