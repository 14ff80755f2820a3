//! Resource Registry
//!
//! Maps resource type names (e.g. `aws_quicksight_group`) to their
//! implementations. The built-in set is constructed once on first access.

use super::Resource;
use crate::quicksight::group::{GroupResource, GROUP_RESOURCE_TYPE};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Lookup table of resource implementations
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(type_name).cloned()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }
}

/// Global registry of built-in resources
static REGISTRY: OnceLock<ResourceRegistry> = OnceLock::new();

/// Get the built-in registry (constructed on first access)
pub fn get_registry() -> &'static ResourceRegistry {
    REGISTRY.get_or_init(|| {
        let mut registry = ResourceRegistry::new();
        registry.register(Arc::new(GroupResource));
        registry
    })
}

/// Get a built-in resource by type name
pub fn get_resource(type_name: &str) -> Option<Arc<dyn Resource>> {
    get_registry().get(type_name)
}

/// Type name used when none is given explicitly
pub fn default_resource_type() -> &'static str {
    GROUP_RESOURCE_TYPE
}
