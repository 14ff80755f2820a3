//! Resource state handle
//!
//! [`ResourceData`] is what every lifecycle handler mutates: the resource
//! identifier plus a flat map of string attributes. An empty identifier means
//! the resource does not exist (or was removed externally).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    /// Set while a create is in flight; never persisted
    #[serde(skip)]
    new_resource: bool,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured attribute values, skipping unset ones
    pub fn from_config<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attributes = values
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k.into(), v.into())))
            .collect();
        Self {
            attributes,
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Raw value, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Value only when it is set to something non-empty
    pub fn get_ok(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Set or clear a value; `None` removes the attribute
    pub fn set<V: Into<String>>(&mut self, key: &str, value: Option<V>) {
        match value {
            Some(v) => {
                self.attributes.insert(key.to_string(), v.into());
            }
            None => {
                self.attributes.remove(key);
            }
        }
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    pub fn mark_new_resource(&mut self, new_resource: bool) {
        self.new_resource = new_resource;
    }

    /// Whether the resource currently exists in state
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}
