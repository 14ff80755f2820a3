//! Resource schema description
//!
//! A [`Schema`] enumerates the attributes of a resource type and how each one
//! behaves: whether it must be configured, whether the service computes it,
//! whether changing it forces a new resource, its default and its validators.

use super::data::ResourceData;
use super::diag::{Diagnostic, Diagnostics};
use super::validation::Validator;
use serde::Serialize;
use std::collections::BTreeMap;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
}

/// Definition of a single attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn string() -> Self {
        Self {
            kind: AttributeType::String,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            default: None,
            description: None,
            validators: Vec::new(),
        }
    }

    pub fn required_string() -> Self {
        Self {
            required: true,
            ..Self::string()
        }
    }

    pub fn optional_string() -> Self {
        Self {
            optional: true,
            ..Self::string()
        }
    }

    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::string()
        }
    }

    /// Optional value the service fills in when left unset
    pub fn optional_computed_string() -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::string()
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Whether users may set this attribute in configuration
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

/// Full schema of a resource type
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Fill unset attributes that declare a default
    pub fn apply_defaults(&self, data: &mut ResourceData) {
        for (name, attribute) in &self.attributes {
            if let Some(ref default) = attribute.default {
                if data.get(name).is_none() {
                    data.set(name, Some(default.clone()));
                }
            }
        }
    }

    /// Validate configured values
    ///
    /// Reports missing required attributes, values set on attributes that are
    /// purely computed, and validator failures.
    pub fn validate(&self, data: &ResourceData) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for (name, attribute) in &self.attributes {
            let value = data.get(name);

            if attribute.required && value.map(str::is_empty).unwrap_or(true) {
                diags.push(
                    Diagnostic::error(format!("The argument \"{}\" is required", name))
                        .with_attribute(name),
                );
                continue;
            }

            let Some(value) = value else {
                continue;
            };

            if !attribute.is_configurable() {
                diags.push(
                    Diagnostic::error(format!("\"{}\" is computed and cannot be set", name))
                        .with_attribute(name),
                );
                continue;
            }

            for validator in &attribute.validators {
                for message in validator.validate(name, value) {
                    diags.push(Diagnostic::error(message).with_attribute(name));
                }
            }
        }

        for name in data.attribute_names() {
            if !self.attributes.contains_key(name) {
                diags.push(
                    Diagnostic::error(format!("An argument named \"{}\" is not expected here", name))
                        .with_attribute(name),
                );
            }
        }

        diags
    }
}
