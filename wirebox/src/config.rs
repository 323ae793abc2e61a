//! Declarative component configuration
//!
//! A configuration document lists components by name and type, together with
//! the components bound into their slots:
//!
//! ```json
//! {
//!   "components": [
//!     { "name": "userController", "type": "UserController",
//!       "slots": { "user_service": "userService" } },
//!     { "name": "userService", "type": "UserService",
//!       "slots": { "user_dao": "userDAO" } },
//!     { "name": "userDAO", "type": "UserDao" }
//!   ]
//! }
//! ```
//!
//! A component may be referenced before it is declared.

use crate::{di::{Definition, Registry}, error::Error};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// Root of a configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentsConfig {
    /// Component declarations in document order
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

/// Declaration of a single component
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentConfig {
    /// Unique component name
    pub name: String,

    /// Type name registered in the [`Catalog`](crate::di::Catalog)
    #[serde(rename = "type")]
    pub type_name: String,

    /// Slot name -> name of the component bound into it
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, String>,
}

impl ComponentsConfig {
    /// Parses a JSON configuration document
    #[inline]
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Parses a TOML configuration document
    #[cfg(feature = "toml")]
    #[inline]
    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        Ok(toml::from_str(toml)?)
    }

    /// Reads and parses a TOML configuration file
    #[cfg(feature = "toml")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let toml = fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }

    /// Turns the declarations into a validated [`Registry`].
    ///
    /// A component may be referenced by a slot before it is declared.
    /// Declaring the same name twice keeps the last declaration, together with its slots.
    /// A referenced name that is never declared is left as a forward reference
    /// and reported by the validation.
    pub fn into_registry(self) -> Result<Registry, Error> {
        let mut declared: IndexMap<String, ComponentConfig> = IndexMap::new();
        for component in self.components {
            if let Some(prev) = declared.insert(component.name.clone(), component) {
                tracing::warn!("component declared more than once: {}", prev.name);
            }
        }

        let mut forward: HashSet<String> = HashSet::new();
        let mut registry = Registry::new();
        for (name, component) in &declared {
            let mut definition = Definition::new(name.as_str(), component.type_name.as_str());
            for (slot, dependency) in &component.slots {
                if !declared.contains_key(dependency) {
                    forward.insert(dependency.clone());
                }
                definition.add_slot(slot.as_str(), dependency.as_str());
            }
            registry.register(definition);
        }
        registry.extend(forward.into_iter().map(Definition::forward));

        registry.validate()?;
        Ok(registry)
    }
}
