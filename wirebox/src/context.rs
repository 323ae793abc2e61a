//! Application context built from a configuration document

use crate::{
    config::ComponentsConfig,
    di::{Catalog, Container, ContainerBuilder, Instance},
    error::Error,
};
use std::{path::Path, sync::Arc};

/// The composition root of an application.
///
/// Loads component declarations, checks that the dependency graph is complete
/// and hands out wired singletons by name.
///
/// # Example
/// ```no_run
/// use wirebox::{ApplicationContext, di::Catalog};
///
/// # fn catalog() -> Catalog { Catalog::new() }
/// let context = ApplicationContext::from_json_file("application_context.json", catalog()).unwrap();
/// let controller = context.get("userController").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    container: Container,
}

impl ApplicationContext {
    /// Creates an application context from already parsed declarations
    pub fn from_config(config: ComponentsConfig, catalog: Catalog) -> Result<Self, Error> {
        let registry = config.into_registry()?;

        tracing::info!("application context loaded: {} components", registry.len());

        let container = ContainerBuilder::new(catalog)
            .with_registry(registry)
            .build();
        Ok(Self { container })
    }

    /// Creates an application context from a JSON document
    #[inline]
    pub fn from_json_str(json: &str, catalog: Catalog) -> Result<Self, Error> {
        Self::from_config(ComponentsConfig::from_json_str(json)?, catalog)
    }

    /// Creates an application context from a JSON file
    #[inline]
    pub fn from_json_file(path: impl AsRef<Path>, catalog: Catalog) -> Result<Self, Error> {
        Self::from_config(ComponentsConfig::from_json_file(path)?, catalog)
    }

    /// Creates an application context from a TOML document
    #[cfg(feature = "toml")]
    #[inline]
    pub fn from_toml_str(toml: &str, catalog: Catalog) -> Result<Self, Error> {
        Self::from_config(ComponentsConfig::from_toml_str(toml)?, catalog)
    }

    /// Creates an application context from a TOML file
    #[cfg(feature = "toml")]
    #[inline]
    pub fn from_toml_file(path: impl AsRef<Path>, catalog: Catalog) -> Result<Self, Error> {
        Self::from_config(ComponentsConfig::from_toml_file(path)?, catalog)
    }

    /// Returns the component declared as `name`
    #[inline]
    pub fn get(&self, name: &str) -> Result<Instance, Error> {
        Ok(self.container.get(name)?)
    }

    /// Returns the component declared as `name` as `T`
    #[inline]
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, Error> {
        Ok(self.container.get_as::<T>(name)?)
    }

    /// Returns the underlying container
    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }
}
