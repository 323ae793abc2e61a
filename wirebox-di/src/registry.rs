//! Table of component definitions

use crate::{Definition, error::Error};
use std::collections::{HashMap, hash_map::Entry};

/// Maps component names to their [`Definition`]s.
///
/// A registry is populated before the container is built and
/// is read-only once handed over to it.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    definitions: HashMap<String, Definition>,
}

impl Registry {
    /// Creates an empty registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, replacing a previous one with the same name
    pub fn register(&mut self, definition: Definition) {
        if let Some(prev) = self.definitions.insert(definition.name().to_owned(), definition) {
            tracing::warn!("component definition replaced: {}", prev.name());
        }
    }

    /// Registers a definition or fails with [`Error::DuplicateDefinition`]
    /// if the name is already taken
    pub fn try_register(&mut self, definition: Definition) -> Result<(), Error> {
        match self.definitions.entry(definition.name().to_owned()) {
            Entry::Occupied(entry) => Err(Error::DuplicateDefinition(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(definition);
                Ok(())
            }
        }
    }

    /// Returns the definition registered under `name`
    #[inline]
    pub fn lookup(&self, name: &str) -> Result<&Definition, Error> {
        self.definitions
            .get(name)
            .ok_or_else(|| Error::DefinitionNotFound(name.to_owned()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over all definitions in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    /// Checks that the dependency graph is complete:
    /// every slot refers to a registered component and every component has a type.
    ///
    /// A missing or undeclared dependency is reported as a [`Error::WiringFailure`]
    /// of the component that refers to it. Definitions are checked in name order,
    /// so with several offenders the reported one is always the same.
    pub fn validate(&self) -> Result<(), Error> {
        let mut definitions: Vec<&Definition> = self.definitions.values().collect();
        definitions.sort_unstable_by(|a, b| a.name().cmp(b.name()));

        for definition in &definitions {
            for (_, dependency) in definition.slots() {
                let declared = self.definitions
                    .get(dependency)
                    .is_some_and(|dep| !dep.is_forward());
                if !declared {
                    return Err(Error::wiring(
                        definition.name(),
                        Error::DefinitionNotFound(dependency.to_owned()),
                    ));
                }
            }
        }
        match definitions.iter().find(|def| def.is_forward()) {
            Some(forward) => Err(Error::DefinitionNotFound(forward.name().to_owned())),
            None => Ok(()),
        }
    }
}

impl FromIterator<Definition> for Registry {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl Extend<Definition> for Registry {
    fn extend<I: IntoIterator<Item = Definition>>(&mut self, iter: I) {
        for definition in iter {
            self.register(definition);
        }
    }
}
