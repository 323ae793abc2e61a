//! A single resolution pass

use crate::{Definition, Instance, error::Error};
use super::Inner;
use std::collections::HashMap;

/// Builds one requested component together with every dependency
/// that isn't ready yet.
///
/// The pass owns two caches:
/// - `in_progress`: bare instances whose slots are still being filled,
///   consulted to break dependency cycles.
/// - `staged`: dependencies that finished during this pass,
///   published into the ready cache only if the whole pass succeeds.
///
/// Components under construction are kept on a heap-allocated work stack,
/// so the depth of a dependency chain is not limited by the thread's stack.
pub(super) struct Resolver<'a> {
    inner: &'a Inner,
    in_progress: HashMap<String, Instance>,
    staged: HashMap<String, Instance>,
}

/// A component whose slots are being filled
struct Frame<'a> {
    definition: &'a Definition,
    instance: Instance,

    /// Slots left to bind, the next one last
    pending: Vec<(&'a str, &'a str)>,
}

impl<'a> Resolver<'a> {
    #[inline]
    pub(super) fn new(inner: &'a Inner) -> Self {
        Self {
            inner,
            in_progress: HashMap::new(),
            staged: HashMap::new(),
        }
    }

    /// Builds the requested component and returns it with every dependency
    /// built along the way
    pub(super) fn run(mut self, definition: &'a Definition) -> Result<(Instance, HashMap<String, Instance>), Error> {
        let mut stack = vec![self.allocate(definition)?];

        while let Some(frame) = stack.last_mut() {
            let definition = frame.definition;
            let name = definition.name();

            let Some(&(slot, dependency)) = frame.pending.last() else {
                let instance = frame.instance.clone();
                stack.pop();
                if stack.is_empty() {
                    return Ok((instance, self.staged));
                }
                self.staged.insert(name.to_owned(), instance);
                continue;
            };

            match self.available(name, dependency) {
                Some(value) => {
                    self.inner.binder
                        .bind(&frame.instance, slot, value)
                        .map_err(|err| Error::wiring(name, err))?;
                    frame.pending.pop();

                    tracing::trace!("bound {dependency} into {name}.{slot}");
                }
                None => {
                    let inner = self.inner;
                    let definition = inner.registry
                        .lookup(dependency)
                        .map_err(|err| Error::wiring(name, err))?;
                    stack.push(self.allocate(definition)?);
                }
            }
        }

        unreachable!("the requested component is returned once its slots are bound")
    }

    /// Allocates the bare instance of `definition` and marks it as in progress.
    ///
    /// Must happen before resolving the slots, so that a cycle
    /// leading back here finds this bare instance.
    fn allocate(&mut self, definition: &'a Definition) -> Result<Frame<'a>, Error> {
        let name = definition.name();
        let type_name = definition
            .type_name()
            .ok_or_else(|| Error::wiring(name, Error::Instantiation {
                type_name: "<undeclared>".into(),
                reason: "component type is not declared".into(),
            }))?;

        let instance = self.inner.instantiator
            .allocate(type_name)
            .map_err(|err| Error::wiring(name, err))?;

        tracing::debug!("allocated component: {definition}");

        self.in_progress.insert(name.to_owned(), instance.clone());

        let mut pending: Vec<_> = definition.slots().collect();
        pending.reverse();

        Ok(Frame { definition, instance, pending })
    }

    /// Returns the instance of `name` if it is ready, finished during this pass
    /// or being built (a cycle)
    fn available(&self, consumer: &str, name: &str) -> Option<Instance> {
        if let Some(instance) = self.inner.ready_instance(name) {
            return Some(instance);
        }
        if let Some(instance) = self.staged.get(name) {
            return Some(instance.clone());
        }
        let instance = self.in_progress.get(name)?;
        tracing::trace!("cycle detected: {consumer} receives {name} while it is being built");
        Some(instance.clone())
    }
}
