//! Capabilities the container relies on to create and wire instances

use crate::error::Error;
use std::{any::Any, sync::Arc};

/// A shared, type-erased component instance
pub type Instance = Arc<
    dyn Any
    + Send
    + Sync
>;

/// Allocates bare instances, without any dependencies bound yet
pub trait Instantiator: Send + Sync {
    /// Creates a new instance of the type identified by `type_name`.
    ///
    /// Fails with [`Error::Instantiation`] if the type is unknown or can't be constructed.
    fn allocate(&self, type_name: &str) -> Result<Instance, Error>;
}

/// Assigns resolved dependencies into named slots of an instance
pub trait SlotBinder: Send + Sync {
    /// Binds `value` into the slot `slot` of `instance`.
    ///
    /// Fails with [`Error::NoSuchSlot`] if the instance has no such slot
    /// or with [`Error::IncompatibleType`] if the slot can't hold `value`.
    fn bind(&self, instance: &Instance, slot: &str, value: Instance) -> Result<(), Error>;
}

impl<T: Instantiator + ?Sized> Instantiator for Arc<T> {
    #[inline]
    fn allocate(&self, type_name: &str) -> Result<Instance, Error> {
        (**self).allocate(type_name)
    }
}

impl<T: SlotBinder + ?Sized> SlotBinder for Arc<T> {
    #[inline]
    fn bind(&self, instance: &Instance, slot: &str, value: Instance) -> Result<(), Error> {
        (**self).bind(instance, slot, value)
    }
}
