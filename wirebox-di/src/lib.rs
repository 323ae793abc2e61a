//! Tools for dependency injection by component name

pub use crate::{
    capability::{Instance, Instantiator, SlotBinder},
    catalog::Catalog,
    component::{Component, Slot},
    container::{Container, ContainerBuilder},
    definition::Definition,
    registry::Registry,
};

#[cfg(feature = "macros")]
pub use wirebox_macros::Component;

pub mod error;
pub mod capability;
pub mod catalog;
pub mod component;
pub mod container;
pub mod definition;
pub mod registry;
