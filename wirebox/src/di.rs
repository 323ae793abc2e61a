//! Tools for Dependency Injection

pub use wirebox_di::{
    Catalog,
    Component,
    Container,
    ContainerBuilder,
    Definition,
    Instance,
    Instantiator,
    Registry,
    Slot,
    SlotBinder,
    component,
};

pub mod error {
    pub use wirebox_di::error::Error;
}

impl From<error::Error> for crate::error::Error {
    #[inline]
    fn from(err: error::Error) -> Self {
        Self::Di(err)
    }
}
