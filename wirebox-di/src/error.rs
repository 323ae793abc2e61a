//! Describes dependency injection errors

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The component name is empty or consists of whitespace only
    InvalidArgument(String),

    /// There is no definition registered under the name
    DefinitionNotFound(String),

    /// A definition with the same name is already registered
    DuplicateDefinition(String),

    /// The instantiator was unable to allocate a bare instance
    Instantiation {
        type_name: String,
        reason: String,
    },

    /// The slot does not exist on the instance's type
    NoSuchSlot {
        slot: String,
        type_name: &'static str,
    },

    /// The value bound into a slot has a type the slot does not accept
    IncompatibleType {
        slot: String,
        expected: &'static str,
    },

    /// The slot has already received a value
    SlotOccupied(String),

    /// The resolved instance is not of the requested type
    ResolveFailed {
        name: String,
        expected: &'static str,
    },

    /// A component failed to build, wraps the underlying cause
    WiringFailure {
        component: String,
        source: Box<Error>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Wiring Error: invalid argument: {msg}"),
            Error::DefinitionNotFound(name) => write!(f, "Wiring Error: no component definition with name: {name}"),
            Error::DuplicateDefinition(name) => write!(f, "Wiring Error: component definition already registered: {name}"),
            Error::Instantiation { type_name, reason } => write!(f, "Wiring Error: unable to instantiate type `{type_name}`: {reason}"),
            Error::NoSuchSlot { slot, type_name } => write!(f, "Wiring Error: type `{type_name}` has no slot: {slot}"),
            Error::IncompatibleType { slot, expected } => write!(f, "Wiring Error: slot `{slot}` expects a value of type `{expected}`"),
            Error::SlotOccupied(slot) => write!(f, "Wiring Error: slot already bound: {slot}"),
            Error::ResolveFailed { name, expected } => write!(f, "Wiring Error: component `{name}` is not of type `{expected}`"),
            Error::WiringFailure { component, source } => write!(f, "Wiring Error: failed to build component `{component}`: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WiringFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Wraps `cause` into a [`Error::WiringFailure`] for `component`.
    ///
    /// An error that is already a wiring failure is returned as is,
    /// so every failure is attributed to the component where it happened.
    pub fn wiring(component: &str, cause: Error) -> Self {
        match cause {
            err @ Error::WiringFailure { .. } => err,
            cause => Error::WiringFailure {
                component: component.to_owned(),
                source: Box::new(cause),
            },
        }
    }

    /// Creates a [`Error::NoSuchSlot`] error for the type `T`
    #[inline]
    pub fn no_such_slot<T: ?Sized>(slot: &str) -> Self {
        Error::NoSuchSlot {
            slot: slot.to_owned(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the innermost cause, looking through [`Error::WiringFailure`] wrappers
    pub fn root_cause(&self) -> &Error {
        let mut err = self;
        while let Error::WiringFailure { source, .. } = err {
            err = source.as_ref();
        }
        err
    }
}
