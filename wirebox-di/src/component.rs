//! Components with named slots

use crate::{Instance, error::Error};
use std::{
    any::{Any, type_name},
    fmt::{Debug, Formatter},
    sync::{Arc, OnceLock},
};

/// A type whose instances expose named slots that dependencies can be bound into.
///
/// Usually implemented with the [`component!`](crate::component) macro
/// or the `Component` derive-macro rather than by hand.
///
/// # Example
/// ```
/// use wirebox_di::{Component, Instance, Slot, error::Error};
///
/// #[derive(Default)]
/// struct UserDao;
///
/// #[derive(Default)]
/// struct UserService {
///     user_dao: Slot<UserDao>,
/// }
///
/// impl Component for UserService {
///     fn bind(&self, slot: &str, value: Instance) -> Result<(), Error> {
///         match slot {
///             "user_dao" => self.user_dao.fill(slot, value),
///             _ => Err(Error::no_such_slot::<Self>(slot)),
///         }
///     }
/// }
/// ```
pub trait Component: Any + Send + Sync {
    /// Binds `value` into the slot named `slot`
    fn bind(&self, slot: &str, value: Instance) -> Result<(), Error>;
}

/// A write-once attachment point for a dependency of type `T`.
///
/// The slot is empty while the owning instance is being wired
/// and holds the shared dependency afterwards.
pub struct Slot<T> {
    cell: OnceLock<Arc<T>>,
}

impl<T> Default for Slot<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    /// Creates an empty slot
    #[inline]
    pub const fn new() -> Self {
        Self { cell: OnceLock::new() }
    }

    /// Returns the bound dependency, if any
    #[inline]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Send + Sync + 'static> Slot<T> {
    /// Fills the slot with `value`.
    ///
    /// Fails with [`Error::IncompatibleType`] if `value` is not a `T`
    /// and with [`Error::SlotOccupied`] if the slot is already filled.
    pub fn fill(&self, slot: &str, value: Instance) -> Result<(), Error> {
        let value = value
            .downcast::<T>()
            .map_err(|_| Error::IncompatibleType {
                slot: slot.to_owned(),
                expected: type_name::<T>(),
            })?;
        self.cell
            .set(value)
            .map_err(|_| Error::SlotOccupied(slot.to_owned()))
    }
}

// Never formats the dependency itself, components may reference each other.
impl<T> Debug for Slot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_bound() { "bound" } else { "empty" };
        write!(f, "Slot<{}>({state})", type_name::<T>())
    }
}

/// A `component!` macro that implements the [`Component`] trait for one or more types.
///
/// # Macro Syntax
/// ```ignore
/// component! {
///     LeafType
///     TypeWithSlots { slot_field_1, slot_field_2 }
/// };
/// ```
/// Every listed field must be a [`Slot`], the slot is named after the field.
///
/// # Example
/// ```
/// use wirebox_di::{component, Slot};
///
/// #[derive(Default)]
/// struct UserDao;
///
/// #[derive(Default)]
/// struct UserService {
///     user_dao: Slot<UserDao>,
/// }
///
/// component! {
///     UserDao
///     UserService { user_dao }
/// };
/// ```
#[macro_export]
macro_rules! component {
    ($($name:ident $({ $($slot:ident),* $(,)? })?)*) => {
        $(impl $crate::Component for $name {
            #[inline]
            fn bind(&self, slot: &str, value: $crate::Instance) -> Result<(), $crate::error::Error> {
                match slot {
                    $($(stringify!($slot) => self.$slot.fill(slot, value),)*)?
                    _ => {
                        drop(value);
                        Err($crate::error::Error::no_such_slot::<Self>(slot))
                    }
                }
            }
        })*
    };
}
