//! Declarative description of a named component

use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// Describes one named component: its type and the components
/// that must be bound into its slots.
///
/// # Example
/// ```
/// use wirebox_di::Definition;
///
/// let controller = Definition::new("userController", "UserController")
///     .with_slot("user_service", "userService");
///
/// assert_eq!(controller.name(), "userController");
/// assert_eq!(controller.dependency("user_service"), Some("userService"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Definition {
    /// Unique name of the component
    name: String,

    /// Type identifier understood by an [`Instantiator`](crate::Instantiator).
    ///
    /// `None` for a forward reference which is not declared yet.
    type_name: Option<String>,

    /// Slot name -> name of the component bound into that slot
    slots: IndexMap<String, String>,
}

impl Definition {
    /// Creates a leaf definition
    #[inline]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            slots: IndexMap::new(),
        }
    }

    /// Creates a definition without a type.
    ///
    /// Used while scanning a graph that references a component
    /// before declaring it, the type has to be set with [`Definition::set_type`]
    /// before the component is resolved.
    #[inline]
    pub fn forward(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            slots: IndexMap::new(),
        }
    }

    /// Declares that `dependency` must be bound into the slot `slot`
    pub fn with_slot(mut self, slot: impl Into<String>, dependency: impl Into<String>) -> Self {
        self.add_slot(slot, dependency);
        self
    }

    /// Same as [`Definition::with_slot`] but for a borrowed definition.
    ///
    /// Declaring the same slot twice replaces the dependency.
    pub fn add_slot(&mut self, slot: impl Into<String>, dependency: impl Into<String>) {
        self.slots.insert(slot.into(), dependency.into());
    }

    /// Sets the type of the forward reference
    #[inline]
    pub fn set_type(&mut self, type_name: impl Into<String>) {
        self.type_name = Some(type_name.into());
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns `true` if this definition is still a forward reference
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.type_name.is_none()
    }

    /// Returns the name of the component bound into `slot`
    #[inline]
    pub fn dependency(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// Iterates over `(slot, dependency)` pairs in declaration order
    pub fn slots(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .map(|(slot, dep)| (slot.as_str(), dep.as_str()))
    }

    /// Returns `true` if the component has no dependencies
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Debug for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("slots", &self.slots)
            .finish()
    }
}

impl Display for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let type_name = self.type_name().unwrap_or("<undeclared>");
        write!(f, "Component[name={}, type={type_name}]", self.name)
    }
}
