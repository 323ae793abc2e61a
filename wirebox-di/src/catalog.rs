//! Type catalog that allocates and wires registered component types

use crate::{Component, Instance, Instantiator, SlotBinder, error::Error};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::{Debug, Display, Formatter},
    hash::{BuildHasherDefault, Hasher},
    sync::Arc,
};

type AllocFn = Arc<
    dyn Fn() -> Result<Instance, Error>
    + Send
    + Sync
>;

type BindFn = fn(&Instance, &str, Instance) -> Result<(), Error>;

/// Inner HashMap of slot binders
type BinderMap = HashMap<
    TypeId,
    BindFn,
    BuildHasherDefault<TypeIdHasher>
>;

#[derive(Default)]
struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[cold]
    fn write(&mut self, _: &[u8]) {
        unreachable!("TypeId calls write_u64");
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }
}

/// Maps type names to component types.
///
/// The catalog is both the [`Instantiator`] and the [`SlotBinder`] of a container:
/// it creates instances of registered types by name and binds slots through
/// their [`Component`] implementation.
///
/// # Example
/// ```
/// use wirebox_di::{Catalog, Instantiator, component};
///
/// #[derive(Default)]
/// struct UserDao;
///
/// component! { UserDao };
///
/// let mut catalog = Catalog::new();
/// catalog.register::<UserDao>("UserDao");
///
/// let dao = catalog.allocate("UserDao").unwrap();
/// assert!(dao.downcast_ref::<UserDao>().is_some());
/// ```
#[derive(Default, Clone)]
pub struct Catalog {
    types: HashMap<String, AllocFn>,
    binders: BinderMap,
}

impl Debug for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Catalog {
    /// Creates an empty catalog
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type that is allocated with [`Default`]
    pub fn register<T: Component + Default>(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.register_factory(type_name, T::default)
    }

    /// Registers a type that is allocated by `factory`
    pub fn register_factory<T, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static
    {
        let alloc: AllocFn = Arc::new(move || Ok(Arc::new(factory()) as Instance));
        self.insert::<T>(type_name.into(), alloc)
    }

    /// Registers a type that is allocated by a `factory` that may fail
    pub fn register_try_factory<T, E, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        T: Component,
        E: Display,
        F: Fn() -> Result<T, E> + Send + Sync + 'static
    {
        let type_name = type_name.into();
        let name = type_name.clone();
        let alloc: AllocFn = Arc::new(move || {
            factory()
                .map(|instance| Arc::new(instance) as Instance)
                .map_err(|err| Error::Instantiation {
                    type_name: name.clone(),
                    reason: err.to_string(),
                })
        });
        self.insert::<T>(type_name, alloc)
    }

    /// Returns `true` if the type name is registered
    #[inline]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    fn insert<T: Component>(&mut self, type_name: String, alloc: AllocFn) -> &mut Self {
        self.types.insert(type_name, alloc);
        self.binders.insert(TypeId::of::<T>(), bind_as::<T>);
        self
    }
}

fn bind_as<T: Component>(instance: &Instance, slot: &str, value: Instance) -> Result<(), Error> {
    instance
        .downcast_ref::<T>()
        .ok_or_else(|| Error::no_such_slot::<T>(slot))?
        .bind(slot, value)
}

impl Instantiator for Catalog {
    fn allocate(&self, type_name: &str) -> Result<Instance, Error> {
        let alloc = self.types
            .get(type_name)
            .ok_or_else(|| Error::Instantiation {
                type_name: type_name.to_owned(),
                reason: "type is not registered in the catalog".into(),
            })?;
        alloc()
    }
}

impl SlotBinder for Catalog {
    fn bind(&self, instance: &Instance, slot: &str, value: Instance) -> Result<(), Error> {
        let type_id = (**instance).type_id();
        match self.binders.get(&type_id) {
            Some(bind) => bind(instance, slot, value),
            None => Err(Error::NoSuchSlot {
                slot: slot.to_owned(),
                type_name: "<unknown>",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Slot;

    #[derive(Default)]
    struct UserDao;

    #[derive(Default)]
    struct UserService {
        user_dao: Slot<UserDao>,
    }

    struct Unregistered;

    crate::component! {
        UserDao
        UserService { user_dao }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register::<UserDao>("UserDao")
            .register::<UserService>("UserService");
        catalog
    }

    #[test]
    fn it_allocates_registered_type() {
        let catalog = catalog();

        let first = catalog.allocate("UserService").unwrap();
        let second = catalog.allocate("UserService").unwrap();

        assert!(first.downcast_ref::<UserService>().is_some());
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn it_fails_to_allocate_unknown_type() {
        let catalog = catalog();

        let result = catalog.allocate("CommentDao");

        assert!(matches!(result, Err(Error::Instantiation { ref type_name, .. }) if type_name == "CommentDao"));
    }

    #[test]
    fn it_reports_factory_failure() {
        let mut catalog = Catalog::new();
        catalog.register_try_factory("UserDao", || -> Result<UserDao, &str> { Err("connection refused") });

        let result = catalog.allocate("UserDao");

        assert_eq!(result.err(), Some(Error::Instantiation {
            type_name: "UserDao".into(),
            reason: "connection refused".into(),
        }));
    }

    #[test]
    fn it_binds_through_component() {
        let catalog = catalog();
        let service = catalog.allocate("UserService").unwrap();
        let dao = catalog.allocate("UserDao").unwrap();

        catalog.bind(&service, "user_dao", dao.clone()).unwrap();

        let service = service.downcast_ref::<UserService>().unwrap();
        let bound: Instance = service.user_dao.get().unwrap().clone();
        assert!(Arc::ptr_eq(&bound, &dao));
    }

    #[test]
    fn it_fails_to_bind_into_unknown_type() {
        let catalog = catalog();
        let instance: Instance = Arc::new(Unregistered);

        let result = catalog.bind(&instance, "user_dao", Arc::new(UserDao));

        assert!(matches!(result, Err(Error::NoSuchSlot { type_name: "<unknown>", .. })));
    }
}
