//! Dependency Injection container and tools

use crate::{
    Catalog, Definition, Instance, Instantiator, Registry, SlotBinder,
    error::Error,
};
use self::resolver::Resolver;
use std::{
    any::type_name,
    collections::HashMap,
    fmt::{Debug, Formatter},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

mod resolver;

/// Represents a DI container builder,
/// that collects component definitions and the capabilities used to build them.
pub struct ContainerBuilder {
    registry: Registry,
    instantiator: Arc<dyn Instantiator>,
    binder: Arc<dyn SlotBinder>,
}

impl Debug for ContainerBuilder {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ContainerBuilder {
    /// Creates a new DI container builder that allocates and wires
    /// components with the `catalog`
    #[inline]
    pub fn new(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        Self::with_capabilities(catalog.clone(), catalog)
    }

    /// Creates a new DI container builder with a custom [`Instantiator`] and [`SlotBinder`]
    #[inline]
    pub fn with_capabilities(
        instantiator: impl Instantiator + 'static,
        binder: impl SlotBinder + 'static,
    ) -> Self {
        Self {
            registry: Registry::new(),
            instantiator: Arc::new(instantiator),
            binder: Arc::new(binder),
        }
    }

    /// Replaces the collected definitions with `registry`
    #[inline]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a component definition, replacing a previous one with the same name
    #[inline]
    pub fn register(&mut self, definition: Definition) -> &mut Self {
        self.registry.register(definition);
        self
    }

    /// Registers a component definition or fails if the name is already taken
    #[inline]
    pub fn try_register(&mut self, definition: Definition) -> Result<&mut Self, Error> {
        self.registry.try_register(definition)?;
        Ok(self)
    }

    /// Build a DI container
    #[inline]
    pub fn build(self) -> Container {
        Container {
            inner: Arc::new(Inner {
                registry: self.registry,
                instantiator: self.instantiator,
                binder: self.binder,
                ready: RwLock::default(),
                build: Mutex::new(()),
            }),
        }
    }

    /// Validates that the dependency graph is complete and builds a DI container
    #[inline]
    pub fn try_build(self) -> Result<Container, Error> {
        self.registry.validate()?;
        Ok(self.build())
    }
}

pub(crate) struct Inner {
    registry: Registry,
    instantiator: Arc<dyn Instantiator>,
    binder: Arc<dyn SlotBinder>,

    /// Fully wired instances, never removed or replaced
    ready: RwLock<HashMap<String, Instance>>,

    /// Serializes resolution passes
    build: Mutex<()>,
}

impl Inner {
    #[inline]
    fn ready_instance(&self, name: &str) -> Option<Instance> {
        self.ready
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

/// Represents a DI container that builds every named component once
/// and returns the same instance on each request.
///
/// Cloning the container is cheap, all clones share the same instances.
///
/// # Example
/// ```
/// use wirebox_di::{Catalog, ContainerBuilder, Definition, Slot, component};
/// use std::sync::Arc;
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
///
/// let mut catalog = Catalog::new();
/// catalog
///     .register::<UserDao>("UserDao")
///     .register::<UserService>("UserService");
///
/// let mut builder = ContainerBuilder::new(catalog);
/// builder
///     .register(Definition::new("userDAO", "UserDao"))
///     .register(Definition::new("userService", "UserService").with_slot("user_dao", "userDAO"));
///
/// let container = builder.build();
///
/// let service = container.get_as::<UserService>("userService").unwrap();
/// let dao = container.get_as::<UserDao>("userDAO").unwrap();
///
/// assert!(Arc::ptr_eq(service.user_dao.get().unwrap(), &dao));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Debug for Container {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Returns the fully wired instance of the component `name`,
    /// building it and its dependencies on the first request.
    pub fn get(&self, name: &str) -> Result<Instance, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(format!("component name cannot be blank: {name:?}")));
        }
        if let Some(instance) = self.inner.ready_instance(name) {
            return Ok(instance);
        }

        let definition = self.inner.registry.lookup(name)?;

        let _guard = self.inner.build
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // might have been built while waiting for the guard
        if let Some(instance) = self.inner.ready_instance(name) {
            return Ok(instance);
        }

        tracing::debug!("resolving component: {name}");

        let (instance, staged) = Resolver::new(&self.inner)
            .run(definition)
            .inspect_err(|err| tracing::error!("failed to resolve component {name}: {err}"))?;

        let mut ready = self.inner.ready
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        ready.extend(staged);
        ready.insert(name.to_owned(), instance.clone());

        Ok(instance)
    }

    /// Returns the instance of the component `name` as `T`.
    ///
    /// Fails with [`Error::ResolveFailed`] if the component is not a `T`
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.get(name)?
            .downcast::<T>()
            .map_err(|_| Error::ResolveFailed {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Returns `true` if the component `name` is already built
    #[inline]
    pub fn is_ready(&self, name: &str) -> bool {
        self.inner
            .ready
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Returns the definitions this container builds from
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Slot, component};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct UserDao;

    #[derive(Debug, Default)]
    struct CommentDao;

    #[derive(Debug, Default)]
    struct UserService {
        user_dao: Slot<UserDao>,
    }

    #[derive(Debug, Default)]
    struct CommentService {
        comment_dao: Slot<CommentDao>,
        user_service: Slot<UserService>,
    }

    #[derive(Debug, Default)]
    struct UserController {
        user_service: Slot<UserService>,
    }

    #[derive(Debug, Default)]
    struct CommentController {
        comment_service: Slot<CommentService>,
    }

    #[derive(Debug, Default)]
    struct Ping {
        pong: Slot<Pong>,
    }

    #[derive(Debug, Default)]
    struct Pong {
        ping: Slot<Ping>,
    }

    #[derive(Debug, Default)]
    struct Node {
        next: Slot<Node>,
    }

    component! {
        UserDao
        CommentDao
        UserService { user_dao }
        CommentService { comment_dao, user_service }
        UserController { user_service }
        CommentController { comment_service }
        Ping { pong }
        Pong { ping }
        Node { next }
    }

    /// Counts calls to the wrapped capabilities
    #[derive(Default)]
    struct Counting {
        catalog: Catalog,
        allocations: AtomicUsize,
        bindings: AtomicUsize,
    }

    impl Instantiator for Counting {
        fn allocate(&self, type_name: &str) -> Result<Instance, Error> {
            self.allocations.fetch_add(1, Ordering::SeqCst);
            self.catalog.allocate(type_name)
        }
    }

    impl SlotBinder for Counting {
        fn bind(&self, instance: &Instance, slot: &str, value: Instance) -> Result<(), Error> {
            self.bindings.fetch_add(1, Ordering::SeqCst);
            self.catalog.bind(instance, slot, value)
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register::<UserDao>("UserDao")
            .register::<CommentDao>("CommentDao")
            .register::<UserService>("UserService")
            .register::<CommentService>("CommentService")
            .register::<UserController>("UserController")
            .register::<CommentController>("CommentController")
            .register::<Ping>("Ping")
            .register::<Pong>("Pong")
            .register::<Node>("Node");
        catalog
    }

    fn definitions() -> Vec<Definition> {
        vec![
            Definition::new("userDAO", "UserDao"),
            Definition::new("commentDAO", "CommentDao"),
            Definition::new("userService", "UserService")
                .with_slot("user_dao", "userDAO"),
            Definition::new("commentService", "CommentService")
                .with_slot("comment_dao", "commentDAO")
                .with_slot("user_service", "userService"),
            Definition::new("userController", "UserController")
                .with_slot("user_service", "userService"),
            Definition::new("commentController", "CommentController")
                .with_slot("comment_service", "commentService"),
        ]
    }

    fn counted(definitions: Vec<Definition>) -> (Container, Arc<Counting>) {
        let counting = Arc::new(Counting { catalog: catalog(), ..Default::default() });
        let container = ContainerBuilder::with_capabilities(counting.clone(), counting.clone())
            .with_registry(definitions.into_iter().collect())
            .build();
        (container, counting)
    }

    fn container(definitions: Vec<Definition>) -> Container {
        ContainerBuilder::new(catalog())
            .with_registry(definitions.into_iter().collect())
            .build()
    }

    #[test]
    fn it_returns_same_instance_on_each_get() {
        let container = container(definitions());

        let first = container.get("userDAO").unwrap();
        let second = container.get("userDAO").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn it_binds_ready_dependency() {
        let container = container(definitions());

        let service = container.get_as::<UserService>("userService").unwrap();
        let dao = container.get_as::<UserDao>("userDAO").unwrap();

        assert!(Arc::ptr_eq(service.user_dao.get().unwrap(), &dao));
    }

    #[test]
    fn it_promotes_dependencies_built_in_a_pass() {
        let container = container(definitions());

        container.get("userController").unwrap();

        assert!(container.is_ready("userController"));
        assert!(container.is_ready("userService"));
        assert!(container.is_ready("userDAO"));
        assert!(!container.is_ready("commentService"));
    }

    #[test]
    fn it_builds_shared_dependency_once() {
        let (container, counting) = counted(definitions());

        let user_controller = container.get_as::<UserController>("userController").unwrap();
        let comment_controller = container.get_as::<CommentController>("commentController").unwrap();

        let via_user = user_controller.user_service.get().unwrap();
        let via_comment = comment_controller.comment_service.get().unwrap()
            .user_service.get().unwrap();

        assert!(Arc::ptr_eq(via_user, via_comment));
        assert_eq!(counting.allocations.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn it_does_not_rebuild_ready_component() {
        let (container, counting) = counted(definitions());

        container.get("commentController").unwrap();
        let allocations = counting.allocations.load(Ordering::SeqCst);
        let bindings = counting.bindings.load(Ordering::SeqCst);

        container.get("commentController").unwrap();
        container.get("userService").unwrap();

        assert_eq!(counting.allocations.load(Ordering::SeqCst), allocations);
        assert_eq!(counting.bindings.load(Ordering::SeqCst), bindings);
    }

    #[test]
    fn it_resolves_two_component_cycle() {
        let container = container(vec![
            Definition::new("ping", "Ping").with_slot("pong", "pong"),
            Definition::new("pong", "Pong").with_slot("ping", "ping"),
        ]);

        let ping = container.get_as::<Ping>("ping").unwrap();
        let pong = ping.pong.get().unwrap();

        assert!(Arc::ptr_eq(pong.ping.get().unwrap(), &ping));
        assert!(Arc::ptr_eq(pong, &container.get_as::<Pong>("pong").unwrap()));
    }

    #[test]
    fn it_resolves_self_cycle() {
        let container = container(vec![
            Definition::new("node", "Node").with_slot("next", "node"),
        ]);

        let node = container.get_as::<Node>("node").unwrap();

        assert!(Arc::ptr_eq(node.next.get().unwrap(), &node));
    }

    #[test]
    fn it_resolves_long_cycle() {
        let container = container(vec![
            Definition::new("a", "Node").with_slot("next", "b"),
            Definition::new("b", "Node").with_slot("next", "c"),
            Definition::new("c", "Node").with_slot("next", "d"),
            Definition::new("d", "Node").with_slot("next", "a"),
        ]);

        let a = container.get_as::<Node>("a").unwrap();

        let mut node = a.clone();
        for _ in 0..4 {
            node = node.next.get().unwrap().clone();
        }
        assert!(Arc::ptr_eq(&node, &a));
        assert!(["a", "b", "c", "d"].iter().all(|name| container.is_ready(name)));
    }

    #[test]
    fn it_resolves_deep_cycle_on_small_stack() {
        const LEN: usize = 10_000;

        let container = container((0..LEN)
            .map(|i| Definition::new(format!("link{i}"), "Node")
                .with_slot("next", format!("link{}", (i + 1) % LEN)))
            .collect());

        let resolved = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || {
                let head = container.get_as::<Node>("link0")?;
                let tail = container.get_as::<Node>(&format!("link{}", LEN - 1))?;
                Ok::<_, Error>(Arc::ptr_eq(tail.next.get().unwrap(), &head))
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(resolved, Ok(true));
    }

    #[test]
    fn it_returns_error_when_name_is_blank() {
        let container = container(definitions());

        for name in ["", "   "] {
            let result = container.get(name);

            assert!(matches!(result, Err(Error::InvalidArgument(_))));
            assert!(!container.is_ready(name));
        }
    }

    #[test]
    fn it_returns_error_when_get_unregistered() {
        let container = container(definitions());

        let result = container.get("unregistered");

        assert!(matches!(result, Err(Error::DefinitionNotFound(ref name)) if name == "unregistered"));
        assert!(!container.is_ready("unregistered"));
    }

    #[test]
    fn it_publishes_nothing_when_pass_fails() {
        let container = container(vec![
            Definition::new("userDAO", "UserDao"),
            Definition::new("userService", "UserService")
                .with_slot("user_dao", "userDAO")
                .with_slot("audit_log", "userDAO"),
            Definition::new("userController", "UserController")
                .with_slot("user_service", "userService"),
        ]);

        let err = container.get("userController").unwrap_err();

        assert!(matches!(err, Error::WiringFailure { ref component, .. } if component == "userService"));
        assert!(matches!(err.root_cause(), Error::NoSuchSlot { slot, .. } if slot == "audit_log"));
        assert!(!container.is_ready("userController"));
        assert!(!container.is_ready("userService"));
        assert!(!container.is_ready("userDAO"));
    }

    #[test]
    fn it_reports_missing_dependency_of_consumer() {
        let container = container(vec![
            Definition::new("userService", "UserService").with_slot("user_dao", "userDAO"),
        ]);

        let err = container.get("userService").unwrap_err();

        assert_eq!(err, Error::wiring("userService", Error::DefinitionNotFound("userDAO".into())));
    }

    #[test]
    fn it_reports_incompatible_dependency() {
        let container = container(vec![
            Definition::new("commentDAO", "CommentDao"),
            Definition::new("userService", "UserService").with_slot("user_dao", "commentDAO"),
        ]);

        let err = container.get("userService").unwrap_err();

        assert!(matches!(err.root_cause(), Error::IncompatibleType { slot, .. } if slot == "user_dao"));
    }

    #[test]
    fn it_reports_unknown_type() {
        let container = container(vec![
            Definition::new("userService", "UserService").with_slot("user_dao", "userDAO"),
            Definition::new("userDAO", "JdbcUserDao"),
        ]);

        let err = container.get("userService").unwrap_err();

        assert!(matches!(err, Error::WiringFailure { ref component, .. } if component == "userDAO"));
        assert!(matches!(err.root_cause(), Error::Instantiation { type_name, .. } if type_name == "JdbcUserDao"));
    }

    #[test]
    fn it_reports_undeclared_forward_reference() {
        let container = container(vec![Definition::forward("userDAO")]);

        let err = container.get("userDAO").unwrap_err();

        assert!(matches!(err.root_cause(), Error::Instantiation { .. }));
    }

    #[test]
    fn it_returns_error_when_type_does_not_match() {
        let container = container(definitions());

        let result = container.get_as::<UserService>("userDAO");

        assert!(matches!(result, Err(Error::ResolveFailed { ref name, .. }) if name == "userDAO"));
    }

    #[test]
    fn it_validates_graph_on_try_build() {
        let mut builder = ContainerBuilder::new(catalog());
        builder.register(Definition::new("userService", "UserService").with_slot("user_dao", "userDAO"));

        let result = builder.try_build();

        assert!(result.is_err());
    }

    #[test]
    fn it_does_not_share_instances_between_containers() {
        let first = container(definitions());
        let second = container(definitions());

        let a = first.get("userDAO").unwrap();
        let b = second.get("userDAO").unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn it_shares_instances_between_clones() {
        let container = container(definitions());
        let clone = container.clone();

        let a = container.get("userService").unwrap();
        let b = clone.get("userService").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn it_builds_once_under_concurrent_requests() {
        let (container, counting) = counted(definitions());

        let instances: Vec<Instance> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| container.get("commentController").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(counting.allocations.load(Ordering::SeqCst), 5);
    }
}
