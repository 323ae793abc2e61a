//! # Wirebox
//!
//! > A small composition root: declare named components and their dependencies,
//! > get back fully wired singletons.
//!
//! ## Features
//! * Components built once per container and shared by every consumer
//! * Dependency cycles resolved without infinite recursion
//! * Definitions declared in code, JSON or TOML
//! * `#[derive(Component)]` for slot binding
//!
//! ## Example
//! ```no_run
//! use wirebox::{ApplicationContext, di::{Catalog, Component, Slot}};
//!
//! #[derive(Default, Component)]
//! struct UserDao;
//!
//! #[derive(Default, Component)]
//! struct UserService {
//!     user_dao: Slot<UserDao>,
//! }
//!
//! fn main() -> Result<(), wirebox::error::Error> {
//!     let mut catalog = Catalog::new();
//!     catalog
//!         .register::<UserDao>("UserDao")
//!         .register::<UserService>("UserService");
//!
//!     let context = ApplicationContext::from_json_file("application_context.json", catalog)?;
//!     let service = context.get_as::<UserService>("userService")?;
//!     assert!(service.user_dao.get().is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod di;
pub mod error;

pub use crate::{
    config::{ComponentConfig, ComponentsConfig},
    context::ApplicationContext,
};
