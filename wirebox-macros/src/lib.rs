//! Proc-Macros implementations for Wirebox
//!

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod component;

/// Implements the `Component` trait for a struct, binding slots into its [`Slot`] fields
///
/// Every field of type `Slot<T>` becomes a slot named after the field.
/// A slot can be renamed with `#[slot(name = "...")]`, a field wrapping
/// a slot type under another name can be marked with a bare `#[slot]`.
///
/// # Example
/// ```ignore
/// use wirebox::di::{Component, Slot};
///
/// #[derive(Default, Component)]
/// struct UserDao;
///
/// #[derive(Default, Component)]
/// struct CommentService {
///     user_service: Slot<UserService>,
///     #[slot(name = "commentDAO")]
///     comments: Slot<CommentDao>,
/// }
///
/// // This expands to:
/// // impl Component for CommentService {
/// //     fn bind(&self, slot: &str, value: Instance) -> Result<(), Error> {
/// //         match slot {
/// //             "user_service" => self.user_service.fill(slot, value),
/// //             "commentDAO" => self.comments.fill(slot, value),
/// //             _ => Err(Error::no_such_slot::<Self>(slot)),
/// //         }
/// //     }
/// // }
/// ```
///
/// [`Slot`]: https://docs.rs/wirebox-di/latest/wirebox_di/component/struct.Slot.html
#[proc_macro_derive(Component, attributes(slot))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    component::expand_component(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
