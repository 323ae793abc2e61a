//! Macros for dependency injection

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

const SLOT_ATTR: &str = "slot";
const SLOT_TYPE: &str = "Slot";

/// Expands a derive-macro for a component
pub(super) fn expand_component(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => &data.fields,
        _ => return Err(syn::Error::new_spanned(
            name,
            "`Component` can only be derived for structs"
        )),
    };

    let mut slots = Vec::new();
    let mut members = Vec::new();
    if let syn::Fields::Named(fields) = fields {
        for field in &fields.named {
            let Some(ident) = &field.ident else { continue };
            if let Some(slot) = slot_name(field, ident)? {
                if slots.contains(&slot) {
                    return Err(syn::Error::new_spanned(
                        field,
                        format!("duplicate slot name: {slot}")
                    ));
                }
                slots.push(slot);
                members.push(ident);
            }
        }
    } else if let syn::Fields::Unnamed(fields) = fields
        && let Some(field) = fields.unnamed.iter().find(|f| is_slot(f)) {
        return Err(syn::Error::new_spanned(
            field,
            "slots require named fields"
        ));
    }

    Ok(quote! {
        impl #impl_generics ::wirebox::di::Component for #name #ty_generics #where_clause {
            #[inline]
            fn bind(
                &self,
                slot: &str,
                value: ::wirebox::di::Instance
            ) -> ::core::result::Result<(), ::wirebox::di::error::Error> {
                match slot {
                    #( #slots => self.#members.fill(slot, value), )*
                    _ => {
                        ::core::mem::drop(value);
                        ::core::result::Result::Err(::wirebox::di::error::Error::no_such_slot::<Self>(slot))
                    }
                }
            }
        }
    })
}

/// Returns the slot name of a field, or `None` if the field is not a slot
fn slot_name(field: &syn::Field, ident: &syn::Ident) -> syn::Result<Option<String>> {
    if !is_slot(field) {
        return Ok(None);
    }

    let mut name = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident(SLOT_ATTR)) {
        if let syn::Meta::List(_) = attr.meta {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    name = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported slot attribute, expected `name = \"...\"`"))
                }
            })?;
        }
    }

    let name = name.unwrap_or_else(|| ident.unraw().to_string());
    if name.trim().is_empty() {
        return Err(syn::Error::new_spanned(field, "slot name cannot be blank"));
    }
    Ok(Some(name))
}

#[inline]
fn is_slot(field: &syn::Field) -> bool {
    field.attrs.iter().any(|a| a.path().is_ident(SLOT_ATTR)) || is_slot_type(&field.ty)
}

#[inline]
fn is_slot_type(ty: &syn::Type) -> bool {
    matches!(
        ty,
        syn::Type::Path(path) if path.path.segments
            .last()
            .is_some_and(|segment| segment.ident == SLOT_TYPE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> syn::Result<String> {
        let input: syn::DeriveInput = syn::parse2(input)?;
        expand_component(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn it_expands_slot_fields() {
        let output = expand(quote! {
            struct CommentService {
                user_service: Slot<UserService>,
                #[slot(name = "commentDAO")]
                comments: wirebox::di::Slot<CommentDao>,
                retries: u32,
            }
        }).unwrap();

        assert!(output.contains("\"user_service\" => self . user_service . fill"));
        assert!(output.contains("\"commentDAO\" => self . comments . fill"));
        assert!(!output.contains("retries"));
    }

    #[test]
    fn it_expands_leaf_component() {
        let output = expand(quote! { struct UserDao; }).unwrap();

        assert!(output.contains("no_such_slot"));
    }

    #[test]
    fn it_rejects_enums() {
        let result = expand(quote! { enum Dao { User, Comment } });

        assert!(result.is_err());
    }

    #[test]
    fn it_rejects_duplicate_slot_names() {
        let result = expand(quote! {
            struct UserService {
                user_dao: Slot<UserDao>,
                #[slot(name = "user_dao")]
                legacy: Slot<UserDao>,
            }
        });

        assert!(result.is_err());
    }

    #[test]
    fn it_rejects_unknown_slot_attribute() {
        let result = expand(quote! {
            struct UserService {
                #[slot(rename = "dao")]
                user_dao: Slot<UserDao>,
            }
        });

        assert!(result.is_err());
    }
}
