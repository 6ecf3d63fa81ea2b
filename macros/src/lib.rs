//! Derive macros for the todo widget
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use todo_widget_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[resizes]
//!     AddTodo { title: String },
//!
//!     ToggleCompleted { id: i64 },
//! }
//!
//! assert!(TodoAction::AddTodo { title: "milk".into() }.resizes_store());
//! assert_eq!(TodoAction::ToggleCompleted { id: 1 }.action_name(), "ToggleCompleted");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `action_name()` - Returns the variant name, for logs and metrics labels
/// - `resizes_store()` - Returns true if the variant is tagged `#[resizes]`
///
/// # Attributes
///
/// - `#[resizes]` - Mark a variant whose reduction may add or remove items,
///   so anything derived from the item count must be re-evaluated afterwards
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - `#[resizes]` is given arguments
#[proc_macro_derive(Action, attributes(resizes))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut name_arms = Vec::new();
    let mut resizes_arms = Vec::new();

    for variant in &data_enum.variants {
        if let Some(attr) = find_attribute(&variant.attrs, "resizes") {
            if !matches!(attr.meta, syn::Meta::Path(_)) {
                return syn::Error::new_spanned(attr, "#[resizes] takes no arguments")
                    .to_compile_error()
                    .into();
            }
            let pattern = variant_pattern(&variant.ident, &variant.fields);
            resizes_arms.push(quote! { #pattern => true, });
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    // Matching on `*self` keeps empty enums exhaustive
    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns the name of this action's variant
            #[must_use]
            pub const fn action_name(&self) -> &'static str {
                match *self {
                    #(#name_arms)*
                }
            }

            /// Returns true if reducing this action may change the number of items
            #[must_use]
            #[allow(clippy::match_like_matches_macro)]
            pub const fn resizes_store(&self) -> bool {
                match *self {
                    #(#resizes_arms)*
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds a match pattern that ignores the variant's fields
fn variant_pattern(variant: &Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// Finds an attribute by its path name
fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}
