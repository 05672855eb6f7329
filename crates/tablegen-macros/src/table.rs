// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[table]` expansion.
//!
//! The declaration is checked with the same parser and rules the build
//! script applies, minus anything that needs other declarations (SQL types
//! of custom types, reference targets, cycles).

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Item, TraitItem};
use tablegen_codegen::{
    Error, SourceUnit,
    parse::{PROPERTY_MARKERS, is_marker},
    resolve::check_declaration
};

/// Module the checked declaration is registered under.
pub(crate) const MODULE: &str = "crate";

/// Validate a table declaration and strip its property markers.
pub fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let marker = if attr.is_empty() {
        quote!(#[table])
    } else {
        quote!(#[table(#attr)])
    };
    let file: syn::File = syn::parse2(quote!(#marker #item))?;

    let mut unit = SourceUnit::new();
    unit.add_file(MODULE, &file).map_err(into_syn)?;
    let declaration = unit.tables().next().ok_or_else(|| {
        syn::Error::new_spanned(&item, "#[table] applies to structs and traits")
    })?;
    check_declaration(declaration).map_err(into_syn)?;

    let mut item: Item = syn::parse2(item)?;
    strip_property_markers(&mut item);
    Ok(item.into_token_stream())
}

/// A generation error as a compile error at its span.
pub(crate) fn into_syn(err: Error) -> syn::Error {
    syn::Error::new(err.span(), err)
}

fn strip_property_markers(item: &mut Item) {
    match item {
        Item::Struct(item) => {
            for field in &mut item.fields {
                strip(&mut field.attrs);
            }
        }
        Item::Trait(item) => {
            for member in &mut item.items {
                if let TraitItem::Fn(function) = member {
                    strip(&mut function.attrs);
                }
            }
        }
        _ => {}
    }
}

fn strip(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !PROPERTY_MARKERS.iter().any(|marker| is_marker(attr, marker)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_markers_are_stripped() {
        let expanded = expand(
            quote!(schema = "hr"),
            quote! {
                pub struct Employee {
                    #[primary_key]
                    pub id: i32,
                    #[column(name = "full_name")]
                    pub name: String
                }
            }
        )
        .unwrap();
        let rendered = expanded.to_string();
        assert!(!rendered.contains("primary_key"));
        assert!(!rendered.contains("full_name"));
        assert!(rendered.contains("pub id : i32"));
    }

    #[test]
    fn trait_markers_are_stripped() {
        let expanded = expand(
            TokenStream::new(),
            quote! {
                pub trait Employee: Entity {
                    #[primary_key]
                    fn id(&self) -> i32;
                    #[references]
                    fn department(&self) -> Box<dyn Department>;
                    /// Kept.
                    fn name(&self) -> String;
                }
            }
        )
        .unwrap();
        let rendered = expanded.to_string();
        assert!(!rendered.contains("references"));
        assert!(rendered.contains("doc"));
    }

    #[test]
    fn unsupported_kinds_fail() {
        let err = expand(TokenStream::new(), quote!(pub enum Kind { A, B })).unwrap_err();
        assert!(err.to_string().contains("expected a struct or a trait"));

        let err = expand(TokenStream::new(), quote!(pub struct Pair(i32, i32);)).unwrap_err();
        assert!(err.to_string().contains("tuple struct"));

        let err = expand(TokenStream::new(), quote!(fn f() {})).unwrap_err();
        assert!(err.to_string().contains("structs and traits"));
    }

    #[test]
    fn traits_must_extend_entity() {
        let err = expand(
            TokenStream::new(),
            quote!(pub trait Employee { fn id(&self) -> i32; })
        )
        .unwrap_err();
        assert!(err.to_string().contains("Entity"));
    }

    #[test]
    fn column_and_references_conflict() {
        let err = expand(
            TokenStream::new(),
            quote! {
                pub trait Employee: Entity {
                    #[column(name = "dept")]
                    #[references]
                    fn department(&self) -> Box<dyn Department>;
                }
            }
        )
        .unwrap_err();
        assert!(err.to_string().contains("department"));
    }

    #[test]
    fn malformed_arguments_fail() {
        assert!(
            expand(quote!(nmae = "x"), quote!(pub struct Employee { pub id: i32 })).is_err()
        );
    }
}
