// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Marker attributes for tablegen.
//!
//! The markers generate nothing. They check their arguments, strip the
//! property markers so the declaration compiles, and leave the item for the
//! build script, which reads the original sources.
//!
//! | Attribute | Applies to |
//! |-----------|------------|
//! | [`#[table]`](macro@table) | structs and traits extending `Entity` |
//! | [`#[tablegen_config]`](macro@tablegen_config) | one unit struct per crate |
//! | [`#[virtual_fn]`](macro@virtual_fn) | functions whose calls are rewritten |
//! | [`#[implementation_fn]`](macro@implementation_fn) | their `__impl_` targets |

mod config;
mod marker;
mod table;

use proc_macro::TokenStream;

/// Declares a table entity.
///
/// # Example
///
/// ```rust,ignore
/// #[table(name = "t_employee", schema = "hr")]
/// pub trait Employee: Entity {
///     #[primary_key]
///     fn id(&self) -> i32;
///     #[column(name = "full_name")]
///     fn name(&self) -> String;
///     #[references]
///     fn department(&self) -> Box<dyn Department>;
/// }
/// ```
///
/// # Arguments
///
/// | Argument | Description |
/// |----------|-------------|
/// | `name` | Table name |
/// | `alias` | Table alias |
/// | `catalog` / `schema` | Qualifiers |
/// | `type_name` | Generated table type name |
/// | `sequence_name` | Generated sequence accessor name |
/// | `ignore_properties = [..]` | Properties that are not columns |
///
/// Properties accept `#[column(name, property_name, sql_type, ignore)]`,
/// `#[primary_key]` and `#[references(name, property_name)]`.
#[proc_macro_attribute]
pub fn table(attr: TokenStream, item: TokenStream) -> TokenStream {
    table::expand(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Crate-wide generation settings, placed on a unit struct.
///
/// ```rust,ignore
/// #[tablegen_config(allow_reflection = true, default_schema = "hr")]
/// struct Config;
/// ```
#[proc_macro_attribute]
pub fn tablegen_config(attr: TokenStream, item: TokenStream) -> TokenStream {
    config::expand(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Marks a function whose calls accept named, optional arguments.
#[proc_macro_attribute]
pub fn virtual_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    marker::expand_virtual(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Marks the function calls to a virtual function are redirected to.
#[proc_macro_attribute]
pub fn implementation_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    marker::expand_implementation(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
