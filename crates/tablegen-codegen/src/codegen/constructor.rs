// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Virtual constructors of trait entities.
//!
//! Each trait entity gets a function named after the entity with one
//! parameter per column, and its implementation:
//!
//! ```rust,ignore
//! #[::tablegen::virtual_fn]
//! pub fn Employee(id: i32, name: String, department: DepartmentRecord) -> EmployeeRecord {
//!     ::core::unreachable!("...")
//! }
//!
//! #[::tablegen::implementation_fn]
//! pub fn __impl_Employee(
//!     id: Option<i32>,
//!     name: Option<String>,
//!     department: Option<DepartmentRecord>,
//!     flag: u32
//! ) -> EmployeeRecord {
//!     let mut record = EmployeeRecord::new();
//!     if (flag & 1u32) != 0 {
//!         if let Some(value) = id {
//!             record.record.set("id", value);
//!         }
//!     }
//!     // ...
//!     record
//! }
//! ```
//!
//! Only the properties whose flag bit is set end up in the record.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Signature, parse_quote};

use super::{record::stored_type, record_ident};
use crate::{
    bitmask::BitmaskEncoding,
    metadata::TableMetadata,
    signature::{FunctionSignaturePair, VirtualFunction}
};

/// Generate the constructor pair of a trait entity declared in `container`.
pub(super) fn generate(
    table: &TableMetadata,
    container: &str
) -> (TokenStream, FunctionSignaturePair) {
    let entity = &table.entity;
    let record = record_ident(table);
    let names: Vec<_> = table.columns.iter().map(|c| &c.property).collect();
    let types: Vec<_> = table.columns.iter().map(stored_type).collect();

    let sig: Signature = parse_quote! {
        fn #entity(#(#names: #types),*) -> #record
    };
    let pair = FunctionSignaturePair::from_virtual(VirtualFunction::from_signature(container, &sig));
    let implementation = &pair.implementation;
    let implementation_name = &implementation.name;

    let parameters = implementation.parameters.iter().map(|p| {
        let name = &p.name;
        let ty = &p.ty;
        quote!(#name: #ty)
    });
    let flags = &implementation.flags;

    // every index is below the parameter count, so its word exists
    let assignments = implementation
        .parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            let (word, bit) = BitmaskEncoding::locate(index);
            let flag = &flags[word];
            let mask = Literal::u32_suffixed(1 << bit);
            let name = &parameter.name;
            let key = name.to_string();
            let store = if parameter.wrapped {
                quote! {
                    if let ::core::option::Option::Some(value) = #name {
                        record.record.set(#key, value);
                    }
                }
            } else {
                quote!(record.record.set(#key, #name);)
            };
            quote! {
                if (#flag & #mask) != 0 {
                    #store
                }
            }
        });

    let virtual_doc = format!(
        "Builds an `{entity}` record from named arguments. Omitted arguments stay unset."
    );
    let implementation_doc = format!("Target of rewritten `{entity}` calls.");
    let panic = format!("`{entity}` calls must be rewritten before compilation");

    let tokens = quote! {
        #[doc = #virtual_doc]
        #[::tablegen::virtual_fn]
        #[allow(non_snake_case, unused_variables, dead_code, clippy::too_many_arguments)]
        pub fn #entity(#(#names: #types),*) -> #record {
            ::core::unreachable!(#panic)
        }

        #[doc = #implementation_doc]
        #[::tablegen::implementation_fn]
        #[allow(non_snake_case, clippy::too_many_arguments)]
        pub fn #implementation_name(#(#parameters,)* #(#flags: u32),*) -> #record {
            #[allow(unused_mut)]
            let mut record = #record::new();
            #(#assignments)*
            record
        }
    };

    (tokens, pair)
}
