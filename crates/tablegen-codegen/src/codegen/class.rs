// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record conversions of struct entities.
//!
//! `into_record` moves every column field into an
//! `EntityRecord` keyed by field name. `from_record` takes them back and
//! fills the remaining fields with `Default::default()`; it is generated
//! only when reflection is allowed or every field is a column or a
//! `PhantomData` marker.
//!
//! The generated code lives in another module than the struct, so column
//! fields must be visible to it (`pub` or `pub(crate)`) and their types
//! `Send + Sync + 'static`.

use proc_macro2::TokenStream;
use quote::quote;

use super::ident;
use crate::{
    error::Error,
    metadata::TableMetadata,
    parse::{Declaration, PropertyDecl}
};

/// Fields of a struct entity, split into columns and the rest.
fn class_fields<'a>(
    table: &TableMetadata,
    declaration: &'a Declaration
) -> (Vec<&'a PropertyDecl>, Vec<&'a PropertyDecl>) {
    declaration
        .properties()
        .iter()
        .partition(|property| table.column_for(&property.ident.to_string()).is_some())
}

/// Generate `into_record` and, when possible, `from_record`.
pub(super) fn generate(
    table: &TableMetadata,
    declaration: &Declaration,
    allow_reflection: bool
) -> Result<TokenStream, Error> {
    let entity = &table.entity;
    let table_type = ident(table, &table.table_type_name)?;
    let (columns, others) = class_fields(table, declaration);

    let names: Vec<_> = columns.iter().map(|p| &p.ident).collect();
    let keys: Vec<_> = names.iter().map(ToString::to_string).collect();
    let types: Vec<_> = columns.iter().map(|p| &p.ty).collect();

    let into_doc = format!("Move the columns of this `{entity}` into a record.");
    let into_record = quote! {
        #[doc = #into_doc]
        #[must_use]
        #[allow(unused_mut)]
        pub fn into_record(self) -> ::tablegen::EntityRecord {
            let mut record = ::tablegen::EntityRecord::new(<#table_type as ::tablegen::Table>::TABLE_NAME);
            #(record.set(#keys, self.#names);)*
            record
        }
    };

    let reflectable = allow_reflection || others.iter().all(|p| !p.backed);
    let from_record = reflectable.then(|| {
        let defaults = others.iter().map(|p| &p.ident);
        let from_doc = format!(
            "Rebuild an `{entity}` from a record. `None` if a column is missing or has another type."
        );
        quote! {
            #[doc = #from_doc]
            #[must_use]
            #[allow(unused_mut, unused_variables)]
            pub fn from_record(mut record: ::tablegen::EntityRecord) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(Self {
                    #(#names: record.take::<#types>(#keys)?,)*
                    #(#defaults: ::core::default::Default::default(),)*
                })
            }
        }
    });

    Ok(quote! {
        impl #entity {
            #into_record
            #from_record
        }
    })
}
