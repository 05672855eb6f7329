// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record types of trait entities.
//!
//! A record wraps a `tablegen::EntityRecord`
//! property bag keyed by property name. Getters return `None` for unset
//! properties; a nullable property set to `None` reads back as
//! `Some(&None)`.
//!
//! Reference properties hold the referenced record. Each one also gets a key
//! accessor reading the foreign key through the referenced record:
//!
//! ```rust,ignore
//! pub fn department_id(&self) -> Option<&i32> {
//!     self.department().and_then(|it| it.id())
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type, parse_quote};

use super::{ident, record_ident};
use crate::{
    error::Error,
    metadata::{ColumnMetadata, ReferenceMetadata, TableMetadata}
};

/// Type a column's value is stored as.
///
/// Plain columns store the declared property type. Reference columns store
/// the referenced record, inside `Option` when nullable.
pub(super) fn stored_type(column: &ColumnMetadata) -> Type {
    match &column.reference {
        Some(reference) => {
            let target = record_ident(&reference.table);
            if column.nullable {
                parse_quote!(::core::option::Option<#target>)
            } else {
                parse_quote!(#target)
            }
        }
        None => column.property_type.clone()
    }
}

/// Record accessor yielding the referenced key, and its type.
fn key_accessor(reference: &ReferenceMetadata) -> Result<(Ident, Type), Error> {
    let key = reference.primary_key_column();
    match &key.reference {
        None => Ok((key.property.clone(), key.property_type.clone())),
        Some(inner) => Ok((
            ident(&reference.table, &key.property_name)?,
            key_accessor(inner)?.1
        ))
    }
}

/// Generate the record type of a trait entity.
pub(super) fn generate(table: &TableMetadata) -> Result<TokenStream, Error> {
    let record = record_ident(table);
    let table_type = ident(table, &table.table_type_name)?;

    let getters = table.columns.iter().map(getter);
    let setters = table
        .columns
        .iter()
        .filter(|column| column.mutable)
        .map(setter);
    let keys = table
        .columns
        .iter()
        .filter_map(|column| {
            column
                .reference
                .as_ref()
                .map(|reference| key_helper(table, column, reference))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let doc = format!("Values of a `{}` entity.", table.entity);

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug)]
        pub struct #record {
            record: ::tablegen::EntityRecord
        }

        impl #record {
            /// Record with no property set.
            #[must_use]
            pub fn new() -> Self {
                Self {
                    record: ::tablegen::EntityRecord::new(<#table_type as ::tablegen::Table>::TABLE_NAME)
                }
            }

            /// Wrap an existing property bag.
            #[must_use]
            pub fn from_entity_record(record: ::tablegen::EntityRecord) -> Self {
                Self { record }
            }

            /// The property bag.
            #[must_use]
            pub fn into_entity_record(self) -> ::tablegen::EntityRecord {
                self.record
            }

            #(#getters)*
            #(#setters)*
            #(#keys)*
        }

        impl ::core::default::Default for #record {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::tablegen::Entity for #record {
            fn entity_record(&self) -> &::tablegen::EntityRecord {
                &self.record
            }
        }
    })
}

fn getter(column: &ColumnMetadata) -> TokenStream {
    let property = &column.property;
    let key = column.property.to_string();
    let doc = format!("Value of `{key}`, if set.");
    let body = match &column.reference {
        Some(reference) if column.nullable => {
            let target = record_ident(&reference.table);
            quote! {
                self.record
                    .get::<::core::option::Option<#target>>(#key)
                    .and_then(|it| it.as_ref())
            }
        }
        _ => {
            let stored = stored_type(column);
            quote!(self.record.get::<#stored>(#key))
        }
    };
    let returned = match &column.reference {
        Some(reference) => {
            let target = record_ident(&reference.table);
            quote!(#target)
        }
        None => {
            let stored = &column.property_type;
            quote!(#stored)
        }
    };

    quote! {
        #[doc = #doc]
        #[must_use]
        pub fn #property(&self) -> ::core::option::Option<&#returned> {
            #body
        }
    }
}

fn setter(column: &ColumnMetadata) -> TokenStream {
    let key = column.property.to_string();
    let method = format_ident!("set_{}", column.property);
    let stored = stored_type(column);
    let doc = format!("Set `{key}`.");
    quote! {
        #[doc = #doc]
        pub fn #method(&mut self, value: #stored) {
            self.record.set(#key, value);
        }
    }
}

fn key_helper(
    table: &TableMetadata,
    column: &ColumnMetadata,
    reference: &ReferenceMetadata
) -> Result<TokenStream, Error> {
    let method = ident(table, &column.property_name)?;
    let property = &column.property;
    let (key, key_type) = key_accessor(reference)?;
    let doc = format!(
        "Key of the referenced `{}`, read through `{property}`.",
        reference.table.entity
    );
    Ok(quote! {
        #[doc = #doc]
        #[must_use]
        pub fn #method(&self) -> ::core::option::Option<&#key_type> {
            self.#property().and_then(|it| it.#key())
        }
    })
}
