// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity sequence accessors.
//!
//! Every `Database` gains one method per table:
//!
//! ```rust,ignore
//! let employees = database.employees();
//! assert_eq!(employees.source_name(), "employee");
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::ident;
use crate::{error::Error, metadata::TableMetadata};

/// Generate the `{Table}Sequence` extension trait of `table`.
pub(super) fn generate(table: &TableMetadata) -> Result<TokenStream, Error> {
    let table_type = ident(table, &table.table_type_name)?;
    let method = ident(table, &table.entity_sequence_name)?;
    let trait_name = format_ident!("{}Sequence", table_type);

    let doc = format!("Opens `{table_type}` on any database.");
    let method_doc = format!("Sequence of `{}` entities.", table.entity);

    Ok(quote! {
        #[doc = #doc]
        pub trait #trait_name: ::tablegen::Database + ::core::marker::Sized {
            #[doc = #method_doc]
            fn #method(&self) -> ::tablegen::EntitySequence<'_, Self, #table_type> {
                ::tablegen::Database::sequence_of(self, #table_type)
            }
        }

        impl<D: ::tablegen::Database> #trait_name for D {}
    })
}
