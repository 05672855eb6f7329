// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table type generation.
//!
//! ```rust,ignore
//! pub struct Employees;
//!
//! impl ::tablegen::Table for Employees {
//!     const TABLE_NAME: &'static str = "employee";
//!     fn columns(&self) -> Vec<ColumnInfo> { vec![self.id().info(), /* ... */] }
//! }
//!
//! impl Employees {
//!     pub fn id(&self) -> ::tablegen::Column<i32> { /* ... */ }
//!     pub fn department_id(&self) -> ::tablegen::Column<i32> {
//!         /* ... */.references(<Departments as ::tablegen::Table>::TABLE_NAME, "id")
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::ident;
use crate::{
    error::Error,
    metadata::{ColumnMetadata, SqlTypeRef, SqlTypeShape, TableMetadata}
};

/// Generate the table type of `table`.
pub(super) fn generate(table: &TableMetadata) -> Result<TokenStream, Error> {
    let table_type = ident(table, &table.table_type_name)?;
    let name = &table.name;
    let alias = optional_const("ALIAS", table.alias.as_deref());
    let catalog = optional_const("CATALOG", table.catalog.as_deref());
    let schema = optional_const("SCHEMA", table.schema.as_deref());

    let methods = table
        .columns
        .iter()
        .map(|column| ident(table, &column.property_name))
        .collect::<Result<Vec<_>, _>>()?;
    let accessors = table
        .columns
        .iter()
        .zip(&methods)
        .map(|(column, method)| accessor(column, method))
        .collect::<Result<Vec<_>, _>>()?;

    let doc = format!("Table `{}` of entity `{}`.", table.qualified_name(), table.entity);

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct #table_type;

        impl ::tablegen::Table for #table_type {
            const TABLE_NAME: &'static str = #name;
            #alias
            #catalog
            #schema

            fn columns(&self) -> ::std::vec::Vec<::tablegen::ColumnInfo> {
                ::std::vec![#(self.#methods().info()),*]
            }
        }

        impl #table_type {
            #(#accessors)*
        }
    })
}

fn optional_const(name: &str, value: Option<&str>) -> Option<TokenStream> {
    let name = syn::Ident::new(name, proc_macro2::Span::call_site());
    value.map(|value| {
        quote! {
            const #name: ::core::option::Option<&'static str> = ::core::option::Option::Some(#value);
        }
    })
}

fn accessor(column: &ColumnMetadata, method: &syn::Ident) -> Result<TokenStream, Error> {
    let name = &column.name;
    let value_type = &column.sql_type.value_type;
    let sql_type = sql_type_expr(&column.sql_type);
    let primary_key = column.primary_key.then(|| quote!(.primary_key()));
    let nullable = column.nullable.then(|| quote!(.nullable()));
    let reference = match &column.reference {
        Some(reference) => {
            let target = ident(&reference.table, &reference.table.table_type_name)?;
            let key = &reference.primary_key_column().name;
            Some(quote!(.references(<#target as ::tablegen::Table>::TABLE_NAME, #key)))
        }
        None => None
    };
    let doc = format!("Column `{name}`.");

    Ok(quote! {
        #[doc = #doc]
        #[must_use]
        pub fn #method(&self) -> ::tablegen::Column<#value_type> {
            ::tablegen::Column::<#value_type>::new(<Self as ::tablegen::Table>::TABLE_NAME, #name, #sql_type)
                #primary_key
                #nullable
                #reference
        }
    })
}

/// Expression producing the `Arc<dyn SqlType<T>>` of a column.
pub(super) fn sql_type_expr(sql_type: &SqlTypeRef) -> TokenStream {
    let path = &sql_type.path;
    let value_type = &sql_type.value_type;
    match sql_type.shape {
        SqlTypeShape::Fixed => quote!(::std::sync::Arc::new(#path)),
        SqlTypeShape::Factory => {
            quote!(::tablegen::SqlTypeFactory::create_sql_type::<#value_type>(&#path))
        }
    }
}
