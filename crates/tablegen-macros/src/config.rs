// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[tablegen_config]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use tablegen_codegen::SourceUnit;

use crate::table::{MODULE, into_syn};

/// Validate the config marker; the item is returned unchanged.
pub fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let marker = if attr.is_empty() {
        quote!(#[tablegen_config])
    } else {
        quote!(#[tablegen_config(#attr)])
    };
    let file: syn::File = syn::parse2(quote!(#marker #item))?;

    let mut unit = SourceUnit::new();
    unit.add_file(MODULE, &file).map_err(into_syn)?;
    if unit.config().is_none() {
        return Err(syn::Error::new_spanned(
            &item,
            "#[tablegen_config] applies to a unit struct"
        ));
    }
    Ok(item)
}
