// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[virtual_fn]` and `#[implementation_fn]`.
//!
//! Both are read back from the sources by the build script; the expansion
//! only checks where they are placed.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Item, ItemFn};
use tablegen_codegen::{
    rewrite::{IMPLEMENTATION_MARKER, VIRTUAL_MARKER},
    signature::IMPLEMENTATION_PREFIX
};

pub fn expand_virtual(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let function = function(VIRTUAL_MARKER, &attr, item)?;
    Ok(function.into_token_stream())
}

pub fn expand_implementation(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let function = function(IMPLEMENTATION_MARKER, &attr, item)?;
    if !function
        .sig
        .ident
        .to_string()
        .starts_with(IMPLEMENTATION_PREFIX)
    {
        return Err(syn::Error::new_spanned(
            &function.sig.ident,
            format!("#[{IMPLEMENTATION_MARKER}] functions are named `{IMPLEMENTATION_PREFIX}<virtual name>`")
        ));
    }
    Ok(function.into_token_stream())
}

fn function(marker: &str, attr: &TokenStream, item: TokenStream) -> syn::Result<ItemFn> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            format!("#[{marker}] takes no arguments")
        ));
    }
    match syn::parse2::<Item>(item)? {
        Item::Fn(function) => Ok(function),
        other => Err(syn::Error::new_spanned(
            other,
            format!("#[{marker}] applies to functions with a body")
        ))
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn functions_pass_through() {
        let item = quote!(pub fn Employee(id: i32) -> EmployeeRecord { unreachable!() });
        let expanded = expand_virtual(TokenStream::new(), item.clone()).unwrap();
        assert_eq!(expanded.to_string(), item.to_string());

        let method = quote!(pub fn with(&self, job: String) -> Self { unreachable!() });
        assert!(expand_virtual(TokenStream::new(), method).is_ok());
    }

    #[test]
    fn misplaced_markers_fail() {
        assert!(expand_virtual(TokenStream::new(), quote!(struct Employee;)).is_err());
        assert!(expand_virtual(quote!(strict), quote!(fn f() {})).is_err());
    }

    #[test]
    fn implementation_names_are_prefixed() {
        let good = quote!(pub fn __impl_Employee(id: Option<i32>, flag: u32) {});
        assert!(expand_implementation(TokenStream::new(), good).is_ok());

        let bad = quote!(pub fn build(id: Option<i32>, flag: u32) {});
        let err = expand_implementation(TokenStream::new(), bad).unwrap_err();
        assert!(err.to_string().contains("__impl_"));
    }
}
