// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Virtual functions and their implementations.
//!
//! A virtual function has one optional parameter per entity property and is
//! never executed. Its implementation takes every parameter as `Option`,
//! followed by the flag words of a [`BitmaskEncoding`]:
//!
//! ```text
//! fn Employee(id: i32, name: String, job: Option<String>) -> EmployeeRecord
//!                 │           │                │
//!                 ▼           ▼                ▼
//! fn __impl_Employee(id: Option<i32>, name: Option<String>, job: Option<String>, flag: u32)
//! ```
//!
//! A parameter that is already an `Option` is passed through unchanged, so
//! its flag bit is the only way to tell an explicit `None` from an omitted
//! argument.

use proc_macro2::Span;
use syn::{FnArg, Ident, Pat, ReturnType, Signature, Type, parse_quote};

use crate::{bitmask::BitmaskEncoding, resolve::strip_option};

/// Prefix of implementation function names.
pub const IMPLEMENTATION_PREFIX: &str = "__impl_";

/// A named, typed parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name.
    pub name: Ident,
    /// Declared type.
    pub ty:   Type
}

/// A parameter of an implementation function.
#[derive(Debug, Clone)]
pub struct ImplementationParameter {
    /// Parameter name.
    pub name:    Ident,
    /// Nullable type.
    pub ty:      Type,
    /// The virtual type was wrapped in `Option` to build `ty`.
    pub wrapped: bool
}

/// Signature of a virtual function.
#[derive(Debug, Clone)]
pub struct VirtualFunction {
    /// Function name.
    pub name:       Ident,
    /// Module or `impl` block path declaring it.
    pub container:  String,
    /// Takes `self`, called with method syntax.
    pub receiver:   bool,
    /// Optional parameters, in order.
    pub parameters: Vec<Parameter>,
    /// Return type.
    pub output:     ReturnType
}

impl VirtualFunction {
    /// Read a virtual function from its signature.
    #[must_use]
    pub fn from_signature(container: &str, sig: &Signature) -> Self {
        Self {
            name:       sig.ident.clone(),
            container:  container.to_string(),
            receiver:   sig.receiver().is_some(),
            parameters: typed_parameters(sig),
            output:     sig.output.clone()
        }
    }

    /// Index of the parameter named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}

/// Signature of an implementation function.
#[derive(Debug, Clone)]
pub struct ImplementationFunction {
    /// Function name, `__impl_` followed by the virtual name.
    pub name:       Ident,
    /// Nullable parameters, in virtual order.
    pub parameters: Vec<ImplementationParameter>,
    /// Trailing flag parameter names.
    pub flags:      Vec<Ident>,
    /// Flag layout.
    pub encoding:   BitmaskEncoding
}

impl ImplementationFunction {
    /// Does `sig` have the shape derived from `virtual_fn`?
    ///
    /// Checks the name and the parameter count, including flag words.
    #[must_use]
    pub fn conforms(&self, sig: &Signature) -> bool {
        sig.ident == self.name
            && typed_parameters(sig).len() == self.parameters.len() + self.flags.len()
    }
}

/// A virtual function and the implementation its calls are redirected to.
#[derive(Debug, Clone)]
pub struct FunctionSignaturePair {
    /// The declared function.
    pub virtual_fn:     VirtualFunction,
    /// The generated implementation.
    pub implementation: ImplementationFunction
}

impl FunctionSignaturePair {
    /// Derive the implementation of `virtual_fn`.
    #[must_use]
    pub fn from_virtual(virtual_fn: VirtualFunction) -> Self {
        let encoding = BitmaskEncoding::new(virtual_fn.parameters.len());
        let parameters = virtual_fn
            .parameters
            .iter()
            .map(|p| {
                let (_, nullable) = strip_option(&p.ty);
                let declared = &p.ty;
                ImplementationParameter {
                    name:    p.name.clone(),
                    ty:      if nullable {
                        declared.clone()
                    } else {
                        parse_quote!(::core::option::Option<#declared>)
                    },
                    wrapped: !nullable
                }
            })
            .collect();
        let flags = encoding
            .flag_names()
            .iter()
            .map(|name| Ident::new(name, Span::call_site()))
            .collect();
        Self {
            implementation: ImplementationFunction {
                name: implementation_name(&virtual_fn.name),
                parameters,
                flags,
                encoding
            },
            virtual_fn
        }
    }

    /// Flag layout of the pair.
    #[must_use]
    pub fn encoding(&self) -> BitmaskEncoding {
        self.implementation.encoding
    }
}

/// `__impl_` + `name`, at the span of `name`.
#[must_use]
pub fn implementation_name(name: &Ident) -> Ident {
    Ident::new(&format!("{IMPLEMENTATION_PREFIX}{name}"), name.span())
}

fn typed_parameters(sig: &Signature) -> Vec<Parameter> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(typed) => match &*typed.pat {
                Pat::Ident(pat) => Some(Parameter {
                    name: pat.ident.clone(),
                    ty:   (*typed.ty).clone()
                }),
                _ => None
            },
            FnArg::Receiver(_) => None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;

    use super::*;

    fn employee() -> VirtualFunction {
        let sig: Signature = parse_quote! {
            fn Employee(id: i32, name: String, manager: Option<String>) -> EmployeeRecord
        };
        VirtualFunction::from_signature("crate::generated", &sig)
    }

    #[test]
    fn implementation_parameters_are_nullable() {
        let pair = FunctionSignaturePair::from_virtual(employee());
        let implementation = &pair.implementation;
        assert_eq!(implementation.name, "__impl_Employee");

        let types: Vec<String> = implementation
            .parameters
            .iter()
            .map(|p| p.ty.to_token_stream().to_string())
            .collect();
        assert!(types[0].contains("Option < i32 >"));
        assert_eq!(types[2], "Option < String >");
        assert!(implementation.parameters[0].wrapped);
        assert!(!implementation.parameters[2].wrapped);
    }

    #[test]
    fn single_flag_word() {
        let pair = FunctionSignaturePair::from_virtual(employee());
        let flags: Vec<String> = pair.implementation.flags.iter().map(ToString::to_string).collect();
        assert_eq!(flags, ["flag"]);
        assert_eq!(pair.encoding().word_count(), 1);
    }

    #[test]
    fn many_flag_words() {
        let params = (0..33).map(|i| {
            let name = Ident::new(&format!("p{i}"), Span::call_site());
            quote::quote!(#name: i32)
        });
        let sig: Signature = parse_quote!(fn Wide(#(#params),*) -> Wide);
        let pair = FunctionSignaturePair::from_virtual(VirtualFunction::from_signature("crate", &sig));
        let flags: Vec<String> = pair.implementation.flags.iter().map(ToString::to_string).collect();
        assert_eq!(flags, ["flag1", "flag2"]);
    }

    #[test]
    fn receiver_and_conformance() {
        let sig: Signature = parse_quote!(fn with_job(&self, job: String) -> Self);
        let virtual_fn = VirtualFunction::from_signature("crate::Builder", &sig);
        assert!(virtual_fn.receiver);
        assert_eq!(virtual_fn.position("job"), Some(0));

        let pair = FunctionSignaturePair::from_virtual(virtual_fn);
        let good: Signature =
            parse_quote!(fn __impl_with_job(&self, job: Option<String>, flag: u32) -> Self);
        let bad: Signature = parse_quote!(fn __impl_with_job(&self, job: Option<String>) -> Self);
        assert!(pair.implementation.conforms(&good));
        assert!(!pair.implementation.conforms(&bad));
    }
}
