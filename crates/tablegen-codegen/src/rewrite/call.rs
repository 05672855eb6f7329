// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rewriting a single call.
//!
//! [`rewrite_call`] is a pure transform: it sees one [`CallExpr`] and the
//! [`FunctionSignaturePair`] it targets, and produces the implementation
//! call. Finding calls and looking up signatures is the job of the
//! [`CallSiteRewriter`](super::CallSiteRewriter).
//!
//! # Evaluation Order
//!
//! Arguments are forwarded positionally, in parameter order. When the call
//! site already supplies them in that order, the expressions are moved as
//! they are. Otherwise every supplied argument is bound by a `match` on a
//! tuple written in call-site order:
//!
//! ```text
//! Employee(name = next_name(), id = next_id())
//!
//! match (next_name(), next_id(),) {
//!     (__tablegen_name, __tablegen_id,) => {
//!         __impl_Employee(Some(__tablegen_id), Some(__tablegen_name), None, 3u32)
//!     }
//! }
//! ```
//!
//! Temporaries created in the scrutinee live until the end of the `match`,
//! so `Employee(name = &make(), id = 1)` still borrows the same value it did
//! before. A method receiver that is not a plain place expression is bound
//! ahead of the arguments, as it would have been evaluated first.
//!
//! # Callee Path
//!
//! A call written through a path keeps that path with the last segment
//! swapped. A bare name is only valid for the implementation inside the
//! container that declares it; from any other module the container path is
//! spelled out, since the `use` that brought the virtual function into scope
//! does not bring its implementation.

use std::collections::BTreeSet;

use proc_macro2::{Literal, Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::{
    AngleBracketedGenericArguments, Attribute, Expr, ExprAssign, ExprCall, ExprMethodCall, ExprPath,
    Ident, PathSegment, parse_quote, punctuated::Punctuated, spanned::Spanned, token::Comma
};

use crate::{
    error::RewriteError,
    signature::{FunctionSignaturePair, VirtualFunction}
};

/// What a call invokes.
#[derive(Debug, Clone)]
pub enum Callee {
    /// `path(args)`.
    Function(ExprPath),
    /// `receiver.method::<turbofish>(args)`.
    Method {
        /// Receiver expression.
        receiver:  Box<Expr>,
        /// Method name.
        method:    Ident,
        /// Explicit generic arguments.
        turbofish: Option<AngleBracketedGenericArguments>
    }
}

/// One argument as written at the call site.
#[derive(Debug, Clone)]
pub enum CallArgument {
    /// `value`
    Positional(Expr),
    /// `name = value`
    Named {
        /// Parameter name.
        name:  Ident,
        /// Argument expression.
        value: Expr
    }
}

impl CallArgument {
    fn from_expr(expr: Expr) -> Self {
        match expr {
            Expr::Assign(assign) => match argument_name(&assign) {
                Some(name) => Self::Named {
                    name,
                    value: *assign.right
                },
                None => Self::Positional(Expr::Assign(assign))
            },
            other => Self::Positional(other)
        }
    }

    fn span(&self) -> Span {
        match self {
            Self::Positional(value) => value.span(),
            Self::Named {
                name, ..
            } => name.span()
        }
    }
}

/// `name` of a `name = value` argument.
fn argument_name(assign: &ExprAssign) -> Option<Ident> {
    if !assign.attrs.is_empty() {
        return None;
    }
    match &*assign.left {
        Expr::Path(left) if left.qself.is_none() && left.attrs.is_empty() => {
            left.path.get_ident().cloned()
        }
        _ => None
    }
}

/// A call expression split into callee and arguments.
#[derive(Debug, Clone)]
pub struct CallExpr {
    /// Outer attributes of the call.
    pub attrs:     Vec<Attribute>,
    /// Called function or method.
    pub callee:    Callee,
    /// Arguments in call-site order.
    pub arguments: Vec<CallArgument>,
    /// Span of the whole call.
    pub span:      Span
}

/// Target of a call expression, without taking it apart.
#[derive(Debug, Clone, Copy)]
pub enum CallTarget<'a> {
    /// Function called through a path.
    Function(&'a syn::Path),
    /// Method called on a receiver.
    Method {
        /// Receiver expression.
        receiver: &'a Expr,
        /// Method name.
        method:   &'a Ident,
        /// At least one argument is written as `name = value`.
        named:    bool
    }
}

impl CallExpr {
    /// What `expr` calls, if it is a call at all.
    #[must_use]
    pub fn target(expr: &Expr) -> Option<CallTarget<'_>> {
        match expr {
            Expr::Call(call) => match &*call.func {
                Expr::Path(path) if path.qself.is_none() => Some(CallTarget::Function(&path.path)),
                _ => None
            },
            Expr::MethodCall(call) => Some(CallTarget::Method {
                receiver: &call.receiver,
                method:   &call.method,
                named:    call.args.iter().any(|arg| {
                    matches!(arg, Expr::Assign(assign) if argument_name(assign).is_some())
                })
            }),
            _ => None
        }
    }
}

impl TryFrom<Expr> for CallExpr {
    type Error = Expr;

    /// Split a call; any other expression is handed back.
    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        let span = expr.span();
        match expr {
            Expr::Call(ExprCall {
                attrs,
                func,
                paren_token,
                args
            }) => match *func {
                Expr::Path(path) if path.qself.is_none() => Ok(Self {
                    attrs,
                    callee: Callee::Function(path),
                    arguments: args.into_iter().map(CallArgument::from_expr).collect(),
                    span
                }),
                func => Err(Expr::Call(ExprCall {
                    attrs,
                    func: Box::new(func),
                    paren_token,
                    args
                }))
            },
            Expr::MethodCall(call) => Ok(Self {
                attrs: call.attrs,
                callee: Callee::Method {
                    receiver:  call.receiver,
                    method:    call.method,
                    turbofish: call.turbofish
                },
                arguments: call.args.into_iter().map(CallArgument::from_expr).collect(),
                span
            }),
            other => Err(other)
        }
    }
}

/// Result of rewriting one call.
#[derive(Debug, Clone)]
pub struct RewrittenCall {
    /// The implementation call, or a `match` binding its arguments.
    pub expr:      Expr,
    /// Parameter indices written at the call site.
    pub supplied:  BTreeSet<usize>,
    /// Flag words passed to the implementation.
    pub flags:     Vec<u32>,
    /// Arguments were bound to locals to keep their evaluation order.
    pub reordered: bool
}

/// Rewrite `call`, made from `module`, into a call of the implementation in
/// `pair`.
///
/// # Errors
///
/// [`RewriteError`] if an argument names no parameter, a parameter is
/// supplied twice, a positional argument follows a named one, or there are
/// more positional arguments than parameters.
pub fn rewrite_call(
    call: CallExpr,
    pair: &FunctionSignaturePair,
    module: &str
) -> Result<RewrittenCall, RewriteError> {
    let bound = bind_arguments(&pair.virtual_fn, call.arguments)?;
    let implementation = &pair.implementation;
    let supplied: BTreeSet<usize> = bound.iter().map(|(index, _)| *index).collect();
    let flags = pair.encoding().encode(supplied.iter().copied());
    let reordered = bound.windows(2).any(|w| w[0].0 > w[1].0);

    let mut values: Vec<Expr> = Vec::new();
    let mut patterns: Vec<TokenStream> = Vec::new();
    let mut bound_receiver = false;
    let callee = match call.callee {
        Callee::Method {
            receiver,
            method: _,
            turbofish
        } => {
            let receiver = if reordered && !is_place(&receiver) {
                let local = format_ident!("__tablegen_receiver", span = Span::mixed_site());
                values.push(*receiver);
                patterns.push(quote!(mut #local));
                bound_receiver = true;
                Box::new(parse_quote!(#local))
            } else {
                receiver
            };
            Callee::Method {
                receiver,
                method: implementation.name.clone(),
                turbofish
            }
        }
        Callee::Function(mut path) => {
            path.path = implementation_path(
                path.path,
                &implementation.name,
                &pair.virtual_fn.container,
                module
            );
            Callee::Function(path)
        }
    };

    let mut slots: Vec<Option<Expr>> = vec![None; implementation.parameters.len()];
    for (index, value) in bound {
        let value = if reordered {
            let local = format_ident!(
                "__tablegen_{}",
                implementation.parameters[index].name,
                span = Span::mixed_site()
            );
            values.push(value);
            patterns.push(quote!(#local));
            parse_quote!(#local)
        } else {
            value
        };
        slots[index] = Some(value);
    }

    let mut args: Punctuated<Expr, Comma> = implementation
        .parameters
        .iter()
        .zip(slots)
        .map(|(parameter, slot)| -> Expr {
            match slot {
                Some(value) if parameter.wrapped => parse_quote!(::core::option::Option::Some(#value)),
                Some(value) => value,
                None => parse_quote!(::core::option::Option::None)
            }
        })
        .collect();
    for word in &flags {
        let word = Literal::u32_suffixed(*word);
        args.push(parse_quote!(#word));
    }

    let invocation = match callee {
        Callee::Function(path) => Expr::Call(ExprCall {
            attrs: call.attrs,
            func: Box::new(Expr::Path(path)),
            paren_token: Default::default(),
            args
        }),
        Callee::Method {
            receiver,
            method,
            turbofish
        } => Expr::MethodCall(ExprMethodCall {
            attrs: call.attrs,
            receiver,
            dot_token: Default::default(),
            method,
            turbofish,
            paren_token: Default::default(),
            args
        })
    };

    let expr = if values.is_empty() {
        invocation
    } else {
        let allow = bound_receiver.then(|| quote!(#[allow(unused_mut)]));
        parse_quote! {
            match (#(#values,)*) {
                #allow
                (#(#patterns,)*) => #invocation
            }
        }
    };

    Ok(RewrittenCall {
        expr,
        supplied,
        flags,
        reordered
    })
}

/// Path of the implementation for a call written through `path`.
fn implementation_path(
    mut path: syn::Path,
    implementation: &Ident,
    container: &str,
    module: &str
) -> syn::Path {
    let bare = path.leading_colon.is_none() && path.segments.len() == 1;
    if bare
        && container != module
        && let Ok(mut qualified) = syn::parse_str::<syn::Path>(container)
        && let Some(written) = path.segments.pop()
    {
        qualified.segments.push(PathSegment {
            ident:     implementation.clone(),
            arguments: written.into_value().arguments
        });
        return qualified;
    }
    if let Some(last) = path.segments.last_mut() {
        last.ident = implementation.clone();
    }
    path
}

/// Pair every argument with its parameter index, in call-site order.
fn bind_arguments(
    virtual_fn: &VirtualFunction,
    arguments: Vec<CallArgument>
) -> Result<Vec<(usize, Expr)>, RewriteError> {
    let function = virtual_fn.name.to_string();
    let expected = virtual_fn.parameters.len();
    let positional = arguments
        .iter()
        .filter(|a| matches!(a, CallArgument::Positional(_)))
        .count();

    let mut bound: Vec<(usize, Expr)> = Vec::with_capacity(arguments.len());
    let mut named = false;
    for (position, argument) in arguments.into_iter().enumerate() {
        let span = argument.span();
        match argument {
            CallArgument::Positional(_) if named => {
                return Err(RewriteError::PositionalAfterNamed {
                    function,
                    span
                });
            }
            CallArgument::Positional(_) if position >= expected => {
                return Err(RewriteError::TooManyArguments {
                    function,
                    expected,
                    found: positional,
                    span
                });
            }
            CallArgument::Positional(value) => bound.push((position, value)),
            CallArgument::Named {
                name,
                value
            } => {
                named = true;
                let Some(index) = virtual_fn.position(&name.to_string()) else {
                    return Err(RewriteError::UnknownParameter {
                        function,
                        name: name.to_string(),
                        span
                    });
                };
                if bound.iter().any(|(i, _)| *i == index) {
                    return Err(RewriteError::DuplicateArgument {
                        function,
                        name: name.to_string(),
                        span
                    });
                }
                bound.push((index, value));
            }
        }
    }
    Ok(bound)
}

/// Place expressions are evaluated without side effects.
fn is_place(expr: &Expr) -> bool {
    match expr {
        Expr::Path(path) => path.qself.is_none(),
        Expr::Field(field) => is_place(&field.base),
        Expr::Paren(paren) => is_place(&paren.expr),
        Expr::Reference(reference) => is_place(&reference.expr),
        _ => false
    }
}

impl ToTokens for RewrittenCall {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        self.expr.to_tokens(tokens);
    }
}
