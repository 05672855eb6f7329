// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Call-site rewriting.
//!
//! Calls to virtual functions are redirected to their implementations:
//!
//! ```text
//! Employee(id = 1, name = "Ann".into())
//!     ──► __impl_Employee(Some(1), Some("Ann".into()), None, 3u32)
//! ```
//!
//! # States
//!
//! The [`CallSiteRewriter`] walks a file in [`RewriteState::Scanning`],
//! visiting every call. A call whose target resolves to a registered pair
//! moves it to [`RewriteState::Rewriting`] until the replacement is in
//! place. Children are visited before their parent, so nested calls are
//! rewritten innermost first.
//!
//! A virtual function without a matching implementation in its container is
//! left alone; so is an unqualified call that matches virtual functions in
//! several containers. Malformed arguments to a matched function abort the
//! pass.
//!
//! A method call is rewritten only when its receiver is `self` inside the
//! `impl` block declaring the virtual method, or when it passes named
//! arguments. Any other call of a method that shares the name is kept.

mod call;
mod registry;

use proc_macro2::TokenStream;
use syn::{Expr, ItemImpl, ItemMod, ItemTrait, Type, visit_mut::VisitMut};
use tracing::{debug, trace, warn};

pub use self::{
    call::{CallArgument, CallExpr, CallTarget, Callee, RewrittenCall, rewrite_call},
    registry::{FunctionKey, IMPLEMENTATION_MARKER, Resolution, SignatureRegistry, VIRTUAL_MARKER}
};
use crate::{error::RewriteError, resolve::path_string};

/// Where the rewriter stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteState {
    /// Visiting calls.
    Scanning,
    /// Replacing a call to this virtual function.
    Rewriting(FunctionKey)
}

/// Counts of one rewriting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Calls redirected to an implementation.
    pub rewritten: usize,
    /// Calls to virtual functions without an implementation.
    pub unpaired:  usize,
    /// Calls matching several virtual functions, or method calls whose
    /// receiver type could not be confirmed.
    pub ambiguous: usize
}

impl RewriteReport {
    /// Calls to virtual functions left as written.
    #[must_use]
    pub fn untouched(&self) -> usize {
        self.unpaired + self.ambiguous
    }
}

/// Rewrites the calls of one file.
///
/// # Example
///
/// ```rust
/// use quote::ToTokens;
/// use tablegen_codegen::rewrite::{CallSiteRewriter, SignatureRegistry};
///
/// let generated: syn::File = syn::parse_str(r#"
///     #[virtual_fn]
///     pub fn Point(x: i32, y: i32) -> Point { unreachable!() }
///     #[implementation_fn]
///     pub fn __impl_Point(x: Option<i32>, y: Option<i32>, flag: u32) -> Point { todo!() }
/// "#).unwrap();
/// let mut registry = SignatureRegistry::new();
/// registry.scan_file("crate::generated", &generated);
///
/// let mut file: syn::File = syn::parse_str("fn main() { let p = Point(y = 2); }").unwrap();
/// let report = CallSiteRewriter::new(&registry, "crate").rewrite_file(&mut file).unwrap();
/// assert_eq!(report.rewritten, 1);
/// assert!(file.to_token_stream().to_string().contains("__impl_Point"));
/// ```
#[derive(Debug)]
pub struct CallSiteRewriter<'r> {
    registry: &'r SignatureRegistry,
    modules:  Vec<String>,
    impls:    Vec<Option<String>>,
    state:    RewriteState,
    report:   RewriteReport,
    error:    Option<RewriteError>
}

impl<'r> CallSiteRewriter<'r> {
    /// Rewriter for a file that is module `module`.
    #[must_use]
    pub fn new(registry: &'r SignatureRegistry, module: &str) -> Self {
        Self {
            registry,
            modules: vec![module.to_string()],
            impls: Vec::new(),
            state: RewriteState::Scanning,
            report: RewriteReport::default(),
            error: None
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &RewriteState {
        &self.state
    }

    /// Rewrite every call in `file`.
    ///
    /// # Errors
    ///
    /// The first [`RewriteError`] met; the file is left partially rewritten.
    pub fn rewrite_file(mut self, file: &mut syn::File) -> Result<RewriteReport, RewriteError> {
        self.visit_file_mut(file);
        self.finish()
    }

    /// Rewrite every call in `expr`, including `expr` itself.
    ///
    /// # Errors
    ///
    /// The first [`RewriteError`] met.
    pub fn rewrite_expr(mut self, expr: &mut Expr) -> Result<RewriteReport, RewriteError> {
        self.visit_expr_mut(expr);
        self.finish()
    }

    fn finish(self) -> Result<RewriteReport, RewriteError> {
        match self.error {
            Some(err) => Err(err),
            None => {
                debug!(
                    rewritten = self.report.rewritten,
                    untouched = self.report.untouched(),
                    "call sites rewritten"
                );
                Ok(self.report)
            }
        }
    }

    fn module(&self) -> &str {
        self.modules.last().map_or("crate", String::as_str)
    }

    fn rewrite_in_place(&mut self, expr: &mut Expr) {
        let registry = self.registry;
        let resolution = match CallExpr::target(expr) {
            Some(CallTarget::Function(path)) => registry.resolve_function(path, self.module()),
            Some(CallTarget::Method {
                receiver,
                method,
                named
            }) => {
                let on_self = matches!(receiver, Expr::Path(path) if path.path.is_ident("self"));
                let self_container = self.impls.last().and_then(Option::as_deref).filter(|_| on_self);
                registry.resolve_method(method, self_container, named)
            }
            None => return
        };

        let pair = match resolution {
            Resolution::Pair(pair) => pair,
            Resolution::NotVirtual => return,
            Resolution::Unpaired(key) => {
                trace!(container = %key.container, function = %key.name, "no implementation, call kept");
                self.report.unpaired += 1;
                return;
            }
            Resolution::Ambiguous(keys) => {
                let containers: Vec<&str> = keys.iter().map(|k| k.container.as_str()).collect();
                warn!(
                    module = self.module(),
                    ?containers,
                    "call matches several virtual functions, call kept"
                );
                self.report.ambiguous += 1;
                return;
            }
            Resolution::Unverified(keys) => {
                let containers: Vec<&str> = keys.iter().map(|k| k.container.as_str()).collect();
                debug!(
                    module = self.module(),
                    ?containers,
                    "receiver type unknown, method call kept"
                );
                self.report.ambiguous += 1;
                return;
            }
        };

        self.state = RewriteState::Rewriting(FunctionKey::new(
            &pair.virtual_fn.container,
            &pair.virtual_fn.name.to_string()
        ));
        let original = std::mem::replace(expr, Expr::Verbatim(TokenStream::new()));
        *expr = match CallExpr::try_from(original) {
            Ok(call) => match rewrite_call(call, pair, self.module()) {
                Ok(rewritten) => {
                    trace!(state = ?self.state, flags = ?rewritten.flags, "call rewritten");
                    self.report.rewritten += 1;
                    rewritten.expr
                }
                Err(err) => {
                    self.error = Some(err);
                    Expr::Verbatim(TokenStream::new())
                }
            },
            Err(untouched) => untouched
        };
        self.state = RewriteState::Scanning;
    }
}

impl VisitMut for CallSiteRewriter<'_> {
    fn visit_item_mod_mut(&mut self, module: &mut ItemMod) {
        let nested = format!("{}::{}", self.module(), module.ident);
        self.modules.push(nested);
        syn::visit_mut::visit_item_mod_mut(self, module);
        self.modules.pop();
    }

    fn visit_item_impl_mut(&mut self, item: &mut ItemImpl) {
        let container = match &*item.self_ty {
            Type::Path(self_ty) if self_ty.qself.is_none() => {
                Some(format!("{}::{}", self.module(), path_string(&self_ty.path)))
            }
            _ => None
        };
        self.impls.push(container);
        syn::visit_mut::visit_item_impl_mut(self, item);
        self.impls.pop();
    }

    fn visit_item_trait_mut(&mut self, item: &mut ItemTrait) {
        self.impls.push(None);
        syn::visit_mut::visit_item_trait_mut(self, item);
        self.impls.pop();
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        syn::visit_mut::visit_expr_mut(self, expr);
        if self.error.is_none() {
            self.rewrite_in_place(expr);
        }
    }
}
