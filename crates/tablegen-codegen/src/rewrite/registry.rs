// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Virtual functions known to the rewriter.
//!
//! Entries are keyed by container, the module or `impl` block declaring the
//! function. A virtual function is rewritable only once an implementation
//! with a conforming signature is registered in the same container.

use std::collections::BTreeMap;

use syn::{ImplItem, Item, Signature, Type};
use tracing::{debug, warn};

use crate::{
    parse::is_marker,
    resolve::path_string,
    signature::{FunctionSignaturePair, IMPLEMENTATION_PREFIX, VirtualFunction}
};

/// Marker on virtual functions.
pub const VIRTUAL_MARKER: &str = "virtual_fn";

/// Marker on implementation functions.
pub const IMPLEMENTATION_MARKER: &str = "implementation_fn";

/// Container and name of a virtual function.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionKey {
    /// Declaring module or `impl` block.
    pub container: String,
    /// Virtual function name.
    pub name:      String
}

impl FunctionKey {
    /// Key of `name` in `container`.
    #[must_use]
    pub fn new(container: &str, name: &str) -> Self {
        Self {
            container: container.to_string(),
            name:      name.to_string()
        }
    }
}

/// Outcome of looking up a call target.
#[derive(Debug)]
pub enum Resolution<'r> {
    /// Rewrite with this pair.
    Pair(&'r FunctionSignaturePair),
    /// A virtual function without an implementation.
    Unpaired(&'r FunctionKey),
    /// Virtual functions of that name in several containers.
    Ambiguous(Vec<&'r FunctionKey>),
    /// Methods of that name whose receiver type cannot be confirmed.
    Unverified(Vec<&'r FunctionKey>),
    /// Not a virtual function.
    NotVirtual
}

/// Virtual functions and implementations, by container.
///
/// # Example
///
/// ```rust
/// use tablegen_codegen::rewrite::{Resolution, SignatureRegistry};
///
/// let file: syn::File = syn::parse_str(r#"
///     #[virtual_fn]
///     pub fn Point(x: i32, y: i32) -> Point { unreachable!() }
///     #[implementation_fn]
///     pub fn __impl_Point(x: Option<i32>, y: Option<i32>, flag: u32) -> Point { todo!() }
/// "#).unwrap();
///
/// let mut registry = SignatureRegistry::new();
/// registry.scan_file("crate::shapes", &file);
///
/// let path: syn::Path = syn::parse_str("Point").unwrap();
/// assert!(matches!(registry.resolve_function(&path, "crate"), Resolution::Pair(_)));
/// ```
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    virtuals:        BTreeMap<FunctionKey, VirtualFunction>,
    implementations: BTreeMap<FunctionKey, Signature>,
    pairs:           BTreeMap<FunctionKey, FunctionSignaturePair>
}

impl SignatureRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding already derived pairs.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = FunctionSignaturePair>
    {
        let mut registry = Self::new();
        for pair in pairs {
            registry.insert_pair(pair);
        }
        registry
    }

    /// Register a virtual function together with its implementation.
    pub fn insert_pair(&mut self, pair: FunctionSignaturePair) {
        let key = FunctionKey::new(&pair.virtual_fn.container, &pair.virtual_fn.name.to_string());
        self.virtuals
            .insert(key.clone(), pair.virtual_fn.clone());
        self.pairs.insert(key, pair);
    }

    /// Register a virtual function.
    pub fn insert_virtual(&mut self, virtual_fn: VirtualFunction) {
        let key = FunctionKey::new(&virtual_fn.container, &virtual_fn.name.to_string());
        self.virtuals.insert(key.clone(), virtual_fn);
        self.link(&key);
    }

    /// Register an implementation declared in `container`.
    ///
    /// Names without the `__impl_` prefix are ignored.
    pub fn insert_implementation(&mut self, container: &str, signature: Signature) {
        let ident = signature.ident.to_string();
        let Some(name) = ident.strip_prefix(IMPLEMENTATION_PREFIX) else {
            warn!(container, function = %ident, "implementation name lacks the `__impl_` prefix");
            return;
        };
        let key = FunctionKey::new(container, name);
        self.implementations
            .insert(key.clone(), signature);
        self.link(&key);
    }

    fn link(&mut self, key: &FunctionKey) {
        let (Some(virtual_fn), Some(signature)) =
            (self.virtuals.get(key), self.implementations.get(key))
        else {
            return;
        };
        let pair = FunctionSignaturePair::from_virtual(virtual_fn.clone());
        if pair.implementation.conforms(signature) {
            debug!(container = %key.container, function = %key.name, "virtual function paired");
            self.pairs.insert(key.clone(), pair);
        } else {
            warn!(
                container = %key.container,
                function = %key.name,
                "implementation signature does not match its virtual function"
            );
            self.pairs.remove(key);
        }
    }

    /// Register the marked functions of `file`, declared in module
    /// `container`.
    ///
    /// Inline modules and `impl` blocks open nested containers.
    pub fn scan_file(&mut self, container: &str, file: &syn::File) {
        self.scan_items(container, &file.items);
    }

    fn scan_items(&mut self, container: &str, items: &[Item]) {
        for item in items {
            match item {
                Item::Fn(function) => self.scan_function(container, &function.attrs, &function.sig),
                Item::Mod(module) => {
                    if let Some((_, content)) = &module.content {
                        self.scan_items(&format!("{container}::{}", module.ident), content);
                    }
                }
                Item::Impl(block) => {
                    let Type::Path(self_ty) = &*block.self_ty else {
                        continue;
                    };
                    let nested = format!("{container}::{}", path_string(&self_ty.path));
                    for member in &block.items {
                        if let ImplItem::Fn(function) = member {
                            self.scan_function(&nested, &function.attrs, &function.sig);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn scan_function(&mut self, container: &str, attrs: &[syn::Attribute], sig: &Signature) {
        if attrs.iter().any(|a| is_marker(a, VIRTUAL_MARKER)) {
            self.insert_virtual(VirtualFunction::from_signature(container, sig));
        } else if attrs.iter().any(|a| is_marker(a, IMPLEMENTATION_MARKER)) {
            self.insert_implementation(container, sig.clone());
        }
    }

    /// Every rewritable pair.
    pub fn pairs(&self) -> impl Iterator<Item = &FunctionSignaturePair> {
        self.pairs.values()
    }

    /// Pair registered under `key`.
    #[must_use]
    pub fn pair(&self, key: &FunctionKey) -> Option<&FunctionSignaturePair> {
        self.pairs.get(key)
    }

    /// Number of registered virtual functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.virtuals.len()
    }

    /// Is nothing registered?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.virtuals.is_empty()
    }

    /// Resolve a call through `path`, written in module `from_module`.
    ///
    /// - `crate::a::F` names container `crate::a` exactly
    /// - `self::` and `super::` are relative to `from_module`
    /// - other qualified paths match containers by suffix, preferring one
    ///   under `from_module`
    /// - a bare name prefers `from_module`, then a unique match anywhere
    #[must_use]
    pub fn resolve_function(&self, path: &syn::Path, from_module: &str) -> Resolution<'_> {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let Some((name, qualifier)) = segments.split_last() else {
            return Resolution::NotVirtual;
        };

        let candidates: Vec<&FunctionKey> = self
            .virtuals
            .iter()
            .filter(|(key, function)| key.name == *name && !function.receiver)
            .map(|(key, _)| key)
            .collect();

        let chosen = match qualifier {
            [] => prefer(candidates, from_module),
            [first, ..] if first == "crate" => exact(candidates, &qualifier.join("::")),
            [first, ..] if first == "self" || first == "super" => {
                match relative_container(from_module, qualifier) {
                    Some(container) => exact(candidates, &container),
                    None => Vec::new()
                }
            }
            _ => {
                let suffixed: Vec<&FunctionKey> = candidates
                    .into_iter()
                    .filter(|key| ends_with(&key.container, qualifier))
                    .collect();
                let local = format!("{from_module}::{}", qualifier.join("::"));
                match suffixed.iter().find(|key| key.container == local) {
                    Some(key) => vec![*key],
                    None => suffixed
                }
            }
        };
        self.outcome(chosen)
    }

    /// Resolve a call of `method`.
    ///
    /// The name alone says nothing about the receiver. A method declared in
    /// `self_container`, the `impl` block around a call on `self`, is taken
    /// as is. Otherwise the call must pass at least one `name = value`
    /// argument (`named`); a plain call of a method that merely shares the
    /// name is [`Resolution::Unverified`].
    #[must_use]
    pub fn resolve_method(
        &self,
        method: &syn::Ident,
        self_container: Option<&str>,
        named: bool
    ) -> Resolution<'_> {
        let candidates: Vec<&FunctionKey> = self
            .virtuals
            .iter()
            .filter(|(key, function)| function.receiver && method == &key.name)
            .map(|(key, _)| key)
            .collect();
        if candidates.is_empty() {
            return Resolution::NotVirtual;
        }

        if let Some(container) = self_container {
            let own = exact(candidates.clone(), container);
            if !own.is_empty() {
                return self.outcome(own);
            }
        }
        if named {
            self.outcome(candidates)
        } else {
            Resolution::Unverified(candidates)
        }
    }

    fn outcome<'r>(&'r self, chosen: Vec<&'r FunctionKey>) -> Resolution<'r> {
        match chosen.as_slice() {
            [] => Resolution::NotVirtual,
            [key] => match self.pairs.get(*key) {
                Some(pair) => Resolution::Pair(pair),
                None => Resolution::Unpaired(key)
            },
            _ => Resolution::Ambiguous(chosen)
        }
    }
}

fn prefer<'r>(candidates: Vec<&'r FunctionKey>, from_module: &str) -> Vec<&'r FunctionKey> {
    match candidates.iter().find(|key| key.container == from_module) {
        Some(key) => vec![*key],
        None => candidates
    }
}

fn exact<'r>(candidates: Vec<&'r FunctionKey>, container: &str) -> Vec<&'r FunctionKey> {
    candidates
        .into_iter()
        .filter(|key| key.container == container)
        .collect()
}

fn ends_with(container: &str, qualifier: &[String]) -> bool {
    let segments: Vec<&str> = container.split("::").collect();
    segments.len() >= qualifier.len()
        && segments[segments.len() - qualifier.len()..]
            .iter()
            .zip(qualifier)
            .all(|(a, b)| a == b)
}

/// Resolve leading `self` / `super` segments against `module`.
fn relative_container(module: &str, qualifier: &[String]) -> Option<String> {
    let mut base: Vec<&str> = module.split("::").collect();
    let mut rest = qualifier;
    while let Some((first, tail)) = rest.split_first() {
        match first.as_str() {
            "self" => {}
            "super" => {
                base.pop();
                if base.is_empty() {
                    return None;
                }
            }
            _ => break
        }
        rest = tail;
    }
    base.extend(rest.iter().map(String::as_str));
    Some(base.join("::"))
}
