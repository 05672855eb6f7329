// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Code generation from resolved tables.
//!
//! # Generated Items
//!
//! | Item | Entities | Example |
//! |------|----------|---------|
//! | Table type implementing `Table` | all | `Employees` |
//! | Sequence extension trait | all | `EmployeesSequence::employees` |
//! | Record type | trait | `EmployeeRecord` |
//! | Virtual constructor and implementation | trait | `Employee` / `__impl_Employee` |
//! | `into_record` / `from_record` | struct | `Employee::into_record` |
//!
//! # Usage
//!
//! The output is meant to be written by a build script and included into a
//! module of the crate:
//!
//! ```rust,ignore
//! pub mod generated {
//!     include!(concat!(env!("OUT_DIR"), "/tablegen.rs"));
//! }
//! ```
//!
//! The including module is the container the generated functions are
//! registered under.

mod class;
mod constructor;
mod record;
mod sequence;
mod table;
#[cfg(test)]
mod tests;

use std::{collections::BTreeSet, path::Path, rc::Rc};

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;
use tracing::debug;

use crate::{
    error::Error,
    metadata::{EntityKind, TableMetadata},
    options::ResolvedConfig,
    parse::SourceUnit,
    rewrite::SignatureRegistry,
    signature::FunctionSignaturePair
};

/// First line of every generated file.
pub const HEADER: &str = "// @generated by tablegen. Do not edit.\n";

/// Output of one generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    container: String,
    tables:    Vec<Rc<TableMetadata>>,
    pairs:     Vec<FunctionSignaturePair>,
    tokens:    TokenStream
}

impl GeneratedCode {
    /// Module the code is included into.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Tables the code was generated for.
    #[must_use]
    pub fn tables(&self) -> &[Rc<TableMetadata>] {
        &self.tables
    }

    /// Virtual constructors and their implementations.
    #[must_use]
    pub fn pairs(&self) -> &[FunctionSignaturePair] {
        &self.pairs
    }

    /// The generated items.
    #[must_use]
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Registry of the generated pairs, for rewriting call sites.
    #[must_use]
    pub fn registry(&self) -> SignatureRegistry {
        SignatureRegistry::from_pairs(self.pairs.iter().cloned())
    }

    /// The generated items as a file.
    ///
    /// # Errors
    ///
    /// [`syn::Error`] if the tokens do not form a file.
    pub fn to_file(&self) -> syn::Result<syn::File> {
        syn::parse2(self.tokens.clone())
    }

    /// File contents, header included.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{HEADER}\n{}\n", self.tokens)
    }

    /// Write [`render`](Self::render) to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] naming `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        std::fs::write(path, self.render()).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source
        })?;
        debug!(path = %path.display(), tables = self.tables.len(), "generated code written");
        Ok(())
    }
}

/// Generate the items of `tables`, to be included into module `container`.
///
/// # Errors
///
/// [`Error::InvalidIdentifier`] if a configured name is not an identifier.
pub fn generate(
    tables: &[Rc<TableMetadata>],
    unit: &SourceUnit,
    config: &ResolvedConfig,
    container: &str
) -> Result<GeneratedCode, Error> {
    let mut tokens = imports(tables, container);
    let mut pairs = Vec::new();

    for table in tables {
        tokens.extend(table::generate(table)?);
        tokens.extend(sequence::generate(table)?);
        match table.kind {
            EntityKind::Interface => {
                tokens.extend(record::generate(table)?);
                let (constructor, pair) = constructor::generate(table, container);
                tokens.extend(constructor);
                pairs.push(pair);
            }
            EntityKind::Class => {
                if let Some(declaration) = unit.get(&table.key) {
                    tokens.extend(class::generate(table, declaration, config.allow_reflection)?);
                }
            }
        }
    }

    debug!(container, tables = tables.len(), pairs = pairs.len(), "code generated");
    Ok(GeneratedCode {
        container: container.to_string(),
        tables: tables.to_vec(),
        pairs,
        tokens
    })
}

/// Glob imports of every module declaring a table.
fn imports(tables: &[Rc<TableMetadata>], container: &str) -> TokenStream {
    let modules: BTreeSet<&str> = tables
        .iter()
        .map(|t| t.key.module())
        .filter(|module| *module != container)
        .collect();
    let paths = modules
        .into_iter()
        .filter_map(|module| syn::parse_str::<syn::Path>(module).ok());
    quote! {
        #(
            #[allow(unused_imports)]
            use #paths::*;
        )*
    }
}

/// `name` as an identifier spanned at the table declaration.
pub(crate) fn ident(table: &TableMetadata, name: &str) -> Result<Ident, Error> {
    let mut ident = syn::parse_str::<Ident>(name).map_err(|_| Error::InvalidIdentifier {
        declaration: table.key.to_string(),
        name:        name.to_string(),
        span:        table.span
    })?;
    ident.set_span(table.span);
    Ok(ident)
}

/// Record type of a trait entity.
pub(crate) fn record_ident(table: &TableMetadata) -> Ident {
    quote::format_ident!("{}Record", table.entity)
}
