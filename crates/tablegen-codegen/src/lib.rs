// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Metadata resolution, code generation and call-site rewriting for
//! tablegen.
//!
//! Most users should depend on `tablegen` with the `build` feature, which
//! re-exports this crate for build scripts.
//!
//! # Passes
//!
//! ```text
//! source files ──► SourceUnit ──► MetadataResolver ──► TableMetadata
//!                                                          │
//!                       SignatureRegistry ◄── GeneratedCode ◄┘
//!                              │
//! caller files ──► CallSiteRewriter ──► rewritten files
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`parse`] | Read declarations and markers into a [`SourceUnit`](parse::SourceUnit) |
//! | [`naming`] | Naming strategies and their registry |
//! | [`options`] | Compilation options and the config marker |
//! | [`resolve`] | Resolve tables, columns, SQL types and references |
//! | [`metadata`] | Resolved tables and columns |
//! | [`codegen`] | Emit table types, records and constructors |
//! | [`signature`] | Virtual functions and their implementations |
//! | [`bitmask`] | Flag words of supplied arguments |
//! | [`rewrite`] | Redirect virtual calls to implementations |
//! | [`pipeline`] | Build script entry points |
//! | [`error`] | Diagnostics |
//!
//! # Example
//!
//! ```rust
//! use tablegen_codegen::{options::CodegenOptions, parse::SourceUnit, pipeline::{Generator, rewrite_source}};
//!
//! let mut unit = SourceUnit::new();
//! unit.parse_str("crate::model", r#"
//!     #[table]
//!     pub trait Employee: Entity {
//!         #[primary_key]
//!         fn id(&self) -> i32;
//!         fn name(&self) -> String;
//!     }
//! "#).unwrap();
//!
//! let code = Generator::new(CodegenOptions::default())
//!     .generate(&unit, "crate::generated")
//!     .unwrap();
//! assert!(code.render().contains("pub struct EmployeeRecord"));
//!
//! let (rewritten, report) = rewrite_source(
//!     &code.registry(),
//!     "crate",
//!     "fn main() { let ann = generated::Employee(name = String::from(\"Ann\")); }"
//! ).unwrap();
//! assert_eq!(report.rewritten, 1);
//! assert!(rewritten.contains("__impl_Employee"));
//! ```

pub mod bitmask;
pub mod codegen;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod options;
pub mod parse;
pub mod pipeline;
pub mod resolve;
pub mod rewrite;
pub mod signature;

pub use bitmask::BitmaskEncoding;
pub use codegen::{GeneratedCode, HEADER};
pub use error::{ConfigError, Error, ErrorCategory, RewriteError};
pub use metadata::{ColumnMetadata, EntityKind, TableMetadata};
pub use naming::NamingStrategyRegistry;
pub use options::{CodegenOptions, ResolvedConfig};
pub use parse::SourceUnit;
pub use pipeline::{Generator, rewrite_file, rewrite_source};
pub use resolve::MetadataResolver;
pub use rewrite::{CallSiteRewriter, RewriteReport, SignatureRegistry};
pub use signature::FunctionSignaturePair;
