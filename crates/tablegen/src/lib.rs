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

//! Table definitions, entity records and named-argument constructors
//! generated from entity declarations.
//!
//! # Quick Navigation
//!
//! - **Markers**: [`table`](macro@table), [`tablegen_config`](macro@tablegen_config)
//! - **Runtime**: [`Table`], [`Column`], [`EntityRecord`], [`Database`]
//! - **Build scripts**: `build` module (feature `build`)
//!
//! # Declaring Entities
//!
//! ```rust,ignore
//! use tablegen::{Entity, table};
//!
//! #[table]
//! pub trait Department: Entity {
//!     #[primary_key]
//!     fn id(&self) -> i32;
//!     fn name(&self) -> String;
//! }
//!
//! #[table(schema = "hr")]
//! pub trait Employee: Entity {
//!     #[primary_key]
//!     fn id(&self) -> i32;
//!     fn name(&self) -> String;
//!     fn manager(&self) -> Option<String>;
//!     #[references]
//!     fn department(&self) -> Box<dyn Department>;
//! }
//! ```
//!
//! # Generating
//!
//! A build script generates the code into `OUT_DIR` and rewrites the files
//! calling the generated constructors:
//!
//! ```rust,ignore
//! // build.rs
//! use tablegen::build::{CodegenOptions, Generator, SourceUnit, rewrite_file};
//!
//! let unit = SourceUnit::from_files("src".as_ref(), ["src/model.rs"])?;
//! let code = Generator::new(CodegenOptions::default()).generate(&unit, "crate::generated")?;
//! code.write_to(&out.join("tablegen.rs"))?;
//! rewrite_file(&code.registry(), "src".as_ref(), "src/app.rs".as_ref(), &out.join("app.rs"))?;
//! ```
//!
//! ```rust,ignore
//! // lib.rs
//! pub mod generated {
//!     include!(concat!(env!("OUT_DIR"), "/tablegen.rs"));
//! }
//! pub mod app {
//!     include!(concat!(env!("OUT_DIR"), "/app.rs"));
//! }
//! ```
//!
//! # Calling Constructors
//!
//! Constructors take any subset of their arguments, by name:
//!
//! ```rust,ignore
//! let ann = generated::Employee(id = 1, name = "Ann".to_string(), department = research);
//! assert_eq!(ann.manager(), None);
//! ```
//!
//! | Written | Compiled |
//! |---------|----------|
//! | `Employee(id = 1)` | `__impl_Employee(Some(1), None, None, None, 1u32)` |
//! | `Employee(id = 1, manager = None)` | `__impl_Employee(Some(1), None, None, None, 5u32)` |
//!
//! # Generated Code
//!
//! | Item | Entities |
//! |------|----------|
//! | `Employees: Table` with one `Column<T>` accessor per column | all |
//! | `EmployeesSequence::employees` on every [`Database`] | all |
//! | `EmployeeRecord` with getters, setters and key helpers | trait |
//! | `Employee(..)` / `__impl_Employee(..)` | trait |
//! | `into_record` / `from_record` | struct |

pub use tablegen_core::{
    Column, ColumnInfo, Database, Entity, EntityRecord, EntitySequence, ReferenceBinding, SqlType,
    SqlTypeFactory, Table, prelude, types
};
pub use tablegen_macros::{implementation_fn, table, tablegen_config, virtual_fn};

/// Build script entry points.
#[cfg(feature = "build")]
#[cfg_attr(docsrs, doc(cfg(feature = "build")))]
pub mod build {
    pub use tablegen_codegen::{
        CallSiteRewriter, CodegenOptions, Error, GeneratedCode, Generator, NamingStrategyRegistry,
        RewriteReport, SignatureRegistry, SourceUnit, rewrite_file, rewrite_source
    };
    pub use tablegen_codegen::{naming, rewrite};
}
