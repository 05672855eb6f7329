// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core traits and types for tablegen.
//!
//! This crate provides the runtime surface that tablegen generated code is
//! written against. It deliberately stops short of executing queries: tables
//! describe themselves, entities carry their values, and everything else is
//! left to whatever database layer sits on top.
//!
//! # Overview
//!
//! - [`Entity`] — Base capability every trait entity must extend
//! - [`EntityRecord`] — Property bag backing generated entity records
//! - [`Table`] / [`Column`] — Table definitions emitted per entity
//! - [`SqlType`] / [`SqlTypeFactory`] — SQL type capabilities
//! - [`Database`] / [`EntitySequence`] — Entry points for sequences
//! - [`prelude`] — Convenient re-exports
//!
//! # Usage
//!
//! Most users should depend on `tablegen`, which re-exports this crate.
//!
//! ```rust,ignore
//! use tablegen_core::prelude::*;
//!
//! let employees = Employees;
//! println!("{}", employees.create_table_sql());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod column;
mod database;
pub mod prelude;
mod record;
mod table;
pub mod types;

pub use column::{Column, ColumnInfo, ReferenceBinding};
pub use database::{Database, EntitySequence};
pub use record::EntityRecord;
pub use table::Table;
pub use types::{SqlType, SqlTypeFactory};

/// Base capability of trait entities.
///
/// A trait declared as a table must list `Entity` among its supertraits.
/// Generated records implement it by exposing their backing
/// [`EntityRecord`].
///
/// # Example
///
/// ```rust,ignore
/// #[table]
/// pub trait Employee: Entity {
///     #[primary_key]
///     fn id(&self) -> i32;
///     fn name(&self) -> String;
/// }
/// ```
pub trait Entity {
    /// The property values held by this entity.
    fn entity_record(&self) -> &EntityRecord;
}
