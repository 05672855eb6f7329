// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reading declarations and markers from Rust source.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (coordinator)
//! ├── attrs.rs        - darling structs for the marker attributes
//! ├── declaration.rs  - classification of items and their properties
//! └── unit.rs         - the compilation unit and path lookup
//! ```
//!
//! # Entities
//!
//! A struct entity is a plain data holder; every named field is a property.
//!
//! ```rust,ignore
//! #[table]
//! pub struct Department {
//!     #[primary_key]
//!     id:   i32,
//!     name: String
//! }
//! ```
//!
//! A trait entity extends `Entity`. Its abstract getters are the properties,
//! and a property is mutable when a matching abstract `set_` method exists.
//!
//! ```rust,ignore
//! #[table]
//! pub trait Employee: Entity {
//!     #[primary_key]
//!     fn id(&self) -> i32;
//!     fn name(&self) -> String;
//!     fn set_name(&mut self, value: String);
//!     #[references]
//!     fn department(&self) -> Box<dyn Department>;
//! }
//! ```

mod attrs;
mod declaration;
mod unit;

pub use attrs::{
    ColumnAttrs, ConfigAttrs, IgnoreList, PROPERTY_MARKERS, ReferenceAttrs, TableAttrs, is_marker
};
pub use declaration::{
    ClassShape, Declaration, DeclarationKey, DeclarationShape, InterfaceShape, ItemKind,
    PropertyDecl
};
pub use unit::{ConfigMarker, Lookup, SourceUnit, SqlTypeImpl, module_path_for};
