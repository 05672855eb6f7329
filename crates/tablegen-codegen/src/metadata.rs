// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved schema model.
//!
//! A [`TableMetadata`] is produced once per `#[table]` declaration and
//! shared through [`Rc`]: every reference to the same declaration points at
//! the same instance.
//!
//! ```text
//! TableMetadata (employee)
//! ├── ColumnMetadata id            PRIMARY KEY
//! ├── ColumnMetadata name
//! └── ColumnMetadata department_id
//!     └── ReferenceMetadata ──► TableMetadata (department)
//!                               └── ColumnMetadata id  PRIMARY KEY
//! ```

use std::rc::Rc;

use proc_macro2::Span;
use syn::{Ident, Type};

use crate::parse::DeclarationKey;

/// How an entity was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Struct entity.
    Class,
    /// Trait entity.
    Interface
}

/// Capability of a SQL type singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlTypeShape {
    /// `SqlType<T>` for one value type.
    Fixed,
    /// `SqlTypeFactory`, producing a `SqlType<T>` for any `T`.
    Factory
}

/// A resolved SQL type.
#[derive(Debug, Clone)]
pub struct SqlTypeRef {
    /// Path of the singleton, usable in generated code.
    pub path:       syn::Path,
    /// Its capability.
    pub shape:      SqlTypeShape,
    /// Value type of columns with this SQL type.
    pub value_type: Type
}

/// Binding of a reference column to the referenced table.
#[derive(Debug, Clone)]
pub struct ReferenceMetadata {
    /// Referenced table.
    pub table:       Rc<TableMetadata>,
    /// Index of its primary-key column.
    pub primary_key: usize
}

impl ReferenceMetadata {
    /// The referenced primary-key column.
    #[must_use]
    pub fn primary_key_column(&self) -> &ColumnMetadata {
        &self.table.columns[self.primary_key]
    }
}

/// One column of a table.
#[derive(Debug, Clone)]
pub struct ColumnMetadata {
    /// Entity property backing the column.
    pub property:      Ident,
    /// Declared property type.
    pub property_type: Type,
    /// Column name in the database.
    pub name:          String,
    /// Accessor name in generated code.
    pub property_name: String,
    /// Part of the primary key.
    pub primary_key:   bool,
    /// SQL type of the column.
    pub sql_type:      SqlTypeRef,
    /// Writable after construction.
    pub mutable:       bool,
    /// Accepts `NULL`.
    pub nullable:      bool,
    /// Target of a reference column.
    pub reference:     Option<ReferenceMetadata>,
    /// Property span.
    pub span:          Span
}

impl ColumnMetadata {
    /// Is this a reference column?
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// The plain column that finally supplies this column's value.
    ///
    /// Follows reference chains; a plain column is bound to itself.
    #[must_use]
    pub fn bound_column(&self) -> &ColumnMetadata {
        let mut column = self;
        while let Some(reference) = &column.reference {
            column = reference.primary_key_column();
        }
        column
    }
}

/// A resolved table.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    /// Declaration the table was resolved from.
    pub key:                  DeclarationKey,
    /// Entity name.
    pub entity:               Ident,
    /// Struct or trait entity.
    pub kind:                 EntityKind,
    /// Table name, never empty.
    pub name:                 String,
    /// Table alias.
    pub alias:                Option<String>,
    /// Catalog.
    pub catalog:              Option<String>,
    /// Schema.
    pub schema:               Option<String>,
    /// Name of the generated table type.
    pub table_type_name:      String,
    /// Name of the generated sequence accessor.
    pub entity_sequence_name: String,
    /// Properties excluded by `ignore_properties`.
    pub ignored_properties:   Vec<String>,
    /// Columns, constructor parameters first.
    pub columns:              Vec<ColumnMetadata>,
    /// Declaration span.
    pub span:                 Span
}

impl TableMetadata {
    /// Primary-key columns.
    #[must_use]
    pub fn primary_keys(&self) -> Vec<&ColumnMetadata> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    /// Column by database name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column by backing property.
    #[must_use]
    pub fn column_for(&self, property: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.property == property)
    }

    /// `catalog.schema.name`, omitting absent parts.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Is this a trait entity?
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == EntityKind::Interface
    }
}
