// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column definitions exposed by generated tables.

use std::{fmt, sync::Arc};

use crate::types::SqlType;

/// Foreign-key binding of a reference column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceBinding {
    /// Name of the referenced table.
    pub table:  &'static str,
    /// Primary-key column of the referenced table.
    pub column: &'static str
}

/// Type-erased column description.
///
/// Produced by [`Column::info`] and consumed by
/// [`Table::create_table_sql`](crate::Table::create_table_sql).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name in the database.
    pub name:        &'static str,
    /// SQL type name.
    pub sql_type:    &'static str,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
    /// Whether the column accepts `NULL`.
    pub nullable:    bool,
    /// Foreign-key binding for reference columns.
    pub reference:   Option<ReferenceBinding>
}

/// A typed column of a generated table.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use tablegen_core::{Column, types::IntSqlType};
///
/// let column = Column::<i32>::new("employee", "department_id", Arc::new(IntSqlType))
///     .references("department", "id");
///
/// assert_eq!(column.name(), "department_id");
/// assert_eq!(column.info().reference.map(|r| r.column), Some("id"));
/// ```
pub struct Column<T> {
    table:       &'static str,
    name:        &'static str,
    sql_type:    Arc<dyn SqlType<T>>,
    primary_key: bool,
    nullable:    bool,
    reference:   Option<ReferenceBinding>
}

impl<T: 'static> Column<T> {
    /// Create a non-null, non-key column.
    #[must_use]
    pub fn new(table: &'static str, name: &'static str, sql_type: Arc<dyn SqlType<T>>) -> Self {
        Self {
            table,
            name,
            sql_type,
            primary_key: false,
            nullable: false,
            reference: None
        }
    }

    /// Mark the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Bind the column to the primary key of another table.
    #[must_use]
    pub fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.reference = Some(ReferenceBinding {
            table,
            column
        });
        self
    }

    /// Owning table name.
    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// SQL type of the column.
    #[must_use]
    pub fn sql_type(&self) -> &dyn SqlType<T> {
        self.sql_type.as_ref()
    }

    /// Whether the column is part of the primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Whether the column accepts `NULL`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Foreign-key binding, if this is a reference column.
    #[must_use]
    pub fn reference(&self) -> Option<ReferenceBinding> {
        self.reference
    }

    /// Type-erased description of the column.
    #[must_use]
    pub fn info(&self) -> ColumnInfo {
        ColumnInfo {
            name:        self.name,
            sql_type:    self.sql_type.type_name(),
            primary_key: self.primary_key,
            nullable:    self.nullable,
            reference:   self.reference
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            table:       self.table,
            name:        self.name,
            sql_type:    Arc::clone(&self.sql_type),
            primary_key: self.primary_key,
            nullable:    self.nullable,
            reference:   self.reference
        }
    }
}

impl<T: 'static> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.table)
            .field("name", &self.name)
            .field("sql_type", &self.sql_type.type_name())
            .field("primary_key", &self.primary_key)
            .field("nullable", &self.nullable)
            .field("reference", &self.reference)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntSqlType, VarcharSqlType};

    #[test]
    fn builder_flags() {
        let column = Column::<i32>::new("employee", "id", Arc::new(IntSqlType)).primary_key();
        assert!(column.is_primary_key());
        assert!(!column.is_nullable());
        assert_eq!(column.table(), "employee");
    }

    #[test]
    fn info_carries_type_name() {
        let column = Column::<String>::new("employee", "name", Arc::new(VarcharSqlType)).nullable();
        let info = column.info();
        assert_eq!(info.sql_type, "varchar");
        assert!(info.nullable);
        assert!(info.reference.is_none());
    }

    #[test]
    fn clone_shares_sql_type() {
        let column = Column::<i32>::new("employee", "id", Arc::new(IntSqlType));
        let copy = column.clone();
        assert_eq!(copy.sql_type().type_name(), "int");
    }
}
