// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table definitions and DDL rendering.

use crate::column::ColumnInfo;

/// A generated table definition.
///
/// Implemented by the `{Entities}` types tablegen emits for every entity.
///
/// # Example
///
/// ```rust
/// use tablegen_core::{ColumnInfo, Table};
///
/// struct Departments;
///
/// impl Table for Departments {
///     const TABLE_NAME: &'static str = "department";
///     const SCHEMA: Option<&'static str> = Some("company");
///
///     fn columns(&self) -> Vec<ColumnInfo> {
///         vec![ColumnInfo {
///             name:        "id",
///             sql_type:    "int",
///             primary_key: true,
///             nullable:    false,
///             reference:   None
///         }]
///     }
/// }
///
/// assert_eq!(Departments.qualified_name(), "company.department");
/// ```
pub trait Table {
    /// Table name in the database.
    const TABLE_NAME: &'static str;

    /// Alias used in queries.
    const ALIAS: Option<&'static str> = None;

    /// Catalog the table lives in.
    const CATALOG: Option<&'static str> = None;

    /// Schema the table lives in.
    const SCHEMA: Option<&'static str> = None;

    /// Columns in declaration order.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// `catalog.schema.table`, skipping absent parts.
    fn qualified_name(&self) -> String {
        [Self::CATALOG, Self::SCHEMA, Some(Self::TABLE_NAME)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Primary-key columns.
    fn primary_keys(&self) -> Vec<ColumnInfo> {
        self.columns()
            .into_iter()
            .filter(|c| c.primary_key)
            .collect()
    }

    /// Render a `CREATE TABLE` statement for this table.
    ///
    /// A single primary key is declared inline; compound keys become a
    /// trailing `PRIMARY KEY (..)` constraint.
    fn create_table_sql(&self) -> String {
        let columns = self.columns();
        let compound = columns.iter().filter(|c| c.primary_key).count() > 1;

        let mut lines: Vec<String> = columns
            .iter()
            .map(|c| column_definition(c, compound))
            .collect();

        if compound {
            let keys: Vec<&str> = columns
                .iter()
                .filter(|c| c.primary_key)
                .map(|c| c.name)
                .collect();
            lines.push(format!("    PRIMARY KEY ({})", keys.join(", ")));
        }

        if lines.is_empty() {
            return format!("CREATE TABLE IF NOT EXISTS {} ();\n", self.qualified_name());
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n",
            self.qualified_name(),
            lines.join(",\n")
        )
    }
}

fn column_definition(column: &ColumnInfo, compound: bool) -> String {
    let mut parts = vec![format!("    {}", column.name), column.sql_type.to_string()];

    if column.primary_key && !compound {
        parts.push("PRIMARY KEY".to_string());
    } else if !column.nullable {
        parts.push("NOT NULL".to_string());
    }

    if let Some(reference) = column.reference {
        parts.push(format!("REFERENCES {}({})", reference.table, reference.column));
    }

    parts.join(" ")
}
