// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Naming strategies.
//!
//! Two strategies are active per compilation unit:
//!
//! - a [`DatabaseNamingStrategy`] maps declaration names to table and column
//!   names in the database;
//! - a [`CodingNamingStrategy`] maps them to identifiers in generated code.
//!
//! # Built-in Strategies
//!
//! | Selector | Side | `IOUtils` becomes |
//! |----------|------|-------------------|
//! | `lower-snake-case` (default) | database | `io_utils` |
//! | `upper-snake-case` | database | `IO_UTILS` |
//! | `default` (default) | coding | `IOUtilses` table type, `io_utilses` sequence |
//!
//! Any other selector is looked up by fully-qualified name in a
//! [`NamingStrategyRegistry`].
//!
//! # Reference Columns
//!
//! A reference property `department` bound to a table whose primary key is
//! `id` becomes column `department_id` and accessor `department_id`.

mod case;
mod registry;

use convert_case::{Case, Casing};

pub use self::{
    case::{pluralize, split_words, to_lower_snake_case, to_upper_snake_case},
    registry::{NamingStrategyRegistry, StrategyHandle, StrategySide}
};
use crate::metadata::TableMetadata;

/// Selector of the default database strategy.
pub const LOWER_SNAKE_CASE: &str = "lower-snake-case";

/// Selector of the upper-case database strategy.
pub const UPPER_SNAKE_CASE: &str = "upper-snake-case";

/// Selector of the default coding strategy.
pub const DEFAULT_CODING: &str = "default";

/// Maps declaration names to database names.
pub trait DatabaseNamingStrategy {
    /// Table name for an entity.
    fn table_name(&self, entity: &str) -> String;

    /// Column name for a plain property.
    fn column_name(&self, entity: &str, property: &str) -> String;

    /// Column name for a reference property bound to `referenced`.
    fn ref_column_name(&self, entity: &str, property: &str, referenced: &TableMetadata) -> String;
}

/// Maps declaration names to generated-code identifiers.
pub trait CodingNamingStrategy {
    /// Name of the generated table type.
    fn table_type_name(&self, entity: &str) -> String;

    /// Name of the entity-sequence accessor.
    fn entity_sequence_name(&self, entity: &str) -> String;

    /// Accessor name for a plain column.
    fn column_property_name(&self, entity: &str, property: &str) -> String;

    /// Accessor name for a reference column bound to `referenced`.
    fn ref_column_property_name(
        &self,
        entity: &str,
        property: &str,
        referenced: &TableMetadata
    ) -> String;
}

/// `lower-snake-case`: `IOUtils` → `io_utils`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerSnakeCase;

impl DatabaseNamingStrategy for LowerSnakeCase {
    fn table_name(&self, entity: &str) -> String {
        to_lower_snake_case(entity)
    }

    fn column_name(&self, _entity: &str, property: &str) -> String {
        to_lower_snake_case(property)
    }

    fn ref_column_name(&self, _entity: &str, property: &str, referenced: &TableMetadata) -> String {
        match referenced.primary_keys().first() {
            Some(key) => format!("{}_{}", to_lower_snake_case(property), key.name),
            None => to_lower_snake_case(property)
        }
    }
}

/// `upper-snake-case`: `PwdUtils` → `PWD_UTILS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperSnakeCase;

impl DatabaseNamingStrategy for UpperSnakeCase {
    fn table_name(&self, entity: &str) -> String {
        to_upper_snake_case(entity)
    }

    fn column_name(&self, _entity: &str, property: &str) -> String {
        to_upper_snake_case(property)
    }

    fn ref_column_name(&self, _entity: &str, property: &str, referenced: &TableMetadata) -> String {
        match referenced.primary_keys().first() {
            Some(key) => format!("{}_{}", to_upper_snake_case(property), key.name),
            None => to_upper_snake_case(property)
        }
    }
}

/// Pluralized table types and sequences, snake-case accessors.
///
/// `Employee` gets table type `Employees` and sequence `employees`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodingNaming;

impl CodingNamingStrategy for DefaultCodingNaming {
    fn table_type_name(&self, entity: &str) -> String {
        pluralize(entity)
    }

    fn entity_sequence_name(&self, entity: &str) -> String {
        to_lower_snake_case(&pluralize(entity))
    }

    fn column_property_name(&self, _entity: &str, property: &str) -> String {
        property.to_case(Case::Snake)
    }

    fn ref_column_property_name(
        &self,
        _entity: &str,
        property: &str,
        referenced: &TableMetadata
    ) -> String {
        let property = property.to_case(Case::Snake);
        match referenced.primary_keys().first() {
            Some(key) => format!("{}_{}", property, key.property_name),
            None => property
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tests::table_with_key;

    #[test]
    fn lower_snake_case_strategy() {
        assert_eq!(LowerSnakeCase.table_name("IOUtils"), "io_utils");
        assert_eq!(LowerSnakeCase.column_name("Employee", "hireDate"), "hire_date");
    }

    #[test]
    fn upper_snake_case_strategy() {
        assert_eq!(UpperSnakeCase.table_name("PwdUtils"), "PWD_UTILS");
    }

    #[test]
    fn ref_column_uses_referenced_key() {
        let department = table_with_key("Department", "id");
        assert_eq!(
            LowerSnakeCase.ref_column_name("Employee", "department", &department),
            "department_id"
        );
        assert_eq!(
            DefaultCodingNaming.ref_column_property_name("Employee", "department", &department),
            "department_id"
        );
    }

    #[test]
    fn default_coding_names() {
        assert_eq!(DefaultCodingNaming.table_type_name("Employee"), "Employees");
        assert_eq!(DefaultCodingNaming.entity_sequence_name("Company"), "companies");
        assert_eq!(DefaultCodingNaming.entity_sequence_name("UserProfile"), "user_profiles");
    }
}
