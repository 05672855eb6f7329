// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL type capabilities and the built-in SQL types.
//!
//! A SQL type declaration comes in one of two shapes:
//!
//! | Shape | Trait | Example |
//! |-------|-------|---------|
//! | Fixed mapping | [`SqlType<T>`] | `IntSqlType` maps `i32` |
//! | Type-inferring factory | [`SqlTypeFactory`] | `EnumSqlType` maps any enum |
//!
//! Declarations are unit structs so that generated code can name the value
//! directly. Columns hold their type as `Arc<dyn SqlType<T>>`.
//!
//! # Built-in Mapping
//!
//! | Rust Type | SQL Type | Declaration |
//! |-----------|----------|-------------|
//! | `bool` | `boolean` | [`BooleanSqlType`] |
//! | `i16` | `smallint` | [`ShortSqlType`] |
//! | `i32` | `int` | [`IntSqlType`] |
//! | `i64` | `bigint` | [`LongSqlType`] |
//! | `f32` | `float` | [`FloatSqlType`] |
//! | `f64` | `double` | [`DoubleSqlType`] |
//! | `String` | `varchar` | [`VarcharSqlType`] |
//! | `Vec<u8>` | `bytea` | [`BytesSqlType`] |
//! | `SystemTime` | `timestamp` | [`TimestampSqlType`] |
//! | enums | `varchar` | [`EnumSqlType`] |

use std::{marker::PhantomData, sync::Arc, time::SystemTime};

/// Fixed mapping between a Rust value type and a SQL type.
pub trait SqlType<T>: Send + Sync + 'static {
    /// SQL type name used in DDL (e.g. `"int"`).
    fn type_name(&self) -> &'static str;
}

/// Factory producing a [`SqlType`] for the value type of a column.
///
/// Used for SQL types that are generic over the value they store, such as
/// enums or JSON documents.
pub trait SqlTypeFactory {
    /// Create the SQL type for values of type `T`.
    fn create_sql_type<T: Send + Sync + 'static>(&self) -> Arc<dyn SqlType<T>>;
}

macro_rules! fixed_sql_types {
    ($($(#[$doc:meta])* $name:ident => $ty:ty, $sql:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl SqlType<$ty> for $name {
                fn type_name(&self) -> &'static str {
                    $sql
                }
            }
        )*
    };
}

fixed_sql_types! {
    /// `bool` stored as `boolean`.
    BooleanSqlType => bool, "boolean";
    /// `i16` stored as `smallint`.
    ShortSqlType => i16, "smallint";
    /// `i32` stored as `int`.
    IntSqlType => i32, "int";
    /// `i64` stored as `bigint`.
    LongSqlType => i64, "bigint";
    /// `f32` stored as `float`.
    FloatSqlType => f32, "float";
    /// `f64` stored as `double`.
    DoubleSqlType => f64, "double";
    /// `String` stored as `varchar`.
    VarcharSqlType => String, "varchar";
    /// `Vec<u8>` stored as `bytea`.
    BytesSqlType => Vec<u8>, "bytea";
    /// `SystemTime` stored as `timestamp`.
    TimestampSqlType => SystemTime, "timestamp";
}

/// Enums stored by variant name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumSqlType;

struct EnumOf<T>(PhantomData<fn() -> T>);

impl<T: 'static> SqlType<T> for EnumOf<T> {
    fn type_name(&self) -> &'static str {
        "varchar"
    }
}

impl SqlTypeFactory for EnumSqlType {
    fn create_sql_type<T: Send + Sync + 'static>(&self) -> Arc<dyn SqlType<T>> {
        Arc::new(EnumOf::<T>(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_type_names() {
        assert_eq!(SqlType::<i32>::type_name(&IntSqlType), "int");
        assert_eq!(SqlType::<String>::type_name(&VarcharSqlType), "varchar");
        assert_eq!(SqlType::<SystemTime>::type_name(&TimestampSqlType), "timestamp");
    }

    #[test]
    fn enum_factory_creates_varchar() {
        #[allow(dead_code)]
        enum Gender {
            Male,
            Female
        }

        let sql_type = EnumSqlType.create_sql_type::<Gender>();
        assert_eq!(sql_type.type_name(), "varchar");
    }
}
