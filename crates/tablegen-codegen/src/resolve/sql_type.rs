// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL type inference and validation.
//!
//! # Inference
//!
//! | Property type | SQL type |
//! |---------------|----------|
//! | `bool` | `BooleanSqlType` |
//! | `i16` | `ShortSqlType` |
//! | `i32` | `IntSqlType` |
//! | `i64` | `LongSqlType` |
//! | `f32` | `FloatSqlType` |
//! | `f64` | `DoubleSqlType` |
//! | `String` | `VarcharSqlType` |
//! | `Vec<u8>` | `BytesSqlType` |
//! | `SystemTime` | `TimestampSqlType` |
//! | enum declared in the unit | `EnumSqlType` |
//!
//! `Option<T>` infers as `T` and makes the column nullable.
//!
//! # Explicit Types
//!
//! `#[column(sql_type = "path")]` must name a built-in or a unit struct of
//! the unit that implements `SqlType<T>` or `SqlTypeFactory`.

use syn::{GenericArgument, PathArguments, Type, parse_quote};

use super::{MetadataResolver, key_path, path_string};
use crate::{
    error::Error,
    metadata::{SqlTypeRef, SqlTypeShape},
    parse::{Declaration, ItemKind, Lookup, PropertyDecl}
};

/// Built-in fixed SQL types and the Rust type each one maps.
const FIXED: &[(&str, &str)] = &[
    ("bool", "BooleanSqlType"),
    ("i16", "ShortSqlType"),
    ("i32", "IntSqlType"),
    ("i64", "LongSqlType"),
    ("f32", "FloatSqlType"),
    ("f64", "DoubleSqlType"),
    ("String", "VarcharSqlType"),
    ("Vec<u8>", "BytesSqlType"),
    ("SystemTime", "TimestampSqlType")
];

const ENUM_SQL_TYPE: &str = "EnumSqlType";

fn builtin_path(name: &str) -> syn::Path {
    let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
    parse_quote!(::tablegen::types::#ident)
}

fn builtin_value_type(sql_type: &str) -> Option<Type> {
    FIXED
        .iter()
        .find(|(_, name)| *name == sql_type)
        .and_then(|(rust, _)| syn::parse_str(rust).ok())
}

/// Name of the Rust type as matched against the inference table.
fn type_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    match &last.arguments {
        PathArguments::None => Some(last.ident.to_string()),
        PathArguments::AngleBracketed(args) if last.ident == "Vec" => {
            match args.args.first()? {
                GenericArgument::Type(Type::Path(inner)) if inner.path.is_ident("u8") => {
                    Some("Vec<u8>".to_string())
                }
                _ => None
            }
        }
        _ => None
    }
}

impl MetadataResolver<'_> {
    /// Infer the SQL type of `value_type`, the property type without
    /// `Option`.
    pub(super) fn infer_sql_type(
        &self,
        owner: &Declaration,
        property: &PropertyDecl,
        value_type: &Type
    ) -> Result<SqlTypeRef, Error> {
        if let Some(name) = type_name(value_type)
            && let Some((_, sql_type)) = FIXED.iter().find(|(rust, _)| *rust == name)
        {
            return Ok(SqlTypeRef {
                path:       builtin_path(sql_type),
                shape:      SqlTypeShape::Fixed,
                value_type: value_type.clone()
            });
        }

        if let Type::Path(path) = value_type
            && let Lookup::Found(found) = self.unit.lookup(&path.path, owner.key.module())
            && found.kind() == ItemKind::Enum
        {
            return Ok(SqlTypeRef {
                path:       builtin_path(ENUM_SQL_TYPE),
                shape:      SqlTypeShape::Factory,
                value_type: value_type.clone()
            });
        }

        Err(Error::CannotInferType {
            declaration: owner.key.to_string(),
            property:    property.ident.to_string(),
            ty:          quote::ToTokens::to_token_stream(&property.ty).to_string(),
            span:        property.span
        })
    }

    /// Validate an explicit `sql_type` override.
    pub(super) fn explicit_sql_type(
        &self,
        path: &syn::Path,
        owner: &Declaration,
        value_type: &Type
    ) -> Result<SqlTypeRef, Error> {
        let span = syn::spanned::Spanned::span(path);
        let found = match self.unit.lookup(path, owner.key.module()) {
            Lookup::Found(found) => found,
            Lookup::Missing => return builtin(path, value_type),
            Lookup::Ambiguous(candidates) => {
                return Err(Error::AmbiguousSqlType {
                    sql_type: path_string(path),
                    candidates: candidates.iter().map(|d| d.key.to_string()).collect(),
                    span
                });
            }
        };

        match found.kind() {
            ItemKind::UnitStruct => {}
            ItemKind::Struct | ItemKind::TupleStruct => {
                return Err(Error::NotSingleton {
                    sql_type: found.key.to_string(),
                    span
                });
            }
            kind => {
                return Err(Error::UnsupportedKind {
                    declaration: found.key.to_string(),
                    kind,
                    expected: "a unit struct implementing `SqlType` or `SqlTypeFactory`",
                    span
                });
            }
        }

        let Some(capability) = self.unit.sql_type_impl(found) else {
            return Err(Error::NotSqlType {
                sql_type: found.key.to_string(),
                span
            });
        };
        Ok(SqlTypeRef {
            path:       key_path(&found.key)?,
            shape:      capability.shape,
            value_type: match capability.shape {
                SqlTypeShape::Fixed => capability
                    .value_type
                    .clone()
                    .unwrap_or_else(|| value_type.clone()),
                SqlTypeShape::Factory => value_type.clone()
            }
        })
    }
}

/// A path not declared in the unit must name a built-in, bare or under
/// `tablegen`.
fn builtin(path: &syn::Path, value_type: &Type) -> Result<SqlTypeRef, Error> {
    let written = path_string(path);
    let unknown = || Error::UnknownSqlType {
        sql_type: written.clone(),
        span:     syn::spanned::Spanned::span(path)
    };

    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let under_tablegen = match segments.as_slice() {
        [_] => true,
        [first, .., _] => first == "tablegen",
        [] => false
    };
    let Some(name) = segments.last().filter(|_| under_tablegen) else {
        return Err(unknown());
    };

    if name == ENUM_SQL_TYPE {
        return Ok(SqlTypeRef {
            path:       builtin_path(name),
            shape:      SqlTypeShape::Factory,
            value_type: value_type.clone()
        });
    }
    let mapped = builtin_value_type(name).ok_or_else(unknown)?;
    Ok(SqlTypeRef {
        path:       builtin_path(name),
        shape:      SqlTypeShape::Fixed,
        value_type: mapped
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_names() {
        assert_eq!(type_name(&parse_quote!(i32)).as_deref(), Some("i32"));
        assert_eq!(type_name(&parse_quote!(Vec<u8>)).as_deref(), Some("Vec<u8>"));
        assert_eq!(
            type_name(&parse_quote!(std::time::SystemTime)).as_deref(),
            Some("SystemTime")
        );
        assert!(type_name(&parse_quote!(Vec<String>)).is_none());
        assert!(type_name(&parse_quote!((i32, i32))).is_none());
    }

    #[test]
    fn builtin_paths() {
        let value: Type = parse_quote!(i64);
        let sql_type = builtin(&parse_quote!(tablegen::types::LongSqlType), &value).unwrap();
        assert_eq!(sql_type.shape, SqlTypeShape::Fixed);
        assert_eq!(path_string(&sql_type.path), "tablegen::types::LongSqlType");

        let factory = builtin(&parse_quote!(EnumSqlType), &value).unwrap();
        assert_eq!(factory.shape, SqlTypeShape::Factory);

        let err = builtin(&parse_quote!(other::LongSqlType), &value).unwrap_err();
        assert!(matches!(err, Error::UnknownSqlType { .. }));
    }
}
