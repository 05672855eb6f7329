// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Marker attribute parsing with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Placed on | Arguments |
//! |-----------|-----------|-----------|
//! | `#[table]` | struct, trait | `name`, `alias`, `catalog`, `schema`, `type_name`, `sequence_name`, `ignore_properties` |
//! | `#[column]` | field, getter | `name`, `property_name`, `sql_type`, `ignore` |
//! | `#[primary_key]` | field, getter | none |
//! | `#[references]` | getter | `name`, `property_name` |
//! | `#[tablegen_config]` | unit struct | `allow_reflection`, `naming_strategy`, `coding_naming_strategy`, `default_catalog`, `default_schema` |
//!
//! Every marker may also be written with a `tablegen::` prefix.

use darling::{FromAttributes, FromMeta, ast::NestedMeta};
use syn::{Attribute, Expr, ExprArray, Lit, Path};

/// Markers placed on properties rather than on declarations.
pub const PROPERTY_MARKERS: &[&str] = &["column", "primary_key", "references"];

/// Does `attr` name the marker `name`, bare or as `tablegen::name`?
#[must_use]
pub fn is_marker(attr: &Attribute, name: &str) -> bool {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    match segments.as_slice() {
        [only] => only == name,
        [krate, only] => krate == "tablegen" && only == name,
        _ => false
    }
}

/// Arguments of `#[table(...)]`.
///
/// # Example
///
/// ```rust,ignore
/// #[table(name = "t_employee", schema = "hr", ignore_properties = ["cache"])]
/// pub trait Employee: Entity { /* ... */ }
/// ```
#[derive(Debug, Clone, Default, FromMeta)]
pub struct TableAttrs {
    /// Explicit table name; derived from the naming strategy when absent.
    #[darling(default)]
    pub name: Option<String>,

    /// Table alias.
    #[darling(default)]
    pub alias: Option<String>,

    /// Catalog; falls back to the compilation-wide default.
    #[darling(default)]
    pub catalog: Option<String>,

    /// Schema; falls back to the compilation-wide default.
    #[darling(default)]
    pub schema: Option<String>,

    /// Generated table type name.
    #[darling(default)]
    pub type_name: Option<String>,

    /// Generated entity-sequence accessor name.
    #[darling(default)]
    pub sequence_name: Option<String>,

    /// Properties excluded from column generation.
    #[darling(default)]
    pub ignore_properties: IgnoreList
}

impl TableAttrs {
    /// Parse the arguments of a `#[table]` attribute.
    ///
    /// A bare `#[table]` yields all defaults.
    ///
    /// # Errors
    ///
    /// Returns a darling error for unknown or malformed arguments.
    pub fn from_attribute(attr: &Attribute) -> darling::Result<Self> {
        match &attr.meta {
            syn::Meta::Path(_) => Ok(Self::default()),
            meta => Self::from_meta(meta)
        }
    }
}

/// Property names listed in `ignore_properties`.
///
/// Accepts both `ignore_properties = ["a", "b"]` and
/// `ignore_properties("a", "b")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList(pub Vec<String>);

impl IgnoreList {
    /// Is `property` listed?
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.0.iter().any(|p| p == property)
    }
}

impl FromMeta for IgnoreList {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut names = Vec::with_capacity(items.len());
        let mut errors = darling::Error::accumulator();
        for item in items {
            let ident = match item {
                NestedMeta::Lit(Lit::Str(s)) => {
                    names.push(s.value());
                    continue;
                }
                NestedMeta::Meta(syn::Meta::Path(path)) => path.get_ident(),
                _ => None
            };
            match ident {
                Some(ident) => names.push(ident.to_string()),
                None => errors.push(darling::Error::custom("expected a property name").with_span(item))
            }
        }
        errors.finish_with(Self(names))
    }

    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Array(ExprArray {
                elems, ..
            }) => {
                let mut names = Vec::with_capacity(elems.len());
                for elem in elems {
                    names.push(String::from_expr(elem)?);
                }
                Ok(Self(names))
            }
            Expr::Lit(lit) => Self::from_value(&lit.lit),
            _ => Err(darling::Error::unexpected_expr_type(expr))
        }
    }

    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(Self(
            value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        ))
    }
}

/// Arguments of `#[column(...)]`.
#[derive(Debug, Clone, Default, FromAttributes)]
#[darling(attributes(column, tablegen::column))]
pub struct ColumnAttrs {
    /// Explicit column name.
    #[darling(default)]
    pub name: Option<String>,

    /// Explicit generated accessor name.
    #[darling(default)]
    pub property_name: Option<String>,

    /// Explicit SQL type, as a path to a singleton.
    #[darling(default)]
    pub sql_type: Option<Path>,

    /// Exclude the property from column generation.
    #[darling(default)]
    pub ignore: bool
}

/// Arguments of `#[references(...)]`.
#[derive(Debug, Clone, Default, FromAttributes)]
#[darling(attributes(references, tablegen::references))]
pub struct ReferenceAttrs {
    /// Explicit reference column name.
    #[darling(default)]
    pub name: Option<String>,

    /// Explicit generated accessor name.
    #[darling(default)]
    pub property_name: Option<String>
}

/// Arguments of `#[tablegen_config(...)]`.
#[derive(Debug, Clone, Default, FromAttributes)]
#[darling(attributes(tablegen_config, tablegen::tablegen_config))]
pub struct ConfigAttrs {
    /// Allow `from_record` to fill non-column fields with defaults.
    #[darling(default)]
    pub allow_reflection: Option<bool>,

    /// Database naming strategy selector.
    #[darling(default)]
    pub naming_strategy: Option<String>,

    /// Coding naming strategy selector.
    #[darling(default)]
    pub coding_naming_strategy: Option<String>,

    /// Default catalog of every table.
    #[darling(default)]
    pub default_catalog: Option<String>,

    /// Default schema of every table.
    #[darling(default)]
    pub default_schema: Option<String>
}

#[cfg(test)]
mod tests {
    use syn::{ItemStruct, parse_quote};

    use super::*;

    fn first_attr(item: &ItemStruct) -> &Attribute {
        &item.attrs[0]
    }

    #[test]
    fn table_attrs_bare() {
        let item: ItemStruct = parse_quote! {
            #[table]
            struct Employee { id: i32 }
        };
        let attrs = TableAttrs::from_attribute(first_attr(&item)).unwrap();
        assert!(attrs.name.is_none());
        assert!(attrs.ignore_properties.0.is_empty());
    }

    #[test]
    fn table_attrs_full() {
        let item: ItemStruct = parse_quote! {
            #[table(
                name = "t_employee",
                alias = "e",
                schema = "hr",
                ignore_properties = ["cache", "dirty"]
            )]
            struct Employee { id: i32 }
        };
        let attrs = TableAttrs::from_attribute(first_attr(&item)).unwrap();
        assert_eq!(attrs.name.as_deref(), Some("t_employee"));
        assert_eq!(attrs.alias.as_deref(), Some("e"));
        assert_eq!(attrs.schema.as_deref(), Some("hr"));
        assert!(attrs.ignore_properties.contains("dirty"));
    }

    #[test]
    fn ignore_list_as_call() {
        let item: ItemStruct = parse_quote! {
            #[table(ignore_properties("cache", dirty))]
            struct Employee { id: i32 }
        };
        let attrs = TableAttrs::from_attribute(first_attr(&item)).unwrap();
        assert_eq!(attrs.ignore_properties.0, vec!["cache", "dirty"]);
    }

    #[test]
    fn table_attrs_unknown_argument() {
        let item: ItemStruct = parse_quote! {
            #[table(nmae = "t_employee")]
            struct Employee { id: i32 }
        };
        assert!(TableAttrs::from_attribute(first_attr(&item)).is_err());
    }

    #[test]
    fn column_attrs() {
        let field: syn::Field = parse_quote! {
            #[column(name = "c_name", sql_type = "crate::types::Upper", ignore)]
            name: String
        };
        let attrs = ColumnAttrs::from_attributes(&field.attrs).unwrap();
        assert_eq!(attrs.name.as_deref(), Some("c_name"));
        assert!(attrs.ignore);
        let path = attrs.sql_type.unwrap();
        assert_eq!(path.segments.last().unwrap().ident, "Upper");
    }

    #[test]
    fn bare_references() {
        let field: syn::Field = parse_quote! {
            #[references]
            department: Department
        };
        let attrs = ReferenceAttrs::from_attributes(&field.attrs).unwrap();
        assert!(attrs.name.is_none());
    }

    #[test]
    fn config_attrs() {
        let item: ItemStruct = parse_quote! {
            #[tablegen_config(allow_reflection = true, naming_strategy = "upper-snake-case")]
            struct Config;
        };
        let attrs = ConfigAttrs::from_attributes(&item.attrs).unwrap();
        assert_eq!(attrs.allow_reflection, Some(true));
        assert_eq!(attrs.naming_strategy.as_deref(), Some("upper-snake-case"));
    }

    #[test]
    fn prefixed_marker() {
        let item: ItemStruct = parse_quote! {
            #[tablegen::table]
            struct Employee { id: i32 }
        };
        assert!(is_marker(first_attr(&item), "table"));
        assert!(!is_marker(first_attr(&item), "column"));
    }
}
