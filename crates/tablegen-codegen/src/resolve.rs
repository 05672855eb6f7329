// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The metadata resolution pass.
//!
//! [`MetadataResolver`] turns `#[table]` declarations into [`TableMetadata`].
//! Resolution is memoized per declaration key:
//!
//! ```text
//!                 ┌──────────── cache miss ────────────┐
//! resolve_table ──┤                                    ▼
//!                 │                       slot := InProgress, push stack
//!                 │                       resolve columns
//!                 │                         └─ reference ─► resolve_table(target)
//!                 │                       slot := Resolved, pop stack
//!                 ├── Resolved ──► shared Rc
//!                 └── InProgress ──► circular reference
//! ```
//!
//! Meeting a slot that is still in progress means the declaration is on the
//! resolution stack, so the reference graph has a cycle. The cycle is
//! reported from the repeated declaration to the top of the stack.

mod reference;
mod sql_type;

use std::{collections::HashMap, path::PathBuf, rc::Rc};

use proc_macro2::Span;
use syn::Type;
use tracing::{debug, trace};

use crate::{
    error::Error,
    metadata::{ColumnMetadata, EntityKind, TableMetadata},
    naming::{CodingNamingStrategy, DatabaseNamingStrategy, NamingStrategyRegistry, StrategyHandle},
    options::{CodegenOptions, ResolvedConfig},
    parse::{Declaration, DeclarationKey, DeclarationShape, ItemKind, PropertyDecl, SourceUnit}
};

#[derive(Debug)]
enum CacheSlot {
    InProgress,
    Resolved(Rc<TableMetadata>)
}

/// Resolves the tables of one compilation unit.
///
/// # Example
///
/// ```rust
/// use tablegen_codegen::{
///     naming::NamingStrategyRegistry, options::CodegenOptions, parse::SourceUnit,
///     resolve::MetadataResolver
/// };
///
/// let mut unit = SourceUnit::new();
/// unit.parse_str("crate", r#"
///     #[table]
///     pub struct IOUtils {
///         #[primary_key]
///         id: i32,
///     }
/// "#).unwrap();
///
/// let registry = NamingStrategyRegistry::new();
/// let mut resolver = MetadataResolver::new(&unit, &CodegenOptions::default(), &registry).unwrap();
/// let tables = resolver.resolve_all().unwrap();
/// assert_eq!(tables[0].name, "io_utils");
/// ```
pub struct MetadataResolver<'u> {
    unit:     &'u SourceUnit,
    config:   ResolvedConfig,
    database: StrategyHandle<dyn DatabaseNamingStrategy>,
    coding:   StrategyHandle<dyn CodingNamingStrategy>,
    cache:    HashMap<DeclarationKey, CacheSlot>,
    stack:    Vec<(DeclarationKey, String)>
}

impl<'u> MetadataResolver<'u> {
    /// Resolver for `unit`, configured by `options` and the unit's config
    /// marker.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a naming strategy selector cannot be resolved.
    pub fn new(
        unit: &'u SourceUnit,
        options: &CodegenOptions,
        registry: &NamingStrategyRegistry
    ) -> Result<Self, Error> {
        let config = ResolvedConfig::merge(options, unit.config().map(|marker| &marker.attrs));
        let database = registry.database_strategy(&config.db_naming_strategy)?;
        let coding = registry.coding_strategy(&config.code_naming_strategy)?;
        debug!(
            database = %config.db_naming_strategy,
            coding = %config.code_naming_strategy,
            "naming strategies resolved"
        );
        Ok(Self {
            unit,
            config,
            database,
            coding,
            cache: HashMap::new(),
            stack: Vec::new()
        })
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The unit being resolved.
    #[must_use]
    pub fn unit(&self) -> &'u SourceUnit {
        self.unit
    }

    /// Resolve every `#[table]` declaration, in unit order.
    ///
    /// # Errors
    ///
    /// The first error raised by [`resolve_table`](Self::resolve_table).
    pub fn resolve_all(&mut self) -> Result<Vec<Rc<TableMetadata>>, Error> {
        let unit = self.unit;
        unit.tables().map(|declaration| self.resolve_table(declaration)).collect()
    }

    /// Resolve one declaration.
    ///
    /// Resolving the same declaration again returns the same [`Rc`].
    ///
    /// # Errors
    ///
    /// Any shape, conflict, inference, reference or graph error of the
    /// declaration or of the tables it references.
    pub fn resolve_table(&mut self, declaration: &Declaration) -> Result<Rc<TableMetadata>, Error> {
        self.resolve_from(declaration, declaration.span)
    }

    /// Previously resolved table.
    #[must_use]
    pub fn cached(&self, key: &DeclarationKey) -> Option<Rc<TableMetadata>> {
        match self.cache.get(key) {
            Some(CacheSlot::Resolved(table)) => Some(Rc::clone(table)),
            _ => None
        }
    }

    /// Resolve `declaration`, reached through a reference at `origin`.
    fn resolve_from(
        &mut self,
        declaration: &Declaration,
        origin: Span
    ) -> Result<Rc<TableMetadata>, Error> {
        match self.cache.get(&declaration.key) {
            Some(CacheSlot::Resolved(table)) => {
                trace!(key = %declaration.key, "cache hit");
                return Ok(Rc::clone(table));
            }
            Some(CacheSlot::InProgress) => return Err(self.cycle(&declaration.key, origin)),
            None => {}
        }

        self.cache
            .insert(declaration.key.clone(), CacheSlot::InProgress);
        self.stack
            .push((declaration.key.clone(), declaration.ident.to_string()));
        let result = self.build_table(declaration);
        self.stack.pop();

        match result {
            Ok(table) => {
                debug!(
                    key = %declaration.key,
                    table = %table.name,
                    columns = table.columns.len(),
                    "table resolved"
                );
                let table = Rc::new(table);
                self.cache.insert(
                    declaration.key.clone(),
                    CacheSlot::Resolved(Rc::clone(&table))
                );
                Ok(table)
            }
            Err(err) => {
                self.cache.remove(&declaration.key);
                Err(err)
            }
        }
    }

    fn cycle(&self, key: &DeclarationKey, span: Span) -> Error {
        let start = self
            .stack
            .iter()
            .position(|(k, _)| k == key)
            .unwrap_or(0);
        let path = self.stack[start..]
            .iter()
            .map(|(_, name)| name.clone())
            .collect();
        Error::CircularReference {
            path,
            span
        }
    }

    fn build_table(&mut self, declaration: &Declaration) -> Result<TableMetadata, Error> {
        let Some(attrs) = &declaration.table else {
            return Err(Error::UnsupportedKind {
                declaration: declaration.key.to_string(),
                kind:        declaration.kind(),
                expected:    "a #[table] declaration",
                span:        declaration.span
            });
        };

        let kind = entity_kind(declaration)?;

        let entity = declaration.ident.to_string();
        let name = non_empty(attrs.name.as_deref())
            .map_or_else(|| self.database.table_name(&entity), ToString::to_string);
        let table_type_name = non_empty(attrs.type_name.as_deref())
            .map_or_else(|| self.coding.table_type_name(&entity), ToString::to_string);
        let entity_sequence_name = non_empty(attrs.sequence_name.as_deref())
            .map_or_else(|| self.coding.entity_sequence_name(&entity), ToString::to_string);

        let mut columns = Vec::new();
        for property in self.ordered_properties(declaration) {
            let column = if property.references.is_some() {
                self.resolve_reference_column(declaration, property)?
            } else {
                self.resolve_plain_column(declaration, kind, property)?
            };
            trace!(
                table = %name,
                column = %column.name,
                sql_type = %path_string(&column.sql_type.path),
                "column resolved"
            );
            columns.push(column);
        }

        Ok(TableMetadata {
            key: declaration.key.clone(),
            entity: declaration.ident.clone(),
            kind,
            name,
            alias: attrs.alias.clone(),
            catalog: attrs
                .catalog
                .clone()
                .or_else(|| self.config.default_catalog.clone()),
            schema: attrs
                .schema
                .clone()
                .or_else(|| self.config.default_schema.clone()),
            table_type_name,
            entity_sequence_name,
            ignored_properties: attrs.ignore_properties.0.clone(),
            columns,
            span: declaration.span
        })
    }

    /// Eligible properties, constructor parameters first.
    fn ordered_properties<'d>(&self, declaration: &'d Declaration) -> Vec<&'d PropertyDecl> {
        let ignored = declaration
            .table
            .as_ref()
            .map(|attrs| &attrs.ignore_properties);
        let eligible: Vec<&PropertyDecl> = declaration
            .properties()
            .iter()
            .filter(|p| p.backed && !p.is_ignored())
            .filter(|p| !ignored.is_some_and(|list| list.contains(&p.ident.to_string())))
            .collect();

        let Some(parameters) = self.unit.constructor_parameters(declaration) else {
            return eligible;
        };
        let mut ordered: Vec<&PropertyDecl> = parameters
            .iter()
            .filter_map(|param| eligible.iter().copied().find(|p| p.ident == *param))
            .collect();
        for property in eligible {
            if !parameters.iter().any(|param| property.ident == *param) {
                ordered.push(property);
            }
        }
        ordered
    }

    fn resolve_plain_column(
        &self,
        owner: &Declaration,
        kind: EntityKind,
        property: &PropertyDecl
    ) -> Result<ColumnMetadata, Error> {
        let entity = owner.ident.to_string();
        let property_name = property.ident.to_string();
        let marker = property.column.as_ref();
        let (value_type, nullable) = strip_option(&property.ty);

        let sql_type = match marker.and_then(|c| c.sql_type.as_ref()) {
            Some(path) => self.explicit_sql_type(path, owner, value_type)?,
            None => self.infer_sql_type(owner, property, value_type)?
        };

        Ok(ColumnMetadata {
            property: property.ident.clone(),
            property_type: property.ty.clone(),
            name: non_empty(marker.and_then(|c| c.name.as_deref())).map_or_else(
                || self.database.column_name(&entity, &property_name),
                ToString::to_string
            ),
            property_name: non_empty(marker.and_then(|c| c.property_name.as_deref())).map_or_else(
                || self.coding.column_property_name(&entity, &property_name),
                ToString::to_string
            ),
            primary_key: property.primary_key,
            sql_type,
            mutable: kind == EntityKind::Class || property.mutable,
            nullable,
            reference: None,
            span: property.span
        })
    }
}

/// Entity kind of a `#[table]` declaration.
///
/// # Errors
///
/// - [`Error::MissingEntityBase`] for a trait not extending `Entity`
/// - [`Error::TupleStruct`] for a tuple struct
/// - [`Error::UnsupportedKind`] for anything else but a struct or trait
pub fn entity_kind(declaration: &Declaration) -> Result<EntityKind, Error> {
    match &declaration.shape {
        DeclarationShape::Class(_) => Ok(EntityKind::Class),
        DeclarationShape::Interface(interface) if interface.extends_entity => {
            Ok(EntityKind::Interface)
        }
        DeclarationShape::Interface(_) => Err(Error::MissingEntityBase {
            declaration: declaration.key.to_string(),
            span:        declaration.span
        }),
        DeclarationShape::Other(ItemKind::TupleStruct) => Err(Error::TupleStruct {
            declaration: declaration.key.to_string(),
            span:        declaration.span
        }),
        DeclarationShape::Other(kind) => Err(Error::UnsupportedKind {
            declaration: declaration.key.to_string(),
            kind:        *kind,
            expected:    "a struct or a trait extending `Entity`",
            span:        declaration.span
        })
    }
}

/// Checks a `#[table]` declaration on its own, without resolving what it
/// references.
///
/// # Errors
///
/// Any error of [`entity_kind`], then the first marker conflict or
/// reference on a struct entity.
pub fn check_declaration(declaration: &Declaration) -> Result<EntityKind, Error> {
    let kind = entity_kind(declaration)?;
    for property in declaration.properties() {
        if property.references.is_some() {
            reference::check_markers(declaration, property)?;
        }
    }
    Ok(kind)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `Option<T>` yields `(T, true)`, anything else `(ty, false)`.
pub(crate) fn strip_option(ty: &Type) -> (&Type, bool) {
    if let Type::Path(path) = ty
        && path.qself.is_none()
        && let Some(last) = path.path.segments.last()
        && last.ident == "Option"
        && let syn::PathArguments::AngleBracketed(args) = &last.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return (inner, true);
    }
    (ty, false)
}

pub(crate) fn path_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn key_path(key: &DeclarationKey) -> Result<syn::Path, Error> {
    key.to_path().map_err(|source| Error::Parse {
        path: PathBuf::from(key.as_str()),
        source
    })
}
