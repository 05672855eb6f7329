// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The compilation unit: every declaration the resolver may look at.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf}
};

use darling::FromAttributes;
use proc_macro2::Span;
use syn::{GenericArgument, Ident, ImplItem, Item, ItemImpl, PathArguments, Type};
use tracing::debug;

use super::{
    attrs::{ConfigAttrs, is_marker},
    declaration::{Declaration, DeclarationKey, ItemKind, parameter_names}
};
use crate::{
    error::{ConfigError, Error},
    metadata::SqlTypeShape
};

/// `impl SqlType<T> for X` or `impl SqlTypeFactory for X`.
#[derive(Debug, Clone)]
pub struct SqlTypeImpl {
    /// Module of the impl block.
    pub module:     String,
    /// Implementing type as written.
    pub self_ty:    syn::Path,
    /// Which capability is implemented.
    pub shape:      SqlTypeShape,
    /// `T` of `SqlType<T>`.
    pub value_type: Option<Type>
}

/// The `#[tablegen_config(...)]` marker of a unit.
#[derive(Debug, Clone)]
pub struct ConfigMarker {
    /// Declaration carrying the marker.
    pub key:   DeclarationKey,
    /// Marker arguments.
    pub attrs: ConfigAttrs,
    /// Declaration span.
    pub span:  Span
}

#[derive(Debug, Clone)]
struct Constructor {
    module:     String,
    self_ty:    syn::Path,
    parameters: Vec<Ident>
}

/// Result of looking a path up in the unit.
#[derive(Debug)]
pub enum Lookup<'a> {
    /// Exactly one declaration matches.
    Found(&'a Declaration),
    /// Several declarations match and none is preferred.
    Ambiguous(Vec<&'a Declaration>),
    /// Nothing matches.
    Missing
}

/// All declarations of one compilation unit.
///
/// # Example
///
/// ```rust
/// use tablegen_codegen::parse::SourceUnit;
///
/// let mut unit = SourceUnit::new();
/// unit.parse_str("crate::model", r#"
///     #[table]
///     pub struct Department {
///         #[primary_key]
///         id: i32,
///     }
/// "#).unwrap();
///
/// assert_eq!(unit.tables().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SourceUnit {
    declarations:   Vec<Declaration>,
    index:          HashMap<DeclarationKey, usize>,
    constructors:   Vec<Constructor>,
    sql_type_impls: Vec<SqlTypeImpl>,
    config:         Option<ConfigMarker>
}

impl SourceUnit {
    /// Empty unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse every file under `src_root`.
    ///
    /// Module paths are derived from file locations the way `rustc` maps
    /// them: `src/model/employee.rs` is `crate::model::employee`, and
    /// `lib.rs`, `main.rs` and `mod.rs` name their directory.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if a file cannot be read
    /// - [`Error::Parse`] if a file is not valid Rust
    /// - any error of [`add_file`](Self::add_file)
    pub fn from_files<I, P>(src_root: &Path, files: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>
    {
        let mut unit = Self::new();
        for file in files {
            let file = file.as_ref();
            let source = fs::read_to_string(file).map_err(|source| Error::Io {
                path: file.to_path_buf(),
                source
            })?;
            let parsed = syn::parse_file(&source).map_err(|source| Error::Parse {
                path: file.to_path_buf(),
                source
            })?;
            unit.add_file(&module_path_for(src_root, file), &parsed)?;
        }
        Ok(unit)
    }

    /// Parse `source` as the contents of `module`.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] for invalid Rust, otherwise as
    /// [`add_file`](Self::add_file).
    pub fn parse_str(&mut self, module: &str, source: &str) -> Result<(), Error> {
        let parsed = syn::parse_file(source).map_err(|source| Error::Parse {
            path: PathBuf::from(module),
            source
        })?;
        self.add_file(module, &parsed)
    }

    /// Add every item of `file`, declared in `module`.
    ///
    /// # Errors
    ///
    /// - [`Error::Attribute`] for malformed markers
    /// - [`Error::UnsupportedKind`] for `#[tablegen_config]` on anything but
    ///   a unit struct
    /// - [`ConfigError::DuplicateConfig`] for a second config marker
    pub fn add_file(&mut self, module: &str, file: &syn::File) -> Result<(), Error> {
        let before = self.declarations.len();
        self.add_items(module, &file.items)?;
        debug!(
            module,
            declarations = self.declarations.len() - before,
            "added source file"
        );
        Ok(())
    }

    fn add_items(&mut self, module: &str, items: &[Item]) -> Result<(), Error> {
        for item in items {
            match item {
                Item::Struct(item) => {
                    let declaration = Declaration::from_struct(module, item)?;
                    if item.attrs.iter().any(|a| is_marker(a, "tablegen_config")) {
                        self.set_config(&declaration, &item.attrs)?;
                    }
                    self.insert(declaration);
                }
                Item::Trait(item) => self.insert(Declaration::from_trait(module, item)?),
                Item::Enum(item) => {
                    self.insert_other(module, &item.ident, &item.attrs, ItemKind::Enum)?;
                }
                Item::Union(item) => {
                    self.insert_other(module, &item.ident, &item.attrs, ItemKind::Union)?;
                }
                Item::Type(item) => {
                    self.insert_other(module, &item.ident, &item.attrs, ItemKind::TypeAlias)?;
                }
                Item::Const(item) => {
                    self.insert_other(module, &item.ident, &item.attrs, ItemKind::Const)?;
                }
                Item::Static(item) => {
                    self.insert_other(module, &item.ident, &item.attrs, ItemKind::Static)?;
                }
                Item::Impl(item) => self.add_impl(module, item),
                Item::Mod(item) => {
                    if let Some((_, content)) = &item.content {
                        self.add_items(&format!("{module}::{}", item.ident), content)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn insert_other(
        &mut self,
        module: &str,
        ident: &Ident,
        attrs: &[syn::Attribute],
        kind: ItemKind
    ) -> Result<(), Error> {
        self.insert(Declaration::other(module, ident, attrs, kind)?);
        Ok(())
    }

    fn insert(&mut self, declaration: Declaration) {
        if self.index.contains_key(&declaration.key) {
            debug!(key = %declaration.key, "duplicate declaration skipped");
            return;
        }
        self.index
            .insert(declaration.key.clone(), self.declarations.len());
        self.declarations.push(declaration);
    }

    fn set_config(
        &mut self,
        declaration: &Declaration,
        attrs: &[syn::Attribute]
    ) -> Result<(), Error> {
        if declaration.kind() != ItemKind::UnitStruct {
            return Err(Error::UnsupportedKind {
                declaration: declaration.key.to_string(),
                kind:        declaration.kind(),
                expected:    "a unit struct carrying #[tablegen_config]",
                span:        declaration.span
            });
        }
        if self.config.is_some() {
            return Err(ConfigError::DuplicateConfig(declaration.key.to_string()).into());
        }
        self.config = Some(ConfigMarker {
            key:   declaration.key.clone(),
            attrs: ConfigAttrs::from_attributes(attrs)?,
            span:  declaration.span
        });
        Ok(())
    }

    fn add_impl(&mut self, module: &str, item: &ItemImpl) {
        let Type::Path(self_ty) = &*item.self_ty else {
            return;
        };
        let self_ty = self_ty.path.clone();

        let Some((_, trait_path, _)) = &item.trait_ else {
            let constructor = item.items.iter().find_map(|i| match i {
                ImplItem::Fn(f) if f.sig.ident == "new" && f.sig.receiver().is_none() => {
                    Some(parameter_names(&f.sig))
                }
                _ => None
            });
            if let Some(parameters) = constructor {
                self.constructors.push(Constructor {
                    module: module.to_string(),
                    self_ty,
                    parameters
                });
            }
            return;
        };

        let Some(last) = trait_path.segments.last() else {
            return;
        };
        let (shape, value_type) = if last.ident == "SqlType" {
            (SqlTypeShape::Fixed, first_type_argument(&last.arguments))
        } else if last.ident == "SqlTypeFactory" {
            (SqlTypeShape::Factory, None)
        } else {
            return;
        };
        debug!(module, ?shape, "SQL type impl");
        self.sql_type_impls.push(SqlTypeImpl {
            module: module.to_string(),
            self_ty,
            shape,
            value_type
        });
    }

    /// Every declaration, in unit order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// `#[table]` declarations, in unit order.
    pub fn tables(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.is_table())
    }

    /// Declaration by key.
    #[must_use]
    pub fn get(&self, key: &DeclarationKey) -> Option<&Declaration> {
        self.index.get(key).map(|&i| &self.declarations[i])
    }

    /// The configuration marker, if any.
    #[must_use]
    pub fn config(&self) -> Option<&ConfigMarker> {
        self.config.as_ref()
    }

    /// Resolve `path` as written in `from_module`.
    ///
    /// `crate::` paths must match a key exactly; `self::` and `super::` are
    /// relative to `from_module`. Other paths match every key they are a
    /// suffix of, preferring a declaration of `from_module`.
    #[must_use]
    pub fn lookup(&self, path: &syn::Path, from_module: &str) -> Lookup<'_> {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let Some(first) = segments.first() else {
            return Lookup::Missing;
        };

        let exact = match first.as_str() {
            "crate" => Some(segments.join("::")),
            "self" => Some(format!("{from_module}::{}", segments[1..].join("::"))),
            "super" => {
                let parent = from_module.rsplit_once("::").map_or("crate", |(p, _)| p);
                Some(format!("{parent}::{}", segments[1..].join("::")))
            }
            _ => None
        };
        if let Some(exact) = exact {
            return self
                .declarations
                .iter()
                .find(|d| d.key.as_str() == exact)
                .map_or(Lookup::Missing, Lookup::Found);
        }

        let candidates: Vec<&Declaration> = self
            .declarations
            .iter()
            .filter(|d| d.key.ends_with(&segments))
            .collect();
        match candidates.as_slice() {
            [] => Lookup::Missing,
            [only] => Lookup::Found(*only),
            _ => {
                let local = format!("{from_module}::{}", segments.join("::"));
                match candidates.iter().copied().find(|d| d.key.as_str() == local) {
                    Some(preferred) => Lookup::Found(preferred),
                    None => Lookup::Ambiguous(candidates)
                }
            }
        }
    }

    /// Parameter order of the inherent `fn new` of `declaration`.
    #[must_use]
    pub fn constructor_parameters(&self, declaration: &Declaration) -> Option<&[Ident]> {
        self.constructors
            .iter()
            .find(|c| self.resolves_to(&c.self_ty, &c.module, declaration))
            .map(|c| c.parameters.as_slice())
    }

    /// SQL type capability implemented by `declaration`.
    #[must_use]
    pub fn sql_type_impl(&self, declaration: &Declaration) -> Option<&SqlTypeImpl> {
        self.sql_type_impls
            .iter()
            .find(|i| self.resolves_to(&i.self_ty, &i.module, declaration))
    }

    fn resolves_to(&self, path: &syn::Path, module: &str, declaration: &Declaration) -> bool {
        matches!(self.lookup(path, module), Lookup::Found(found) if found.key == declaration.key)
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty.clone()),
        _ => None
    })
}

/// Module path of a source file below `src_root`.
#[must_use]
pub fn module_path_for(src_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(src_root).unwrap_or(file);
    let mut segments = vec!["crate".to_string()];
    let components: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let count = components.len();
    for (i, name) in components.into_iter().enumerate() {
        let last = i + 1 == count;
        if last && (name == "mod" || (count == 1 && (name == "lib" || name == "main"))) {
            continue;
        }
        segments.push(name);
    }
    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> SourceUnit {
        let mut unit = SourceUnit::new();
        unit.parse_str("crate::model", source).unwrap();
        unit
    }

    fn path(s: &str) -> syn::Path {
        syn::parse_str(s).unwrap()
    }

    #[test]
    fn collects_nested_modules() {
        let unit = unit(
            r#"
            pub struct Employee { id: i32 }
            pub mod hr {
                pub enum Gender { Male, Female }
            }
            "#
        );
        let keys: Vec<_> = unit.declarations().map(|d| d.key.to_string()).collect();
        assert_eq!(keys, ["crate::model::Employee", "crate::model::hr::Gender"]);
    }

    #[test]
    fn lookup_prefers_local_module() {
        let unit = unit(
            r#"
            pub trait Department {}
            pub mod other {
                pub trait Department {}
            }
            "#
        );
        match unit.lookup(&path("Department"), "crate::model") {
            Lookup::Found(d) => assert_eq!(d.key.as_str(), "crate::model::Department"),
            other => panic!("unexpected {other:?}")
        }
        match unit.lookup(&path("Department"), "crate::elsewhere") {
            Lookup::Ambiguous(found) => assert_eq!(found.len(), 2),
            other => panic!("unexpected {other:?}")
        }
        assert!(matches!(
            unit.lookup(&path("other::Department"), "crate::elsewhere"),
            Lookup::Found(_)
        ));
        assert!(matches!(
            unit.lookup(&path("crate::model::Missing"), "crate::model"),
            Lookup::Missing
        ));
    }

    #[test]
    fn constructor_and_sql_type_impls() {
        let unit = unit(
            r#"
            pub struct Employee { id: i32, name: String }
            impl Employee {
                pub fn new(name: String, id: i32) -> Self { Self { id, name } }
            }
            pub struct Upper;
            impl SqlType<String> for Upper {
                fn type_name(&self) -> &'static str { "varchar" }
            }
            "#
        );
        let employee = unit.get(&DeclarationKey::new("crate::model", "Employee")).unwrap();
        let params: Vec<String> = unit
            .constructor_parameters(employee)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(params, ["name", "id"]);

        let upper = unit.get(&DeclarationKey::new("crate::model", "Upper")).unwrap();
        let capability = unit.sql_type_impl(upper).unwrap();
        assert_eq!(capability.shape, SqlTypeShape::Fixed);
        assert!(capability.value_type.is_some());
    }

    #[test]
    fn duplicate_config_marker() {
        let mut unit = SourceUnit::new();
        let err = unit
            .parse_str(
                "crate",
                r#"
                #[tablegen_config(allow_reflection)]
                struct First;
                #[tablegen_config(default_schema = "hr")]
                struct Second;
                "#
            )
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DuplicateConfig(key)) if key == "crate::Second"));
    }

    #[test]
    fn config_on_non_unit_struct() {
        let mut unit = SourceUnit::new();
        let err = unit
            .parse_str("crate", "#[tablegen_config] struct Config { x: i32 }")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind { kind: ItemKind::Struct, .. }));
    }

    #[test]
    fn module_paths() {
        let root = Path::new("src");
        assert_eq!(module_path_for(root, Path::new("src/lib.rs")), "crate");
        assert_eq!(module_path_for(root, Path::new("src/model.rs")), "crate::model");
        assert_eq!(module_path_for(root, Path::new("src/model/mod.rs")), "crate::model");
        assert_eq!(
            module_path_for(root, Path::new("src/model/employee.rs")),
            "crate::model::employee"
        );
    }

    #[test]
    fn invalid_source_is_parse_error() {
        let mut unit = SourceUnit::new();
        let err = unit.parse_str("crate", "struct {").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
