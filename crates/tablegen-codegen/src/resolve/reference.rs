// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reference columns.
//!
//! A reference property is validated in a fixed order, and the first
//! failing rule is reported:
//!
//! 1. no `#[column]` next to `#[references]`
//! 2. the owner is a trait entity
//! 3. the target is a `#[table]` trait entity
//! 4. the target has exactly one primary key
//!
//! Resolving the target happens between rules 3 and 4 and is where cycles
//! are detected.

use quote::ToTokens;
use syn::{Type, TypeParamBound};

use super::{MetadataResolver, strip_option};
use crate::{
    error::Error,
    metadata::{ColumnMetadata, ReferenceMetadata},
    parse::{Declaration, DeclarationShape, ItemKind, Lookup, PropertyDecl}
};

impl<'u> MetadataResolver<'u> {
    /// Resolve a `#[references]` property of `owner`.
    pub(super) fn resolve_reference_column(
        &mut self,
        owner: &Declaration,
        property: &PropertyDecl
    ) -> Result<ColumnMetadata, Error> {
        check_markers(owner, property)?;
        let declaration = owner.key.to_string();
        let property_ident = property.ident.to_string();

        let target = self.reference_target(owner, property)?;
        let table = self.resolve_from(target, property.span)?;

        let keys: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key)
            .map(|(i, _)| i)
            .collect();
        let primary_key = match keys.as_slice() {
            [only] => *only,
            [] => {
                return Err(Error::NoPrimaryKey {
                    declaration,
                    property: property_ident,
                    target: table.key.to_string(),
                    span: property.span
                });
            }
            many => {
                return Err(Error::CompoundPrimaryKey {
                    declaration,
                    property: property_ident,
                    target: table.key.to_string(),
                    count: many.len(),
                    span: property.span
                });
            }
        };

        let entity = owner.ident.to_string();
        let marker = property.references.as_ref();
        let name = marker
            .and_then(|m| m.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.database.ref_column_name(&entity, &property_ident, &table));
        let property_name = marker
            .and_then(|m| m.property_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                self.coding
                    .ref_column_property_name(&entity, &property_ident, &table)
            });

        let reference = ReferenceMetadata {
            table,
            primary_key
        };
        let sql_type = reference
            .primary_key_column()
            .bound_column()
            .sql_type
            .clone();
        let (_, nullable) = strip_option(&property.ty);

        Ok(ColumnMetadata {
            property: property.ident.clone(),
            property_type: property.ty.clone(),
            name,
            property_name,
            primary_key: property.primary_key,
            sql_type,
            mutable: property.mutable,
            nullable,
            reference: Some(reference),
            span: property.span
        })
    }

    /// Find the `#[table]` trait a reference property points at.
    fn reference_target(
        &self,
        owner: &Declaration,
        property: &PropertyDecl
    ) -> Result<&'u Declaration, Error> {
        let unit = self.unit;
        let not_a_table = |target: String| Error::NotATable {
            declaration: owner.key.to_string(),
            property: property.ident.to_string(),
            target,
            span: property.span
        };

        let Some(path) = referenced_path(&property.ty) else {
            return Err(not_a_table(property.ty.to_token_stream().to_string()));
        };

        let target = match unit.lookup(path, owner.key.module()) {
            Lookup::Found(target) => target,
            Lookup::Missing => return Err(not_a_table(super::path_string(path))),
            Lookup::Ambiguous(candidates) => {
                return Err(Error::AmbiguousReference {
                    declaration: owner.key.to_string(),
                    property:    property.ident.to_string(),
                    target:      super::path_string(path),
                    candidates:  candidates.iter().map(|d| d.key.to_string()).collect(),
                    span:        property.span
                });
            }
        };

        match &target.shape {
            DeclarationShape::Other(kind) if *kind != ItemKind::TupleStruct || target.is_table() => {
                Err(Error::UnsupportedKind {
                    declaration: target.key.to_string(),
                    kind:        *kind,
                    expected:    "a #[table] trait extending `Entity`",
                    span:        property.span
                })
            }
            _ if !target.is_table() => Err(not_a_table(target.key.to_string())),
            DeclarationShape::Class(_) => Err(Error::TargetNotInterface {
                declaration: owner.key.to_string(),
                property:    property.ident.to_string(),
                target:      target.key.to_string(),
                span:        property.span
            }),
            _ => Ok(target)
        }
    }
}

/// Rules 1 and 2 of a reference property.
pub(super) fn check_markers(owner: &Declaration, property: &PropertyDecl) -> Result<(), Error> {
    let declaration = owner.key.to_string();
    let property_ident = property.ident.to_string();

    if property.column.is_some() {
        return Err(Error::ConflictingMarkers {
            declaration,
            property: property_ident,
            span: property.span
        });
    }

    if !matches!(owner.shape, DeclarationShape::Interface(_)) {
        return Err(Error::ReferenceOnClass {
            declaration,
            property: property_ident,
            span: property.span
        });
    }
    Ok(())
}

/// The declaration path inside a reference type.
///
/// Peels `Option`, `Box`, `Rc`, `Arc`, references, `dyn` and `impl`.
pub(crate) fn referenced_path(ty: &Type) -> Option<&syn::Path> {
    match ty {
        Type::Reference(reference) => referenced_path(&reference.elem),
        Type::Paren(paren) => referenced_path(&paren.elem),
        Type::Group(group) => referenced_path(&group.elem),
        Type::TraitObject(object) => first_trait(object.bounds.iter()),
        Type::ImplTrait(imp) => first_trait(imp.bounds.iter()),
        Type::Path(path) if path.qself.is_none() => {
            let last = path.path.segments.last()?;
            let wrapper = ["Option", "Box", "Rc", "Arc"]
                .iter()
                .any(|w| last.ident == w);
            if !wrapper {
                return Some(&path.path);
            }
            let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
                return Some(&path.path);
            };
            args.args.iter().find_map(|arg| match arg {
                syn::GenericArgument::Type(inner) => referenced_path(inner),
                _ => None
            })
        }
        _ => None
    }
}

fn first_trait<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> Option<&'a syn::Path> {
    bounds.find_map(|bound| match bound {
        TypeParamBound::Trait(t) => Some(&t.path),
        _ => None
    })
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn peeled(ty: Type) -> String {
        super::super::path_string(referenced_path(&ty).unwrap())
    }

    #[test]
    fn peels_wrappers() {
        assert_eq!(peeled(parse_quote!(Department)), "Department");
        assert_eq!(peeled(parse_quote!(Option<Box<dyn Department>>)), "Department");
        assert_eq!(peeled(parse_quote!(&'a dyn crate::hr::Department)), "crate::hr::Department");
        assert_eq!(peeled(parse_quote!(std::sync::Arc<dyn Department + Send>)), "Department");
        assert_eq!(peeled(parse_quote!(impl Department)), "Department");
    }

    #[test]
    fn tuple_has_no_target() {
        let ty: Type = parse_quote!((i32, i32));
        assert!(referenced_path(&ty).is_none());
    }
}
