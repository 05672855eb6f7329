// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declarations of a compilation unit.
//!
//! Every named type-level item is classified once, when it is read:
//!
//! ```text
//! struct with named fields ─┐
//! unit struct ──────────────┴─► DeclarationShape::Class
//! trait ──────────────────────► DeclarationShape::Interface
//! anything else ──────────────► DeclarationShape::Other(ItemKind)
//! ```
//!
//! Later passes match on the shape instead of re-inspecting syntax.

use std::fmt;

use darling::FromAttributes;
use proc_macro2::Span;
use syn::{
    Attribute, Fields, FnArg, Ident, ItemStruct, ItemTrait, Pat, ReturnType, TraitItem,
    TraitItemFn, Type, TypeParamBound, spanned::Spanned
};

use super::attrs::{ColumnAttrs, ReferenceAttrs, TableAttrs, is_marker};

/// Syntactic kind of a declaration, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Struct with named fields.
    Struct,
    /// Tuple struct.
    TupleStruct,
    /// Unit struct.
    UnitStruct,
    /// Trait.
    Trait,
    /// Enum.
    Enum,
    /// Union.
    Union,
    /// Type alias.
    TypeAlias,
    /// Constant.
    Const,
    /// Static.
    Static
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Struct => "a struct",
            Self::TupleStruct => "a tuple struct",
            Self::UnitStruct => "a unit struct",
            Self::Trait => "a trait",
            Self::Enum => "an enum",
            Self::Union => "a union",
            Self::TypeAlias => "a type alias",
            Self::Const => "a constant",
            Self::Static => "a static"
        };
        f.write_str(text)
    }
}

/// Fully-qualified path of a declaration, e.g. `crate::model::Employee`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationKey(String);

impl DeclarationKey {
    /// Key of `ident` declared in `module`.
    #[must_use]
    pub fn new(module: &str, ident: &str) -> Self {
        Self(format!("{module}::{ident}"))
    }

    /// The full path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module part of the path.
    #[must_use]
    pub fn module(&self) -> &str {
        self.0.rsplit_once("::").map_or("", |(module, _)| module)
    }

    /// Last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit_once("::").map_or(&self.0, |(_, name)| name)
    }

    /// Does the path end with `segments`?
    #[must_use]
    pub fn ends_with(&self, segments: &[String]) -> bool {
        let own: Vec<&str> = self.0.split("::").collect();
        own.len() >= segments.len()
            && own[own.len() - segments.len()..]
                .iter()
                .zip(segments)
                .all(|(a, b)| *a == b)
    }

    /// The key as a Rust path usable in generated code.
    ///
    /// # Errors
    ///
    /// Fails only if the key is not a valid path.
    pub fn to_path(&self) -> syn::Result<syn::Path> {
        syn::parse_str(&self.0)
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A property of an entity: a struct field or a trait getter.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    /// Property name.
    pub ident:       Ident,
    /// Declared type.
    pub ty:          Type,
    /// `#[column(...)]`, when present.
    pub column:      Option<ColumnAttrs>,
    /// `#[primary_key]` is present.
    pub primary_key: bool,
    /// `#[references(...)]`, when present.
    pub references:  Option<ReferenceAttrs>,
    /// The property can be written after construction.
    pub mutable:     bool,
    /// The property holds a value (`PhantomData` fields do not).
    pub backed:      bool,
    /// Property span.
    pub span:        Span
}

impl PropertyDecl {
    fn from_attrs(
        ident: Ident,
        ty: Type,
        attrs: &[Attribute],
        span: Span
    ) -> darling::Result<Self> {
        let column = if attrs.iter().any(|a| is_marker(a, "column")) {
            Some(ColumnAttrs::from_attributes(attrs)?)
        } else {
            None
        };
        let references = if attrs.iter().any(|a| is_marker(a, "references")) {
            Some(ReferenceAttrs::from_attributes(attrs)?)
        } else {
            None
        };
        let backed = !is_phantom(&ty);
        Ok(Self {
            ident,
            ty,
            column,
            primary_key: attrs.iter().any(|a| is_marker(a, "primary_key")),
            references,
            mutable: true,
            backed,
            span
        })
    }

    /// Excluded by `#[column(ignore)]`.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.column.as_ref().is_some_and(|c| c.ignore)
    }
}

fn is_phantom(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "PhantomData"),
        _ => false
    }
}

/// A struct entity.
#[derive(Debug, Clone)]
pub struct ClassShape {
    /// Declared without fields.
    pub unit:       bool,
    /// Fields in declaration order.
    pub properties: Vec<PropertyDecl>
}

/// A trait entity.
#[derive(Debug, Clone)]
pub struct InterfaceShape {
    /// `Entity` is among the supertraits.
    pub extends_entity: bool,
    /// Abstract getters in declaration order.
    pub properties:     Vec<PropertyDecl>
}

/// Classification of a declaration.
#[derive(Debug, Clone)]
pub enum DeclarationShape {
    /// Struct with named fields, or unit struct.
    Class(ClassShape),
    /// Trait.
    Interface(InterfaceShape),
    /// Anything else.
    Other(ItemKind)
}

/// A named item of the compilation unit.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Fully-qualified path.
    pub key:   DeclarationKey,
    /// Item name.
    pub ident: Ident,
    /// `#[table(...)]`, when present.
    pub table: Option<TableAttrs>,
    /// Classification.
    pub shape: DeclarationShape,
    /// Span of the item name.
    pub span:  Span
}

impl Declaration {
    /// Syntactic kind.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match &self.shape {
            DeclarationShape::Class(class) if class.unit => ItemKind::UnitStruct,
            DeclarationShape::Class(_) => ItemKind::Struct,
            DeclarationShape::Interface(_) => ItemKind::Trait,
            DeclarationShape::Other(kind) => *kind
        }
    }

    /// Is this a `#[table]` declaration?
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }

    /// Properties of a class or interface, empty otherwise.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDecl] {
        match &self.shape {
            DeclarationShape::Class(class) => &class.properties,
            DeclarationShape::Interface(interface) => &interface.properties,
            DeclarationShape::Other(_) => &[]
        }
    }

    pub(crate) fn from_struct(module: &str, item: &ItemStruct) -> darling::Result<Self> {
        let shape = match &item.fields {
            Fields::Named(named) => {
                let mut errors = darling::Error::accumulator();
                let properties = named
                    .named
                    .iter()
                    .filter_map(|field| {
                        let ident = field.ident.clone()?;
                        errors.handle(PropertyDecl::from_attrs(
                            ident,
                            field.ty.clone(),
                            &field.attrs,
                            field.span()
                        ))
                    })
                    .collect();
                errors.finish()?;
                DeclarationShape::Class(ClassShape {
                    unit: false,
                    properties
                })
            }
            Fields::Unit => DeclarationShape::Class(ClassShape {
                unit:       true,
                properties: Vec::new()
            }),
            Fields::Unnamed(_) => DeclarationShape::Other(ItemKind::TupleStruct)
        };
        Self::new(module, &item.ident, &item.attrs, shape)
    }

    pub(crate) fn from_trait(module: &str, item: &ItemTrait) -> darling::Result<Self> {
        let extends_entity = item.supertraits.iter().any(|bound| match bound {
            TypeParamBound::Trait(t) => t.path.segments.last().is_some_and(|s| s.ident == "Entity"),
            _ => false
        });

        let methods: Vec<&TraitItemFn> = item
            .items
            .iter()
            .filter_map(|i| match i {
                TraitItem::Fn(f) => Some(f),
                _ => None
            })
            .collect();

        let setters: Vec<String> = methods
            .iter()
            .filter(|m| m.default.is_none())
            .filter_map(|m| setter_target(m))
            .collect();

        let mut errors = darling::Error::accumulator();
        let properties = methods
            .iter()
            .filter(|m| m.default.is_none())
            .filter_map(|m| getter_type(m).map(|ty| (m, ty)))
            .filter_map(|(m, ty)| {
                let ident = m.sig.ident.clone();
                let mutable = setters.iter().any(|s| ident == s);
                errors
                    .handle(PropertyDecl::from_attrs(ident, ty, &m.attrs, m.sig.span()))
                    .map(|p| PropertyDecl {
                        mutable,
                        ..p
                    })
            })
            .collect();
        errors.finish()?;

        let shape = DeclarationShape::Interface(InterfaceShape {
            extends_entity,
            properties
        });
        Self::new(module, &item.ident, &item.attrs, shape)
    }

    pub(crate) fn other(
        module: &str,
        ident: &Ident,
        attrs: &[Attribute],
        kind: ItemKind
    ) -> darling::Result<Self> {
        Self::new(module, ident, attrs, DeclarationShape::Other(kind))
    }

    fn new(
        module: &str,
        ident: &Ident,
        attrs: &[Attribute],
        shape: DeclarationShape
    ) -> darling::Result<Self> {
        let table = attrs
            .iter()
            .find(|a| is_marker(a, "table"))
            .map(TableAttrs::from_attribute)
            .transpose()?;
        Ok(Self {
            key: DeclarationKey::new(module, &ident.to_string()),
            ident: ident.clone(),
            table,
            shape,
            span: ident.span()
        })
    }
}

/// `fn name(&self) -> T;`
fn getter_type(method: &TraitItemFn) -> Option<Type> {
    let sig = &method.sig;
    if sig.inputs.len() != 1 || !sig.generics.params.is_empty() {
        return None;
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none() => {}
        _ => return None
    }
    match &sig.output {
        ReturnType::Type(_, ty) => Some((**ty).clone()),
        ReturnType::Default => None
    }
}

/// `fn set_name(&mut self, value: T);` yields `name`.
fn setter_target(method: &TraitItemFn) -> Option<String> {
    let sig = &method.sig;
    let name = sig.ident.to_string();
    let property = name.strip_prefix("set_")?;
    if sig.inputs.len() != 2 || !matches!(sig.output, ReturnType::Default) {
        return None;
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(r)) if r.mutability.is_some() => Some(property.to_string()),
        _ => None
    }
}

/// Parameter names of `fn new(..)`, in order.
pub(crate) fn parameter_names(sig: &syn::Signature) -> Vec<Ident> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(typed) => match &*typed.pat {
                Pat::Ident(p) => Some(p.ident.clone()),
                _ => None
            },
            FnArg::Receiver(_) => None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn struct_properties() {
        let item: ItemStruct = parse_quote! {
            #[table(name = "t_employee")]
            pub struct Employee {
                #[primary_key]
                id: i32,
                #[column(name = "full_name")]
                name: String,
                marker: std::marker::PhantomData<u8>
            }
        };
        let decl = Declaration::from_struct("crate::model", &item).unwrap();
        assert_eq!(decl.key.as_str(), "crate::model::Employee");
        assert_eq!(decl.kind(), ItemKind::Struct);
        assert_eq!(decl.table.as_ref().unwrap().name.as_deref(), Some("t_employee"));

        let props = decl.properties();
        assert_eq!(props.len(), 3);
        assert!(props[0].primary_key);
        assert_eq!(props[1].column.as_ref().unwrap().name.as_deref(), Some("full_name"));
        assert!(!props[2].backed);
    }

    #[test]
    fn unit_and_tuple_structs() {
        let unit: ItemStruct = parse_quote!(struct Empty;);
        let tuple: ItemStruct = parse_quote!(struct Pair(i32, i32););
        assert_eq!(Declaration::from_struct("crate", &unit).unwrap().kind(), ItemKind::UnitStruct);
        assert_eq!(Declaration::from_struct("crate", &tuple).unwrap().kind(), ItemKind::TupleStruct);
    }

    #[test]
    fn trait_properties_and_setters() {
        let item: ItemTrait = parse_quote! {
            #[table]
            pub trait Employee: Entity {
                #[primary_key]
                fn id(&self) -> i32;
                fn name(&self) -> String;
                fn set_name(&mut self, value: String);
                #[references]
                fn department(&self) -> Department;
                fn display(&self) -> String {
                    self.name()
                }
            }
        };
        let decl = Declaration::from_trait("crate", &item).unwrap();
        let DeclarationShape::Interface(shape) = &decl.shape else {
            panic!("expected an interface");
        };
        assert!(shape.extends_entity);

        let names: Vec<String> = shape.properties.iter().map(|p| p.ident.to_string()).collect();
        assert_eq!(names, ["id", "name", "department"]);
        assert!(!shape.properties[0].mutable);
        assert!(shape.properties[1].mutable);
        assert!(shape.properties[2].references.is_some());
    }

    #[test]
    fn trait_without_entity_base() {
        let item: ItemTrait = parse_quote! {
            pub trait Employee {
                fn id(&self) -> i32;
            }
        };
        let decl = Declaration::from_trait("crate", &item).unwrap();
        let DeclarationShape::Interface(shape) = &decl.shape else {
            panic!("expected an interface");
        };
        assert!(!shape.extends_entity);
    }

    #[test]
    fn malformed_column_marker() {
        let item: ItemStruct = parse_quote! {
            struct Employee {
                #[column(nmae = "x")]
                id: i32
            }
        };
        assert!(Declaration::from_struct("crate", &item).is_err());
    }

    #[test]
    fn key_segments() {
        let key = DeclarationKey::new("crate::model", "Employee");
        assert_eq!(key.module(), "crate::model");
        assert_eq!(key.name(), "Employee");
        assert!(key.ends_with(&["model".into(), "Employee".into()]));
        assert!(!key.ends_with(&["other".into(), "Employee".into()]));
    }

    #[test]
    fn item_kind_article() {
        assert_eq!(ItemKind::Enum.to_string(), "an enum");
        assert_eq!(ItemKind::TypeAlias.to_string(), "a type alias");
    }
}
