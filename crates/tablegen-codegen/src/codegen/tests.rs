// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::rc::Rc;

use quote::{ToTokens, quote};

use super::*;
use crate::{
    naming::NamingStrategyRegistry,
    options::CodegenOptions,
    resolve::MetadataResolver,
    rewrite::{FunctionKey, Resolution}
};

const CONTAINER: &str = "crate::generated";

fn tokens(value: impl ToTokens) -> String {
    value.to_token_stream().to_string()
}

fn generate_with(source: &str, options: &CodegenOptions) -> Result<GeneratedCode, Error> {
    let mut unit = SourceUnit::new();
    unit.parse_str("crate::model", source)?;
    let registry = NamingStrategyRegistry::new();
    let mut resolver = MetadataResolver::new(&unit, options, &registry)?;
    let tables: Vec<Rc<TableMetadata>> = resolver.resolve_all()?;
    generate(&tables, &unit, resolver.config(), CONTAINER)
}

fn generated(source: &str) -> String {
    generate_with(source, &CodegenOptions::default())
        .unwrap()
        .tokens()
        .to_string()
}

const MODEL: &str = r#"
    #[table(schema = "hr")]
    pub trait Department: Entity {
        #[primary_key]
        fn id(&self) -> i32;
        fn name(&self) -> String;
        fn set_name(&mut self, value: String);
    }

    #[table]
    pub trait Employee: Entity {
        #[primary_key]
        fn id(&self) -> i32;
        fn name(&self) -> String;
        fn manager(&self) -> Option<String>;
        #[references]
        fn department(&self) -> Box<dyn Department>;
        #[references]
        fn mentor_department(&self) -> Option<Box<dyn Department>>;
    }
"#;

#[test]
fn table_type_and_columns() {
    let code = generated(MODEL);
    assert!(code.contains(&tokens(quote!(pub struct Departments;))));
    assert!(code.contains(&tokens(quote!(const TABLE_NAME: &'static str = "department";))));
    assert!(code.contains(&tokens(quote!(
        const SCHEMA: ::core::option::Option<&'static str> = ::core::option::Option::Some("hr");
    ))));
    assert!(code.contains(&tokens(quote!(
        pub fn department_id(&self) -> ::tablegen::Column<i32>
    ))));
    assert!(code.contains(&tokens(quote!(
        .references(<Departments as ::tablegen::Table>::TABLE_NAME, "id")
    ))));
    assert!(code.contains(&tokens(quote!(
        ::std::sync::Arc::new(::tablegen::types::IntSqlType)
    ))));
}

#[test]
fn sequence_extension() {
    let code = generated(MODEL);
    assert!(code.contains(&tokens(quote!(
        pub trait EmployeesSequence: ::tablegen::Database + ::core::marker::Sized
    ))));
    assert!(code.contains(&tokens(quote!(
        fn employees(&self) -> ::tablegen::EntitySequence<'_, Self, Employees>
    ))));
    assert!(code.contains(&tokens(quote!(
        impl<D: ::tablegen::Database> EmployeesSequence for D {}
    ))));
}

#[test]
fn record_accessors() {
    let code = generated(MODEL);
    assert!(code.contains(&tokens(quote!(pub struct EmployeeRecord))));
    assert!(code.contains(&tokens(quote!(
        pub fn manager(&self) -> ::core::option::Option<&Option<String> >
    ))));
    assert!(code.contains(&tokens(quote!(
        self.record.get::<DepartmentRecord>("department")
    ))));
    assert!(code.contains(&tokens(quote!(
        .get::<::core::option::Option<DepartmentRecord>>("mentor_department")
        .and_then(|it| it.as_ref())
    ))));
    assert!(code.contains(&tokens(quote!(
        self.department().and_then(|it| it.id())
    ))));
    assert!(code.contains(&tokens(quote!(
        impl ::tablegen::Entity for EmployeeRecord
    ))));
}

#[test]
fn setters_follow_mutability() {
    let code = generated(MODEL);
    assert!(code.contains(&tokens(quote!(pub fn set_name(&mut self, value: String)))));
    assert!(!code.contains("set_manager"));
    assert!(!code.contains("set_id"));
}

#[test]
fn constructor_pair() {
    let code = generate_with(MODEL, &CodegenOptions::default()).unwrap();
    assert_eq!(code.pairs().len(), 2);

    let employee = code
        .pairs()
        .iter()
        .find(|p| p.virtual_fn.name == "Employee")
        .unwrap();
    assert_eq!(employee.virtual_fn.container, CONTAINER);
    assert_eq!(employee.virtual_fn.parameters.len(), 5);
    assert_eq!(employee.implementation.name, "__impl_Employee");
    assert_eq!(employee.implementation.flags[0], "flag");

    let rendered = code.tokens().to_string();
    assert!(rendered.contains(&tokens(quote!(
        pub fn Employee(
            id: i32,
            name: String,
            manager: Option<String>,
            department: DepartmentRecord,
            mentor_department: ::core::option::Option<DepartmentRecord>
        ) -> EmployeeRecord
    ))));
    assert!(rendered.contains(&tokens(quote!(if (flag & 8u32) != 0))));
    assert!(rendered.contains(&tokens(quote!(record.record.set("manager", manager);))));
    assert!(rendered.contains(&tokens(quote! {
        if let ::core::option::Option::Some(value) = id {
            record.record.set("id", value);
        }
    })));
}

#[test]
fn generated_pairs_are_found_by_scanning() {
    let code = generate_with(MODEL, &CodegenOptions::default()).unwrap();
    let file = code.to_file().unwrap();

    let mut scanned = SignatureRegistry::new();
    scanned.scan_file(CONTAINER, &file);
    assert_eq!(scanned.len(), 2);

    let key = FunctionKey::new(CONTAINER, "Employee");
    assert!(scanned.pair(&key).is_some());
    assert!(code.registry().pair(&key).is_some());

    let path: syn::Path = syn::parse_quote!(generated::Employee);
    assert!(matches!(
        scanned.resolve_function(&path, "crate"),
        Resolution::Pair(_)
    ));
}

#[test]
fn wide_entity_uses_several_flag_words() {
    let getters: String = (0..33)
        .map(|i| format!("fn p{i}(&self) -> i32;\n"))
        .collect();
    let source = format!("#[table] pub trait Wide: Entity {{ {getters} }}");
    let code = generate_with(&source, &CodegenOptions::default()).unwrap();
    let flags: Vec<String> = code.pairs()[0]
        .implementation
        .flags
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(flags, ["flag1", "flag2"]);

    let rendered = code.tokens().to_string();
    assert!(rendered.contains(&tokens(quote!(flag1: u32, flag2: u32))));
    assert!(rendered.contains(&tokens(quote!(if (flag2 & 1u32) != 0))));
    assert!(rendered.contains(&tokens(quote!(if (flag1 & 2147483648u32) != 0))));
}

#[test]
fn empty_trait_entity_has_no_flags() {
    let code = generate_with("#[table] pub trait Marker: Entity {}", &CodegenOptions::default())
        .unwrap();
    assert!(code.pairs()[0].implementation.flags.is_empty());
    assert!(code.tokens().to_string().contains(&tokens(quote!(
        pub fn __impl_Marker() -> MarkerRecord
    ))));
}

const CLASS: &str = r#"
    #[table]
    pub struct Employee {
        #[primary_key]
        pub id: i32,
        pub name: String,
        #[column(ignore)]
        pub dirty: bool,
        pub marker: PhantomData<u8>
    }
"#;

#[test]
fn class_conversions() {
    let code = generate_with(CLASS, &CodegenOptions::default()).unwrap();
    assert!(code.pairs().is_empty());

    let rendered = code.tokens().to_string();
    assert!(rendered.contains(&tokens(quote!(record.set("id", self.id);))));
    assert!(rendered.contains(&tokens(quote!(record.set("name", self.name);))));
    assert!(!rendered.contains("\"dirty\""));
    assert!(!rendered.contains("from_record"));
}

#[test]
fn reflection_allows_from_record() {
    let options = CodegenOptions {
        allow_reflection: Some(true),
        ..CodegenOptions::default()
    };
    let rendered = generate_with(CLASS, &options).unwrap().tokens().to_string();
    assert!(rendered.contains("from_record"));
    assert!(rendered.contains(&tokens(quote!(id: record.take::<i32>("id")?,))));
    assert!(rendered.contains(&tokens(quote!(
        dirty: ::core::default::Default::default(),
    ))));
}

#[test]
fn phantom_only_class_gets_from_record() {
    let rendered = generated(
        r#"
        #[table]
        pub struct Tag {
            #[primary_key]
            pub id: i32,
            pub marker: PhantomData<u8>
        }
        "#
    );
    assert!(rendered.contains(&tokens(quote!(
        marker: ::core::default::Default::default(),
    ))));
}

#[test]
fn unit_struct_is_an_empty_table() {
    let code = generate_with("#[table] pub struct Audit;", &CodegenOptions::default()).unwrap();
    assert!(code.tables()[0].columns.is_empty());
    let rendered = code.tokens().to_string();
    assert!(rendered.contains(&tokens(quote!(::std::vec![]))));
    assert!(rendered.contains("from_record"));
    assert!(code.to_file().is_ok());
}

#[test]
fn foreign_modules_are_imported() {
    let rendered = generated(CLASS);
    assert!(rendered.contains(&tokens(quote!(
        #[allow(unused_imports)]
        use crate::model::*;
    ))));
}

#[test]
fn invalid_type_name_is_reported() {
    let err = generate_with(
        r#"
        #[table(type_name = "not an ident")]
        pub struct Employee {
            #[primary_key]
            pub id: i32
        }
        "#,
        &CodegenOptions::default()
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidIdentifier { ref name, .. } if name == "not an ident"
    ));
}

#[test]
fn render_and_write() {
    let code = generate_with(MODEL, &CodegenOptions::default()).unwrap();
    let rendered = code.render();
    assert!(rendered.starts_with(HEADER));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tablegen.rs");
    code.write_to(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), rendered);

    let missing = dir.path().join("missing").join("tablegen.rs");
    assert!(matches!(code.write_to(&missing), Err(Error::Io { .. })));
}
