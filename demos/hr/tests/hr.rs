// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::marker::PhantomData;

use tablegen::{Database, Entity, Table};
use tablegen_demo_hr::{
    app,
    generated::*,
    model::{Level, Project}
};

struct Memory;

impl Database for Memory {}

#[test]
fn named_arguments_set_only_supplied_properties() {
    let research = app::research();
    assert_eq!(research.id(), Some(&10));
    assert_eq!(research.name().map(String::as_str), Some("Research"));

    let ann = app::hire("Ann", research);
    assert_eq!(ann.id(), Some(&7));
    assert_eq!(ann.name().map(String::as_str), Some("Ann"));
    assert_eq!(ann.manager(), None);
    assert!(ann.backup().is_none());
    assert_eq!(ann.entity_record().len(), 3);
}

#[test]
fn foreign_keys_read_through_references() {
    let ann = app::hire("Ann", app::department(20));
    assert_eq!(ann.department_id(), Some(&20));
    assert_eq!(ann.backup_id(), None);
}

#[test]
fn explicit_none_differs_from_omitted() {
    let contractor = app::contractor(3);
    assert_eq!(contractor.id(), Some(&3));
    assert_eq!(contractor.manager(), Some(&None));
    assert_eq!(contractor.name(), None);
}

#[test]
fn mutable_properties_have_setters() {
    let mut sales = app::department(20);
    assert!(sales.name().is_none());
    sales.set_name(String::from("Sales"));
    assert_eq!(sales.name().map(String::as_str), Some("Sales"));
}

#[test]
fn implementation_can_be_called_directly() {
    let record = __impl_Department(Some(1), None, 0b01);
    assert_eq!(record.id(), Some(&1));
    assert!(!record.entity_record().contains("name"));

    let ignored = __impl_Department(Some(1), Some(String::from("x")), 0b10);
    assert_eq!(ignored.id(), None);
    assert_eq!(ignored.name().map(String::as_str), Some("x"));
}

#[test]
fn tables_describe_themselves() {
    assert_eq!(Employees::TABLE_NAME, "staff");
    assert_eq!(Employees.qualified_name(), "hr.staff");

    let names: Vec<&str> = Employees.columns().iter().map(|c| c.name).collect();
    assert_eq!(names, ["id", "name", "manager", "department_id", "backup_id"]);

    let sql = Employees.create_table_sql();
    assert!(sql.contains("    id int PRIMARY KEY"));
    assert!(sql.contains("    manager varchar,"));
    assert!(sql.contains("    department_id int NOT NULL REFERENCES department(id)"));
    assert!(sql.contains("    backup_id int REFERENCES department(id)"));
}

#[test]
fn custom_and_enum_sql_types() {
    let sql = Projects.create_table_sql();
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS hr.project ("));
    assert!(sql.contains("    id bigint PRIMARY KEY"));
    assert!(sql.contains("    budget money,"));
    assert!(sql.contains("    level varchar NOT NULL"));
    assert!(!sql.contains("notes"));
    assert_eq!(Projects.budget().sql_type().type_name(), "money");
}

#[test]
fn sequences_open_tables() {
    let memory = Memory;
    assert_eq!(memory.employees().source_name(), "hr.staff");
    assert_eq!(memory.departments().source_name(), "hr.department");
    assert_eq!(memory.projects().table().columns().len(), 4);
}

#[test]
fn struct_entities_convert_to_records() {
    let project = Project {
        id:     1,
        title:  String::from("Atlas"),
        budget: Some(250_000),
        level:  Level::Senior,
        notes:  String::from("draft"),
        marker: PhantomData
    };
    let record = project.into_record();
    assert_eq!(record.table(), "project");
    assert_eq!(record.get::<Option<i64>>("budget"), Some(&Some(250_000)));
    assert!(!record.contains("notes"));

    let back = Project::from_record(record).unwrap();
    assert_eq!(back.title, "Atlas");
    assert_eq!(back.level, Level::Senior);
    assert_eq!(back.notes, "");
}

#[test]
fn incomplete_records_do_not_convert() {
    let mut record = tablegen::EntityRecord::new("project");
    record.set("id", 1_i64);
    assert!(Project::from_record(record).is_none());
}
