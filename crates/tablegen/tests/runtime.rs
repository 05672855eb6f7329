// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tablegen::{
    Column, ColumnInfo, Database, EntityRecord, SqlTypeFactory, Table,
    types::{EnumSqlType, IntSqlType, VarcharSqlType}
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Junior,
    Senior
}

struct Departments;

impl Table for Departments {
    const TABLE_NAME: &'static str = "department";

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![Column::<i32>::new(Self::TABLE_NAME, "id", Arc::new(IntSqlType)).primary_key().info()]
    }
}

struct Employees;

impl Employees {
    fn level(&self) -> Column<Level> {
        Column::<Level>::new(Self::TABLE_NAME, "level", EnumSqlType.create_sql_type::<Level>())
    }
}

impl Table for Employees {
    const TABLE_NAME: &'static str = "employee";
    const SCHEMA: Option<&'static str> = Some("hr");

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            Column::<i32>::new(Self::TABLE_NAME, "id", Arc::new(IntSqlType)).primary_key().info(),
            Column::<String>::new(Self::TABLE_NAME, "manager", Arc::new(VarcharSqlType))
                .nullable()
                .info(),
            Column::<i32>::new(Self::TABLE_NAME, "department_id", Arc::new(IntSqlType))
                .references(Departments::TABLE_NAME, "id")
                .info(),
            self.level().info(),
        ]
    }
}

struct Memory;

impl Database for Memory {}

#[test]
fn ddl_is_rendered_from_columns() {
    let sql = Employees.create_table_sql();
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS hr.employee ("));
    assert!(sql.contains("    id int PRIMARY KEY"));
    assert!(sql.contains("    manager varchar,"));
    assert!(sql.contains("    department_id int NOT NULL REFERENCES department(id)"));
    assert!(sql.contains("    level varchar NOT NULL"));
    assert_eq!(Employees.primary_keys().len(), 1);
}

#[test]
fn sequences_name_their_table() {
    let memory = Memory;
    let employees = memory.sequence_of(Employees);
    assert_eq!(employees.source_name(), "hr.employee");
    assert_eq!(memory.sequence_of(Departments).source_name(), "department");
}

#[test]
fn records_distinguish_unset_from_none() {
    let mut record = EntityRecord::new(Employees::TABLE_NAME);
    record.set("manager", Option::<String>::None);
    record.set("level", Level::Senior);

    assert_eq!(record.get::<Option<String>>("manager"), Some(&None));
    assert!(!record.contains("id"));
    assert_eq!(record.take::<Level>("level"), Some(Level::Senior));
    assert!(!record.contains("level"));
    assert_ne!(Level::Junior, Level::Senior);
}
