// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declarations read by the build script.

use std::marker::PhantomData;

use tablegen::{Entity, SqlType, table, tablegen_config};

/// Generation settings.
#[tablegen_config(allow_reflection = true, default_schema = "hr")]
pub struct Config;

/// Amounts in cents, stored as `money`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoneySqlType;

impl SqlType<i64> for MoneySqlType {
    fn type_name(&self) -> &'static str {
        "money"
    }
}

/// Seniority of a project lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Level {
    /// Up to two years.
    #[default]
    Junior,
    /// More than two years.
    Senior
}

/// A department.
#[table]
pub trait Department: Entity {
    /// Key.
    #[primary_key]
    fn id(&self) -> i32;
    /// Display name.
    fn name(&self) -> String;
    /// Rename.
    fn set_name(&mut self, value: String);
}

/// An employee, stored in `staff`.
#[table(name = "staff")]
pub trait Employee: Entity {
    /// Key.
    #[primary_key]
    fn id(&self) -> i32;
    /// Full name.
    fn name(&self) -> String;
    /// Manager name, if any.
    fn manager(&self) -> Option<String>;
    /// Home department.
    #[references]
    fn department(&self) -> Box<dyn Department>;
    /// Department covering absences.
    #[references]
    fn backup(&self) -> Option<Box<dyn Department>>;
}

/// A project.
#[table]
#[derive(Debug)]
pub struct Project {
    /// Key.
    #[primary_key]
    pub id: i64,
    /// Title.
    pub title: String,
    /// Budget in cents.
    #[column(sql_type = "MoneySqlType")]
    pub budget: Option<i64>,
    /// Seniority required of the lead.
    pub level: Level,
    /// Free-form notes, not stored.
    #[column(ignore)]
    pub notes: String,
    /// Ties the project to its owner type.
    pub marker: PhantomData<u8>
}
