// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::marker::PhantomData;

use tablegen::{table, tablegen_config};

#[tablegen_config(allow_reflection = true, default_schema = "hr")]
pub struct Config;

#[table(name = "t_project", alias = "p")]
pub struct Project {
    #[primary_key]
    pub id: i64,
    #[column(name = "project_title")]
    pub title: String,
    #[column(ignore)]
    pub dirty: bool,
    pub marker: PhantomData<u8>,
}

#[table]
pub struct Audit;

fn main() {
    let _ = Config;
    let _ = Audit;
    let project = Project {
        id: 1,
        title: String::from("Atlas"),
        dirty: false,
        marker: PhantomData,
    };
    assert_eq!(project.id, 1);
    assert_eq!(project.title, "Atlas");
    assert!(!project.dirty);
}
