// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use crate::generated::{self, DepartmentRecord, EmployeeRecord};

/// The research department.
pub fn research() -> DepartmentRecord {
    generated::Department(id = 10, name = String::from("Research"))
}

/// A department known only by its key.
pub fn department(id: i32) -> DepartmentRecord {
    generated::Department(id)
}

/// Hire `name` into `department`.
pub fn hire(name: &str, department: DepartmentRecord) -> EmployeeRecord {
    generated::Employee(department = department, name = name.to_string(), id = next_id())
}

/// A contractor, explicitly without a manager.
pub fn contractor(id: i32) -> EmployeeRecord {
    generated::Employee(id, manager = None)
}

fn next_id() -> i32 {
    7
}
