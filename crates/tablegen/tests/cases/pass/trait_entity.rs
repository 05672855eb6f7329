// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use tablegen::{Entity, EntityRecord, table};

#[table]
pub trait Department: Entity {
    #[primary_key]
    fn id(&self) -> i32;
    fn name(&self) -> String;
    fn set_name(&mut self, value: String);
}

#[table(schema = "hr", type_name = "Staff")]
pub trait Employee: Entity {
    #[primary_key]
    fn id(&self) -> i32;
    #[column(name = "full_name")]
    fn name(&self) -> String;
    fn manager(&self) -> Option<String>;
    #[references(name = "dept_id")]
    fn department(&self) -> Box<dyn Department>;
}

struct Research {
    record: EntityRecord,
}

impl Entity for Research {
    fn entity_record(&self) -> &EntityRecord {
        &self.record
    }
}

impl Department for Research {
    fn id(&self) -> i32 {
        10
    }

    fn name(&self) -> String {
        String::from("Research")
    }

    fn set_name(&mut self, value: String) {
        self.record.set("name", value);
    }
}

fn main() {
    let mut research = Research {
        record: EntityRecord::new("department"),
    };
    research.set_name(String::from("R&D"));
    assert_eq!(research.id(), 10);
    assert_eq!(research.entity_record().get::<String>("name").map(String::as_str), Some("R&D"));
}
