// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entry points for entity sequences.
//!
//! Generated `{Entities}Sequence` extension traits are implemented for every
//! [`Database`], so `database.employees()` yields an [`EntitySequence`] over
//! the `Employees` table.

use crate::table::Table;

/// A database that entity sequences can be opened on.
pub trait Database {
    /// Open a sequence over `table`.
    fn sequence_of<T: Table>(&self, table: T) -> EntitySequence<'_, Self, T>
    where
        Self: Sized
    {
        EntitySequence::new(self, table)
    }
}

/// Entities of one table, bound to a database.
#[derive(Debug)]
pub struct EntitySequence<'db, D, T> {
    database: &'db D,
    table:    T
}

impl<'db, D, T: Table> EntitySequence<'db, D, T> {
    /// Bind `table` to `database`.
    #[must_use]
    pub fn new(database: &'db D, table: T) -> Self {
        Self {
            database,
            table
        }
    }

    /// The database the sequence reads from.
    #[must_use]
    pub fn database(&self) -> &'db D {
        self.database
    }

    /// The source table.
    #[must_use]
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Qualified name of the source table.
    #[must_use]
    pub fn source_name(&self) -> String {
        self.table.qualified_name()
    }
}
