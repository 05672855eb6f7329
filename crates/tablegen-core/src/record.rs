// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property bag backing generated entity records.
//!
//! A property that was never set is different from a property set to
//! `None`: the first is absent from the record, the second is stored as an
//! `Option` value. Generated constructors rely on this to leave
//! unsupplied arguments unset.

use std::{any::Any, collections::BTreeMap, fmt};

/// Values of one entity keyed by property name.
///
/// # Example
///
/// ```rust
/// use tablegen_core::EntityRecord;
///
/// let mut record = EntityRecord::new("employee");
/// record.set("id", 7_i32);
///
/// assert_eq!(record.get::<i32>("id"), Some(&7));
/// assert!(!record.contains("name"));
/// ```
pub struct EntityRecord {
    table:  &'static str,
    values: BTreeMap<&'static str, Box<dyn Any + Send + Sync>>
}

impl EntityRecord {
    /// Create an empty record for `table`.
    #[must_use]
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            values: BTreeMap::new()
        }
    }

    /// Table the record belongs to.
    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Set a property, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&mut self, property: &'static str, value: T) {
        self.values.insert(property, Box::new(value));
    }

    /// Borrow a property value.
    ///
    /// Returns `None` when the property is unset or holds another type.
    #[must_use]
    pub fn get<T: Any>(&self, property: &str) -> Option<&T> {
        self.values.get(property)?.downcast_ref::<T>()
    }

    /// Remove and return a property value.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, property: &str) -> Option<T> {
        if !self.values.get(property)?.is::<T>() {
            return None;
        }
        let value = self.values.remove(property)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Whether the property has been set.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }

    /// Names of the set properties in sorted order.
    pub fn properties(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Number of set properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for EntityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRecord")
            .field("table", &self.table)
            .field("properties", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
