// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tablegen_core::prelude::*;
//! ```

pub use crate::{
    Column, ColumnInfo, Database, Entity, EntityRecord, EntitySequence, ReferenceBinding,
    SqlType, SqlTypeFactory, Table
};
