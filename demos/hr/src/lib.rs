// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! HR model: departments, employees and projects.
//!
//! `model` is plain source. `generated` and `app` are produced by the build
//! script: the first from the declarations in `model`, the second by
//! rewriting the constructor calls in `src/app.rs`.

pub mod model;

/// Tables, records and constructors of [`model`].
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/tablegen.rs"));
}

/// Hiring workflows.
pub mod app {
    include!(concat!(env!("OUT_DIR"), "/app.rs"));
}
