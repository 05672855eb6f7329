// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entry points for build scripts.
//!
//! A build script parses the crate sources, generates the table code into
//! `OUT_DIR`, and writes rewritten copies of the files calling the
//! generated constructors:
//!
//! ```rust,ignore
//! use std::{env, path::PathBuf};
//!
//! use tablegen::build::{CodegenOptions, Generator, SourceUnit, rewrite_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let out = PathBuf::from(env::var("OUT_DIR")?);
//!     let unit = SourceUnit::from_files("src".as_ref(), ["src/model.rs"])?;
//!
//!     let code = Generator::new(CodegenOptions::default()).generate(&unit, "crate::generated")?;
//!     code.write_to(&out.join("tablegen.rs"))?;
//!
//!     rewrite_file(&code.registry(), "src".as_ref(), "src/app.rs".as_ref(), &out.join("app.rs"))?;
//!     Ok(())
//! }
//! ```
//!
//! Rewritten files are printed from the syntax tree: comments other than
//! doc comments are dropped, and inner attributes (`#![...]`) cannot be
//! `include!`d.

use std::{
    fs,
    path::{Path, PathBuf}
};

use quote::ToTokens;
use tracing::{debug, info};

use crate::{
    codegen::{self, GeneratedCode},
    error::Error,
    naming::NamingStrategyRegistry,
    options::CodegenOptions,
    parse::{SourceUnit, module_path_for},
    resolve::MetadataResolver,
    rewrite::{CallSiteRewriter, RewriteReport, SignatureRegistry}
};

/// Resolves and generates one compilation unit.
///
/// # Example
///
/// ```rust
/// use tablegen_codegen::{options::CodegenOptions, parse::SourceUnit, pipeline::Generator};
///
/// let mut unit = SourceUnit::new();
/// unit.parse_str("crate::model", r#"
///     #[table]
///     pub struct Employee {
///         #[primary_key]
///         pub id: i32,
///         pub name: String
///     }
/// "#).unwrap();
///
/// let code = Generator::new(CodegenOptions::default())
///     .generate(&unit, "crate::generated")
///     .unwrap();
/// assert_eq!(code.tables()[0].name, "employee");
/// assert!(code.render().contains("pub struct Employees"));
/// ```
#[derive(Default)]
pub struct Generator {
    options:  CodegenOptions,
    registry: NamingStrategyRegistry
}

impl Generator {
    /// Generator with the built-in naming strategies.
    #[must_use]
    pub fn new(options: CodegenOptions) -> Self {
        Self::with_registry(options, NamingStrategyRegistry::new())
    }

    /// Generator with custom naming strategies.
    #[must_use]
    pub fn with_registry(options: CodegenOptions, registry: NamingStrategyRegistry) -> Self {
        Self {
            options,
            registry
        }
    }

    /// Compilation options.
    #[must_use]
    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Resolve every table of `unit` and generate code for module
    /// `container`.
    ///
    /// # Errors
    ///
    /// The first resolution or generation error.
    pub fn generate(&self, unit: &SourceUnit, container: &str) -> Result<GeneratedCode, Error> {
        let mut resolver = MetadataResolver::new(unit, &self.options, &self.registry)?;
        let tables = resolver.resolve_all()?;
        info!(container, tables = tables.len(), "tables resolved");
        codegen::generate(&tables, unit, resolver.config(), container)
    }
}

/// Rewrite the calls of `source`, the contents of module `module`.
///
/// # Errors
///
/// - [`Error::Parse`] if `source` is not valid Rust
/// - [`Error::Rewrite`] for a malformed call to a virtual function
pub fn rewrite_source(
    registry: &SignatureRegistry,
    module: &str,
    source: &str
) -> Result<(String, RewriteReport), Error> {
    rewrite_parsed(registry, module, source, PathBuf::from(module))
}

/// Rewrite `file`, located under `src_root`, into `out`.
///
/// # Errors
///
/// - [`Error::Io`] if `file` cannot be read or `out` written
/// - otherwise as [`rewrite_source`]
pub fn rewrite_file(
    registry: &SignatureRegistry,
    src_root: &Path,
    file: &Path,
    out: &Path
) -> Result<RewriteReport, Error> {
    let source = fs::read_to_string(file).map_err(|source| Error::Io {
        path: file.to_path_buf(),
        source
    })?;
    let module = module_path_for(src_root, file);
    let (rewritten, report) = rewrite_parsed(registry, &module, &source, file.to_path_buf())?;
    fs::write(out, rewritten).map_err(|source| Error::Io {
        path: out.to_path_buf(),
        source
    })?;
    debug!(
        file = %file.display(),
        out = %out.display(),
        rewritten = report.rewritten,
        "file rewritten"
    );
    Ok(report)
}

fn rewrite_parsed(
    registry: &SignatureRegistry,
    module: &str,
    source: &str,
    path: PathBuf
) -> Result<(String, RewriteReport), Error> {
    let mut file = syn::parse_file(source).map_err(|source| Error::Parse {
        path,
        source
    })?;
    let report = CallSiteRewriter::new(registry, module).rewrite_file(&mut file)?;
    Ok((file.into_token_stream().to_string(), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;

    const MODEL: &str = r#"
        #[table]
        pub trait Employee: Entity {
            #[primary_key]
            fn id(&self) -> i32;
            fn name(&self) -> String;
        }
    "#;

    fn code() -> GeneratedCode {
        let mut unit = SourceUnit::new();
        unit.parse_str("crate::model", MODEL).unwrap();
        Generator::new(CodegenOptions::default())
            .generate(&unit, "crate::generated")
            .unwrap()
    }

    #[test]
    fn generator_applies_options() {
        let mut unit = SourceUnit::new();
        unit.parse_str("crate::model", MODEL).unwrap();
        let options = CodegenOptions::from_pairs([("tablegen.default-schema", "hr")]).unwrap();
        let code = Generator::new(options)
            .generate(&unit, "crate::generated")
            .unwrap();
        assert_eq!(code.tables()[0].schema.as_deref(), Some("hr"));
    }

    #[test]
    fn generator_reports_resolution_errors() {
        let mut unit = SourceUnit::new();
        unit.parse_str("crate::model", "#[table] pub trait Loose { fn id(&self) -> i32; }")
            .unwrap();
        let err = Generator::default()
            .generate(&unit, "crate::generated")
            .unwrap_err();
        assert!(matches!(err, Error::MissingEntityBase { .. }));
    }

    #[test]
    fn source_is_rewritten() {
        let registry = code().registry();
        let (rewritten, report) = rewrite_source(
            &registry,
            "crate::app",
            "fn hire() -> EmployeeRecord { generated::Employee(name = \"Ann\".to_string()) }"
        )
        .unwrap();
        assert_eq!(report.rewritten, 1);
        assert!(rewritten.contains("generated :: __impl_Employee"));
        assert!(rewritten.contains("2u32"));
    }

    #[test]
    fn malformed_calls_fail() {
        let registry = code().registry();
        let err = rewrite_source(&registry, "crate", "fn f() { generated::Employee(salary = 1); }")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Rewrite(RewriteError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn invalid_source_is_a_parse_error() {
        let registry = SignatureRegistry::new();
        let err = rewrite_source(&registry, "crate::app", "fn (").unwrap_err();
        assert!(matches!(err, Error::Parse { ref path, .. } if path == Path::new("crate::app")));
    }

    #[test]
    fn files_are_rewritten_into_out() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        let file = src.join("app.rs");
        fs::write(&file, "pub fn hire() { crate::generated::Employee(id = 1); }").unwrap();

        let out = dir.path().join("app.rs");
        let report = rewrite_file(&code().registry(), &src, &file, &out).unwrap();
        assert_eq!(report.rewritten, 1);
        assert!(fs::read_to_string(&out).unwrap().contains("__impl_Employee"));

        let missing = src.join("missing.rs");
        let err = rewrite_file(&code().registry(), &src, &missing, &out).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &missing));
    }
}
