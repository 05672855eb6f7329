// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Diagnostics of the resolution, configuration and rewrite passes.
//!
//! Every error is fatal to the compilation unit it was raised in. Each one
//! names the offending declaration and the rule it broke, carries the span
//! of that declaration, and renders as a compile error through
//! [`syn::Error`].
//!
//! # Categories
//!
//! | Category | Raised when |
//! |----------|-------------|
//! | [`Shape`](ErrorCategory::Shape) | a declaration has the wrong kind or capability |
//! | [`Conflict`](ErrorCategory::Conflict) | mutually exclusive markers meet on one property |
//! | [`Inference`](ErrorCategory::Inference) | no SQL type can be inferred |
//! | [`ReferenceIntegrity`](ErrorCategory::ReferenceIntegrity) | a reference target is unusable |
//! | [`Graph`](ErrorCategory::Graph) | the reference graph has a cycle |
//! | [`Configuration`](ErrorCategory::Configuration) | options or strategies cannot be resolved |
//! | [`Attribute`](ErrorCategory::Attribute) | marker arguments are malformed |
//! | [`Rewrite`](ErrorCategory::Rewrite) | a call to a virtual function is malformed |
//! | [`Io`](ErrorCategory::Io) | source files cannot be read, parsed or written |

use std::{fmt, path::PathBuf};

use proc_macro2::{Span, TokenStream};
use thiserror::Error;

use crate::{naming::StrategySide, parse::ItemKind};

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wrong declaration kind or missing capability.
    Shape,
    /// Mutually exclusive markers.
    Conflict,
    /// SQL type inference failed.
    Inference,
    /// Unusable reference target.
    ReferenceIntegrity,
    /// Circular reference.
    Graph,
    /// Options or naming strategies.
    Configuration,
    /// Malformed marker arguments.
    Attribute,
    /// Malformed call site.
    Rewrite,
    /// Source files.
    Io
}

/// Fatal error of a generation pass.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration of the wrong kind was used.
    #[error("`{declaration}` is {kind}, expected {expected}")]
    UnsupportedKind {
        /// Offending declaration.
        declaration: String,
        /// Its actual kind.
        kind:        ItemKind,
        /// What the rule required.
        expected:    &'static str,
        /// Declaration span.
        span:        Span
    },

    /// A table declared as a tuple struct.
    #[error("`{declaration}` is a tuple struct, tables require named fields")]
    TupleStruct {
        /// Offending declaration.
        declaration: String,
        /// Declaration span.
        span:        Span
    },

    /// A trait entity that does not extend `Entity`.
    #[error("trait entity `{declaration}` must extend `Entity`")]
    MissingEntityBase {
        /// Offending declaration.
        declaration: String,
        /// Declaration span.
        span:        Span
    },

    /// A SQL type declaration that is not a unit struct.
    #[error("SQL type `{sql_type}` must be a unit struct so it can be used as a singleton")]
    NotSingleton {
        /// Offending SQL type declaration.
        sql_type: String,
        /// Span of the `sql_type` argument.
        span:     Span
    },

    /// A SQL type declaration with neither capability.
    #[error("SQL type `{sql_type}` must implement `SqlType<T>` or `SqlTypeFactory`")]
    NotSqlType {
        /// Offending SQL type declaration.
        sql_type: String,
        /// Span of the `sql_type` argument.
        span:     Span
    },

    /// A SQL type path that names nothing known.
    #[error("SQL type `{sql_type}` is neither built in nor declared in the compilation unit")]
    UnknownSqlType {
        /// Offending path.
        sql_type: String,
        /// Span of the `sql_type` argument.
        span:     Span
    },

    /// A SQL type path that matches several declarations.
    #[error("SQL type `{sql_type}` is ambiguous between {}", candidates.join(", "))]
    AmbiguousSqlType {
        /// Offending path.
        sql_type:   String,
        /// Matching declaration keys.
        candidates: Vec<String>,
        /// Span of the `sql_type` argument.
        span:       Span
    },

    /// A generated name that is not a Rust identifier.
    #[error("`{name}`, generated for `{declaration}`, is not a valid Rust identifier")]
    InvalidIdentifier {
        /// Declaration the name was generated for.
        declaration: String,
        /// Offending name.
        name:        String,
        /// Declaration span.
        span:        Span
    },

    /// Column and reference markers on one property.
    #[error("property `{property}` of `{declaration}` cannot be both a column and a reference")]
    ConflictingMarkers {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Property span.
        span:        Span
    },

    /// No SQL type could be inferred.
    #[error(
        "cannot infer a SQL type for property `{property}: {ty}` of `{declaration}`, specify it \
         manually with #[column(sql_type = \"..\")]"
    )]
    CannotInferType {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Declared property type.
        ty:          String,
        /// Property span.
        span:        Span
    },

    /// A reference declared on a struct entity.
    #[error(
        "property `{property}` of `{declaration}` is a reference, but references are only \
         supported on trait entities"
    )]
    ReferenceOnClass {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Property span.
        span:        Span
    },

    /// A reference to something that is not a table.
    #[error("property `{property}` of `{declaration}` references `{target}`, which is not a table")]
    NotATable {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Referenced name.
        target:      String,
        /// Property span.
        span:        Span
    },

    /// A reference to a struct entity.
    #[error(
        "property `{property}` of `{declaration}` references `{target}`, which is not a trait \
         entity"
    )]
    TargetNotInterface {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Referenced table.
        target:      String,
        /// Property span.
        span:        Span
    },

    /// A reference to a table without primary key.
    #[error(
        "property `{property}` of `{declaration}` references `{target}`, which has no primary key"
    )]
    NoPrimaryKey {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Referenced table.
        target:      String,
        /// Property span.
        span:        Span
    },

    /// A reference to a table with a compound primary key.
    #[error(
        "property `{property}` of `{declaration}` references `{target}`, which has a compound \
         primary key of {count} columns"
    )]
    CompoundPrimaryKey {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Referenced table.
        target:      String,
        /// Number of primary-key columns.
        count:       usize,
        /// Property span.
        span:        Span
    },

    /// A reference whose target name matches several declarations.
    #[error(
        "property `{property}` of `{declaration}` references `{target}`, which is ambiguous \
         between {}",
        candidates.join(", ")
    )]
    AmbiguousReference {
        /// Owning declaration.
        declaration: String,
        /// Offending property.
        property:    String,
        /// Referenced name.
        target:      String,
        /// Matching declaration keys.
        candidates:  Vec<String>,
        /// Property span.
        span:        Span
    },

    /// A cycle in the reference graph.
    #[error("circular reference: {}", path.join(" --> "))]
    CircularReference {
        /// Table names in traversal order, starting at the repeated table.
        path: Vec<String>,
        /// Span of the reference closing the cycle.
        span: Span
    },

    /// Options or naming strategies.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed marker arguments.
    #[error(transparent)]
    Attribute(#[from] darling::Error),

    /// A malformed call to a virtual function.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// A source file that is not valid Rust.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Offending file.
        path:   PathBuf,
        /// Parser error.
        source: syn::Error
    },

    /// A source or output file that cannot be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Offending file.
        path:   PathBuf,
        /// Underlying error.
        source: std::io::Error
    }
}

impl Error {
    /// Classify the error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedKind { .. }
            | Self::TupleStruct { .. }
            | Self::MissingEntityBase { .. }
            | Self::NotSingleton { .. }
            | Self::NotSqlType { .. }
            | Self::UnknownSqlType { .. }
            | Self::AmbiguousSqlType { .. }
            | Self::InvalidIdentifier { .. } => ErrorCategory::Shape,
            Self::ConflictingMarkers { .. } => ErrorCategory::Conflict,
            Self::CannotInferType { .. } => ErrorCategory::Inference,
            Self::ReferenceOnClass { .. }
            | Self::NotATable { .. }
            | Self::TargetNotInterface { .. }
            | Self::NoPrimaryKey { .. }
            | Self::CompoundPrimaryKey { .. }
            | Self::AmbiguousReference { .. } => ErrorCategory::ReferenceIntegrity,
            Self::CircularReference { .. } => ErrorCategory::Graph,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Attribute(_) => ErrorCategory::Attribute,
            Self::Rewrite(_) => ErrorCategory::Rewrite,
            Self::Parse { .. } | Self::Io { .. } => ErrorCategory::Io
        }
    }

    /// Source location the diagnostic points at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::UnsupportedKind { span, .. }
            | Self::TupleStruct { span, .. }
            | Self::MissingEntityBase { span, .. }
            | Self::NotSingleton { span, .. }
            | Self::NotSqlType { span, .. }
            | Self::UnknownSqlType { span, .. }
            | Self::AmbiguousSqlType { span, .. }
            | Self::InvalidIdentifier { span, .. }
            | Self::ConflictingMarkers { span, .. }
            | Self::CannotInferType { span, .. }
            | Self::ReferenceOnClass { span, .. }
            | Self::NotATable { span, .. }
            | Self::TargetNotInterface { span, .. }
            | Self::NoPrimaryKey { span, .. }
            | Self::CompoundPrimaryKey { span, .. }
            | Self::AmbiguousReference { span, .. }
            | Self::CircularReference { span, .. } => *span,
            Self::Attribute(err) => err.span(),
            Self::Rewrite(err) => err.span(),
            Self::Parse { source, .. } => source.span(),
            Self::Config(_) | Self::Io { .. } => Span::call_site()
        }
    }

    /// Render the error as a `compile_error!` invocation.
    #[must_use]
    pub fn to_compile_error(&self) -> TokenStream {
        syn::Error::new(self.span(), self).to_compile_error()
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A custom strategy name that is not registered.
    #[error("naming strategy `{0}` is not registered")]
    StrategyNotFound(String),

    /// A strategy registered for the other side.
    #[error("naming strategy `{name}` is a {actual} naming strategy, expected a {expected} one")]
    StrategyWrongShape {
        /// Requested strategy.
        name:     String,
        /// Side it was requested for.
        expected: StrategySide,
        /// Side it is registered for.
        actual:   StrategySide
    },

    /// A `tablegen.` option nobody understands.
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// An option value of the wrong form.
    #[error("invalid value `{value}` for option `{key}`, expected {expected}")]
    InvalidValue {
        /// Option key.
        key:      String,
        /// Rejected value.
        value:    String,
        /// Accepted form.
        expected: &'static str
    },

    /// More than one configuration marker in one unit.
    #[error("only one #[tablegen_config] is allowed per compilation unit, found another on `{0}`")]
    DuplicateConfig(String)
}

/// Errors of the call-site rewriter.
///
/// Raised only for calls that matched a virtual function and its
/// implementation; calls without an implementation are left alone.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A named argument that matches no parameter.
    #[error("`{function}` has no parameter named `{name}`")]
    UnknownParameter {
        /// Called virtual function.
        function: String,
        /// Unknown name.
        name:     String,
        /// Argument span.
        span:     Span
    },

    /// Two arguments for one parameter.
    #[error("parameter `{name}` of `{function}` is supplied more than once")]
    DuplicateArgument {
        /// Called virtual function.
        function: String,
        /// Parameter name.
        name:     String,
        /// Span of the second argument.
        span:     Span
    },

    /// A positional argument following a named one.
    #[error("positional argument after named arguments in call to `{function}`")]
    PositionalAfterNamed {
        /// Called virtual function.
        function: String,
        /// Argument span.
        span:     Span
    },

    /// More positional arguments than parameters.
    #[error("`{function}` takes {expected} arguments but {found} were supplied")]
    TooManyArguments {
        /// Called virtual function.
        function: String,
        /// Parameter count.
        expected: usize,
        /// Argument count.
        found:    usize,
        /// Span of the first surplus argument.
        span:     Span
    }
}

impl RewriteError {
    /// Source location the diagnostic points at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownParameter { span, .. }
            | Self::DuplicateArgument { span, .. }
            | Self::PositionalAfterNamed { span, .. }
            | Self::TooManyArguments { span, .. } => *span
        }
    }

    /// Render the error as a `compile_error!` invocation.
    #[must_use]
    pub fn to_compile_error(&self) -> TokenStream {
        syn::Error::new(self.span(), self).to_compile_error()
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shape => "shape",
            Self::Conflict => "conflict",
            Self::Inference => "inference",
            Self::ReferenceIntegrity => "reference integrity",
            Self::Graph => "graph",
            Self::Configuration => "configuration",
            Self::Attribute => "attribute",
            Self::Rewrite => "rewrite",
            Self::Io => "io"
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_reference_renders_arrow_path() {
        let err = Error::CircularReference {
            path: vec!["Profile".into(), "Operator".into(), "User".into()],
            span: Span::call_site()
        };
        assert_eq!(err.to_string(), "circular reference: Profile --> Operator --> User");
        assert_eq!(err.category(), ErrorCategory::Graph);
    }

    #[test]
    fn config_error_is_transparent() {
        let err = Error::from(ConfigError::StrategyNotFound("my::Naming".into()));
        assert_eq!(err.to_string(), "naming strategy `my::Naming` is not registered");
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn compile_error_contains_message() {
        let err = Error::MissingEntityBase {
            declaration: "Employee".into(),
            span:        Span::call_site()
        };
        let tokens = err.to_compile_error().to_string();
        assert!(tokens.contains("compile_error"));
        assert!(tokens.contains("must extend `Entity`"));
    }
}
