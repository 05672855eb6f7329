// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Lookup of naming strategies by selector.
//!
//! Built-in selectors resolve to static instances. Every other selector is
//! the fully-qualified name a custom strategy was registered under, either
//! as a singleton or as a default-constructible type that is instantiated
//! on each lookup.

use std::{collections::HashMap, fmt, ops::Deref};

use super::{
    CodingNamingStrategy, DEFAULT_CODING, DatabaseNamingStrategy, DefaultCodingNaming,
    LOWER_SNAKE_CASE, LowerSnakeCase, UPPER_SNAKE_CASE, UpperSnakeCase
};
use crate::error::ConfigError;

static LOWER_SNAKE: LowerSnakeCase = LowerSnakeCase;
static UPPER_SNAKE: UpperSnakeCase = UpperSnakeCase;
static DEFAULT_CODING_NAMING: DefaultCodingNaming = DefaultCodingNaming;

/// Which of the two strategy contracts a strategy fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategySide {
    /// [`DatabaseNamingStrategy`].
    Database,
    /// [`CodingNamingStrategy`].
    Coding
}

impl fmt::Display for StrategySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => f.write_str("database"),
            Self::Coding => f.write_str("coding")
        }
    }
}

/// A resolved strategy: a shared singleton or a fresh instance.
pub enum StrategyHandle<S: ?Sized + 'static> {
    /// Static instance.
    Shared(&'static S),
    /// Instance created for this lookup.
    Owned(Box<S>)
}

impl<S: ?Sized + 'static> Deref for StrategyHandle<S> {
    type Target = S;

    fn deref(&self) -> &S {
        match self {
            Self::Shared(strategy) => strategy,
            Self::Owned(strategy) => strategy
        }
    }
}

impl<S: ?Sized + 'static> fmt::Debug for StrategyHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(_) => f.write_str("StrategyHandle::Shared"),
            Self::Owned(_) => f.write_str("StrategyHandle::Owned")
        }
    }
}

enum Provider<S: ?Sized + 'static> {
    Singleton(&'static S),
    Constructor(fn() -> Box<S>)
}

impl<S: ?Sized + 'static> Provider<S> {
    fn instantiate(&self) -> StrategyHandle<S> {
        match self {
            Self::Singleton(strategy) => StrategyHandle::Shared(*strategy),
            Self::Constructor(make) => StrategyHandle::Owned(make())
        }
    }
}

enum Registered {
    Database(Provider<dyn DatabaseNamingStrategy>),
    Coding(Provider<dyn CodingNamingStrategy>)
}

impl Registered {
    fn side(&self) -> StrategySide {
        match self {
            Self::Database(_) => StrategySide::Database,
            Self::Coding(_) => StrategySide::Coding
        }
    }
}

/// Custom naming strategies by fully-qualified name.
///
/// # Example
///
/// ```rust
/// use tablegen_codegen::naming::{DatabaseNamingStrategy, NamingStrategyRegistry};
/// # use tablegen_codegen::metadata::TableMetadata;
///
/// #[derive(Default)]
/// struct Prefixed;
///
/// impl DatabaseNamingStrategy for Prefixed {
///     fn table_name(&self, entity: &str) -> String {
///         format!("t_{}", entity.to_lowercase())
///     }
///
///     fn column_name(&self, _: &str, property: &str) -> String {
///         property.to_lowercase()
///     }
///
///     fn ref_column_name(&self, _: &str, property: &str, _: &TableMetadata) -> String {
///         format!("{}_ref", property.to_lowercase())
///     }
/// }
///
/// let registry = NamingStrategyRegistry::new().register_database::<Prefixed>("app::Prefixed");
/// let strategy = registry.database_strategy("app::Prefixed").unwrap();
/// assert_eq!(strategy.table_name("Employee"), "t_employee");
/// ```
#[derive(Default)]
pub struct NamingStrategyRegistry {
    strategies: HashMap<String, Registered>
}

impl NamingStrategyRegistry {
    /// Registry with only the built-in selectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a database strategy singleton.
    #[must_use]
    pub fn register_database_singleton(
        mut self,
        name: impl Into<String>,
        strategy: &'static dyn DatabaseNamingStrategy
    ) -> Self {
        self.strategies
            .insert(name.into(), Registered::Database(Provider::Singleton(strategy)));
        self
    }

    /// Register a database strategy instantiated through `Default`.
    #[must_use]
    pub fn register_database<S>(mut self, name: impl Into<String>) -> Self
    where
        S: DatabaseNamingStrategy + Default + 'static
    {
        let make: fn() -> Box<dyn DatabaseNamingStrategy> =
            || -> Box<dyn DatabaseNamingStrategy> { Box::new(S::default()) };
        self.strategies
            .insert(name.into(), Registered::Database(Provider::Constructor(make)));
        self
    }

    /// Register a coding strategy singleton.
    #[must_use]
    pub fn register_coding_singleton(
        mut self,
        name: impl Into<String>,
        strategy: &'static dyn CodingNamingStrategy
    ) -> Self {
        self.strategies
            .insert(name.into(), Registered::Coding(Provider::Singleton(strategy)));
        self
    }

    /// Register a coding strategy instantiated through `Default`.
    #[must_use]
    pub fn register_coding<S>(mut self, name: impl Into<String>) -> Self
    where
        S: CodingNamingStrategy + Default + 'static
    {
        let make: fn() -> Box<dyn CodingNamingStrategy> =
            || -> Box<dyn CodingNamingStrategy> { Box::new(S::default()) };
        self.strategies
            .insert(name.into(), Registered::Coding(Provider::Constructor(make)));
        self
    }

    /// Resolve a database strategy selector.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::StrategyNotFound`] when nothing is registered under
    ///   `selector`
    /// - [`ConfigError::StrategyWrongShape`] when a coding strategy is
    ///   registered under it
    pub fn database_strategy(
        &self,
        selector: &str
    ) -> Result<StrategyHandle<dyn DatabaseNamingStrategy>, ConfigError> {
        match selector {
            LOWER_SNAKE_CASE => return Ok(StrategyHandle::Shared(&LOWER_SNAKE)),
            UPPER_SNAKE_CASE => return Ok(StrategyHandle::Shared(&UPPER_SNAKE)),
            _ => {}
        }
        match self.lookup(selector)? {
            Registered::Database(provider) => Ok(provider.instantiate()),
            other => Err(wrong_shape(selector, StrategySide::Database, other))
        }
    }

    /// Resolve a coding strategy selector.
    ///
    /// # Errors
    ///
    /// Same as [`database_strategy`](Self::database_strategy), mirrored.
    pub fn coding_strategy(
        &self,
        selector: &str
    ) -> Result<StrategyHandle<dyn CodingNamingStrategy>, ConfigError> {
        if selector == DEFAULT_CODING {
            return Ok(StrategyHandle::Shared(&DEFAULT_CODING_NAMING));
        }
        match self.lookup(selector)? {
            Registered::Coding(provider) => Ok(provider.instantiate()),
            other => Err(wrong_shape(selector, StrategySide::Coding, other))
        }
    }

    fn lookup(&self, selector: &str) -> Result<&Registered, ConfigError> {
        self.strategies
            .get(selector)
            .ok_or_else(|| ConfigError::StrategyNotFound(selector.to_string()))
    }
}

fn wrong_shape(selector: &str, expected: StrategySide, actual: &Registered) -> ConfigError {
    ConfigError::StrategyWrongShape {
        name: selector.to_string(),
        expected,
        actual: actual.side()
    }
}

impl fmt::Debug for NamingStrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.strategies.keys().collect();
        names.sort();
        f.debug_struct("NamingStrategyRegistry")
            .field("strategies", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TableMetadata;

    #[derive(Default)]
    struct Shouting;

    impl CodingNamingStrategy for Shouting {
        fn table_type_name(&self, entity: &str) -> String {
            format!("{}Table", entity.to_uppercase())
        }

        fn entity_sequence_name(&self, entity: &str) -> String {
            entity.to_uppercase()
        }

        fn column_property_name(&self, _entity: &str, property: &str) -> String {
            property.to_uppercase()
        }

        fn ref_column_property_name(
            &self,
            _entity: &str,
            property: &str,
            _referenced: &TableMetadata
        ) -> String {
            property.to_uppercase()
        }
    }

    static SHOUTING: Shouting = Shouting;

    #[test]
    fn builtin_selectors() {
        let registry = NamingStrategyRegistry::new();
        let lower = registry.database_strategy(LOWER_SNAKE_CASE).unwrap();
        let upper = registry.database_strategy(UPPER_SNAKE_CASE).unwrap();
        assert_eq!(lower.table_name("IOUtils"), "io_utils");
        assert_eq!(upper.table_name("PwdUtils"), "PWD_UTILS");
        assert!(matches!(lower, StrategyHandle::Shared(_)));
    }

    #[test]
    fn unregistered_selector_is_not_found() {
        let registry = NamingStrategyRegistry::new();
        let err = registry.database_strategy("app::Missing").unwrap_err();
        assert!(matches!(err, ConfigError::StrategyNotFound(name) if name == "app::Missing"));
    }

    #[test]
    fn coding_strategy_as_database_is_wrong_shape() {
        let registry = NamingStrategyRegistry::new().register_coding::<Shouting>("app::Shouting");
        let err = registry.database_strategy("app::Shouting").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StrategyWrongShape {
                expected: StrategySide::Database,
                actual: StrategySide::Coding,
                ..
            }
        ));
    }

    #[test]
    fn constructor_strategy_is_owned() {
        let registry = NamingStrategyRegistry::new().register_coding::<Shouting>("app::Shouting");
        let strategy = registry.coding_strategy("app::Shouting").unwrap();
        assert!(matches!(strategy, StrategyHandle::Owned(_)));
        assert_eq!(strategy.table_type_name("Employee"), "EMPLOYEETable");
    }

    #[test]
    fn singleton_strategy_is_shared() {
        let registry =
            NamingStrategyRegistry::new().register_coding_singleton("app::SHOUTING", &SHOUTING);
        let strategy = registry.coding_strategy("app::SHOUTING").unwrap();
        assert!(matches!(strategy, StrategyHandle::Shared(_)));
        assert_eq!(strategy.entity_sequence_name("Employee"), "EMPLOYEE");
    }
}
