//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::reducer::TodoEnvironment;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use todo_store_core::environment::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
use todo_store_runtime::StoreConfig;

/// How new todos get their ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// 1, 2, 3, ...
    #[default]
    Sequential,
    /// Random ids below a bound, retried on collision
    Random,
}

/// Name that is not an [`IdStrategy`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown id strategy `{0}`, expected `sequential` or `random`")]
pub struct UnknownIdStrategy(pub String);

impl FromStr for IdStrategy {
    type Err = UnknownIdStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "random" => Ok(Self::Random),
            _ => Err(UnknownIdStrategy(s.to_string())),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to an unusable value
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Environment variable name
        key: &'static str,
        /// Value found
        value: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter directives (`TODO_LOG`)
    pub log_filter: String,
    /// Id strategy (`TODO_ID_STRATEGY`)
    pub id_strategy: IdStrategy,
    /// Exclusive upper bound for random ids (`TODO_RANDOM_ID_BOUND`)
    pub random_id_bound: u64,
    /// Store guard against runaway dispatches (`TODO_MAX_ACTIONS_PER_DISPATCH`)
    pub max_actions_per_dispatch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "todo=info,todo_store_runtime=info".to_string(),
            id_strategy: IdStrategy::default(),
            random_id_bound: RandomIdGenerator::DEFAULT_BOUND,
            max_actions_per_dispatch: StoreConfig::DEFAULT_MAX_ACTIONS_PER_DISPATCH,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset keys fall back to [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_filter = lookup("TODO_LOG").unwrap_or(defaults.log_filter);
        let id_strategy = parse(&lookup, "TODO_ID_STRATEGY", defaults.id_strategy)?;
        let random_id_bound = positive(&lookup, "TODO_RANDOM_ID_BOUND", defaults.random_id_bound)?;
        let max_actions_per_dispatch = positive(
            &lookup,
            "TODO_MAX_ACTIONS_PER_DISPATCH",
            defaults.max_actions_per_dispatch,
        )?;

        Ok(Self {
            log_filter,
            id_strategy,
            random_id_bound,
            max_actions_per_dispatch,
        })
    }

    /// Id generator matching [`Config::id_strategy`]
    #[must_use]
    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        match self.id_strategy {
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::new()),
            IdStrategy::Random => Arc::new(RandomIdGenerator::new(self.random_id_bound)),
        }
    }

    /// Reducer environment built from this configuration
    #[must_use]
    pub fn environment(&self) -> TodoEnvironment {
        TodoEnvironment::new(self.id_generator())
    }

    /// Store configuration built from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_max_actions_per_dispatch(self.max_actions_per_dispatch)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| parse_value(key, value))
}

fn positive<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let parsed: T = parse_value(key, value.clone())?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.random_id_bound, 10_000);
        assert_eq!(config.max_actions_per_dispatch, 64);
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_LOG", "debug"),
            ("TODO_ID_STRATEGY", " Random "),
            ("TODO_RANDOM_ID_BOUND", "500"),
            ("TODO_MAX_ACTIONS_PER_DISPATCH", "8"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.id_strategy, IdStrategy::Random);
        assert_eq!(config.random_id_bound, 500);
        assert_eq!(config.store_config().max_actions_per_dispatch, 8);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = Config::from_lookup(lookup_from(&[("TODO_ID_STRATEGY", "uuid")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "TODO_ID_STRATEGY",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_and_garbage_numbers() {
        let zero = Config::from_lookup(lookup_from(&[("TODO_RANDOM_ID_BOUND", "0")])).unwrap_err();
        assert!(zero.to_string().contains("greater than zero"));

        let garbage =
            Config::from_lookup(lookup_from(&[("TODO_MAX_ACTIONS_PER_DISPATCH", "lots")]))
                .unwrap_err();
        assert!(garbage.to_string().contains("TODO_MAX_ACTIONS_PER_DISPATCH"));
    }

    #[test]
    fn zero_error_reports_raw_value() {
        let err = Config::from_lookup(lookup_from(&[("TODO_MAX_ACTIONS_PER_DISPATCH", " 00 ")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "TODO_MAX_ACTIONS_PER_DISPATCH",
                value: " 00 ".to_string(),
                reason: "must be greater than zero".to_string(),
            }
        );
    }

    #[test]
    fn unknown_strategy_is_a_typed_error() {
        assert_eq!(
            "uuid".parse::<IdStrategy>(),
            Err(UnknownIdStrategy("uuid".to_string()))
        );
        assert_eq!("RANDOM".parse::<IdStrategy>(), Ok(IdStrategy::Random));

        let err = Config::from_lookup(lookup_from(&[("TODO_ID_STRATEGY", "uuid")])).unwrap_err();
        assert!(err.to_string().contains("unknown id strategy `uuid`"));
    }

    #[test]
    fn random_strategy_respects_bound() {
        let config = Config {
            id_strategy: IdStrategy::Random,
            random_id_bound: 3,
            ..Config::default()
        };
        let ids = config.id_generator();
        for _ in 0..20 {
            assert!(ids.next_id() < 3);
        }
    }
}
