/// Database configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Connection string (default: `sqlite::memory:`).
    pub database_url: String,
    /// Maximum pool size (default: `20`).
    pub max_connections: u32,
    /// Bucket size used by "get all" streaming when callers pass `0`
    /// (default: `1000`).
    pub batch_size: u16,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const DEFAULT_BATCH_SIZE: u16 = 1000;

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DbConfig {
    /// Load configuration from the environment, honouring `.env` files.
    ///
    /// | Env Var                    | Default           |
    /// |----------------------------|-------------------|
    /// | `DATABASE_URL`             | `sqlite::memory:` |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`              |
    /// | `DATABASE_BATCH_SIZE`      | `1000`            |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let max_connections = parse_or_default(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        );

        let batch_size = parse_or_default(
            "DATABASE_BATCH_SIZE",
            lookup("DATABASE_BATCH_SIZE"),
            DEFAULT_BATCH_SIZE,
        );

        Self {
            database_url,
            max_connections: max_connections.max(1),
            batch_size: if batch_size == 0 {
                DEFAULT_BATCH_SIZE
            } else {
                batch_size
            },
        }
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, default = %default, "Invalid config value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(DbConfig::from_lookup(|_| None), DbConfig::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://todo.db"),
            ("DATABASE_MAX_CONNECTIONS", "5"),
            ("DATABASE_BATCH_SIZE", "250"),
        ]));
        assert_eq!(config.database_url, "sqlite://todo.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.batch_size, 250);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_MAX_CONNECTIONS", "lots"),
            ("DATABASE_BATCH_SIZE", "0"),
        ]));
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }
}
