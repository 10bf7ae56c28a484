use std::fmt;

pub const DATABASE_URL_VAR: &str = "LADDER_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "LADDER_DB_MAX_CONNECTIONS";

const DEFAULT_DATABASE_URL: &str = "sqlite://ladder.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value } => {
                write!(f, "Invalid value for {}: {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        let url = url.into();
        // Every connection to an in-memory database sees its own copy unless pinned to one.
        let max_connections = if is_in_memory(&url) {
            1
        } else {
            max_connections.max(1)
        };
        DatabaseConfig {
            url,
            max_connections,
        }
    }

    pub fn in_memory() -> Self {
        DatabaseConfig::new("sqlite::memory:", 1)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_VAR).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: MAX_CONNECTIONS_VAR,
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(DatabaseConfig::new(url, max_connections))
    }

    pub fn is_in_memory(&self) -> bool {
        is_in_memory(&self.url)
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
