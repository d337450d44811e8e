use anyhow::{Context, Result};

/// Runtime settings, read from the environment (and `.env`, once loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://app.db?mode=rwc".to_string(),
            max_connections: 5,
            host: "127.0.0.1".to_string(),
            port: 5555,
        }
    }
}

impl Config {
    /// A private in-memory database. The pool holds a single connection,
    /// since every SQLite in-memory connection is its own database.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to the defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| defaults.port.to_string())
            .parse()
            .context("Invalid PORT")?;
        let max_connections: u32 = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| defaults.max_connections.to_string())
            .parse()
            .context("Invalid DATABASE_MAX_CONNECTIONS")?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
        })
    }
}
