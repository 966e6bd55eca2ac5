//! Configuration types, read from the process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default database location when `CONTACTS_DB_URL` is unset.
pub const DEFAULT_DB_URL: &str = "./data/contacts.db";

/// Where the contact collection lives.
#[derive(Debug)]
pub enum StoreConfig {
    /// Local SQLite file, created on first open.
    Local { path: String },
    /// Ephemeral in-process database.
    Memory,
    /// Remote libSQL server (`libsql://`, `https://`, `http://`).
    Remote { url: String, auth_token: SecretString },
}

impl StoreConfig {
    /// Interpret a connection string plus optional auth token.
    pub fn parse(url: &str, auth_token: Option<String>) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CONTACTS_DB_URL".into(),
                message: "must not be empty".into(),
            });
        }

        if url == ":memory:" {
            return Ok(Self::Memory);
        }

        let is_remote = ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| url.starts_with(scheme));
        if !is_remote {
            return Ok(Self::Local {
                path: url.strip_prefix("file:").unwrap_or(url).to_string(),
            });
        }

        let auth_token = auth_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "CONTACTS_DB_AUTH_TOKEN".into(),
                hint: "A remote database URL requires an auth token.".into(),
            })?;

        Ok(Self::Remote {
            url: url.to_string(),
            auth_token: SecretString::from(auth_token),
        })
    }

    /// Display form with secrets omitted.
    pub fn describe(&self) -> String {
        match self {
            Self::Local { path } => path.clone(),
            Self::Memory => ":memory:".into(),
            Self::Remote { url, .. } => url.clone(),
        }
    }
}

/// Server configuration.
#[derive(Debug)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: IpAddr,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Contact store location.
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            store: StoreConfig::Local {
                path: DEFAULT_DB_URL.to_string(),
            },
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-invalid ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let bind_addr = match lookup("CONTACTS_BIND_ADDR") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "CONTACTS_BIND_ADDR".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.bind_addr,
        };

        let store = match lookup("CONTACTS_DB_URL") {
            Some(url) => StoreConfig::parse(&url, lookup("CONTACTS_DB_AUTH_TOKEN"))?,
            None => defaults.store,
        };

        Ok(Self {
            bind_addr,
            port,
            store,
        })
    }

    /// Socket address for the listener.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
