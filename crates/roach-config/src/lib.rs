//! Facet types for the roach configuration schema.
//!
//! The configuration describes how to reach a CockroachDB cluster. It is read
//! from `.config/roach.styx` and can be overridden field by field with
//! `COCKROACH_*` environment variables.

use facet::Facet;
use std::str::FromStr;

/// Port CockroachDB listens on for SQL clients unless told otherwise.
pub const DEFAULT_PORT: u16 = 26257;

/// Database used when an operation is not scoped to a particular database.
pub const DEFAULT_DATABASE: &str = "defaultdb";

/// Connection settings for a CockroachDB cluster.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Config {
    /// Cluster host name.
    pub host: String,

    /// SQL user to connect as.
    pub user: String,

    /// SQL port, 26257 when unset.
    pub port: Option<u16>,

    /// Database for operations that are not scoped to one, `defaultdb` when unset.
    pub database: Option<String>,

    /// Give up connecting after this many seconds.
    pub connect_timeout_secs: Option<u64>,

    /// TLS settings. Without them the connection is not encrypted.
    pub sslconfig: Option<SslConfig>,
}

/// TLS settings.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct SslConfig {
    pub mode: SslMode,

    /// Path to the CA certificate (PEM).
    pub rootcert: Option<String>,

    /// Path to the client certificate (PEM).
    pub cert: Option<String>,

    /// Path to the client private key (PEM).
    pub key: Option<String>,
}

/// How strictly the server certificate is checked.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq)]
#[facet(rename_all = "kebab-case")]
#[repr(u8)]
pub enum SslMode {
    Disable,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(SslMode::Disable),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(format!(
                "unknown sslmode `{other}`, expected one of disable, require, verify-ca, verify-full"
            )),
        }
    }
}

/// Errors raised while applying environment overrides.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("{0} must be set when no configuration file is present")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// SQL port, falling back to [`DEFAULT_PORT`].
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Database for unscoped operations, falling back to [`DEFAULT_DATABASE`].
    pub fn default_database(&self) -> &str {
        match self.database.as_deref() {
            Some(db) if !db.trim().is_empty() => db,
            _ => DEFAULT_DATABASE,
        }
    }

    /// Resolve the database an operation connects to. Blank means the default.
    pub fn resolve_database<'a>(&'a self, database: &'a str) -> &'a str {
        if database.trim().is_empty() {
            self.default_database()
        } else {
            database
        }
    }

    /// The effective TLS mode.
    pub fn ssl_mode(&self) -> SslMode {
        self.sslconfig
            .as_ref()
            .map(|ssl| ssl.mode)
            .unwrap_or(SslMode::Disable)
    }

    /// Connection URL for `database`, in the form CockroachDB prints for clients.
    ///
    /// Used for logging; it never contains a password.
    pub fn connection_url(&self, database: &str) -> String {
        let mut url = format!(
            "postgresql://{}@{}:{}/{}?sslmode={}",
            self.user,
            self.host,
            self.port(),
            self.resolve_database(database),
            self.ssl_mode().as_str()
        );
        if let Some(ssl) = &self.sslconfig {
            for (name, value) in [
                ("sslrootcert", &ssl.rootcert),
                ("sslcert", &ssl.cert),
                ("sslkey", &ssl.key),
            ] {
                if let Some(value) = value {
                    url.push_str(&format!("&{name}={value}"));
                }
            }
        }
        url
    }

    /// Build a configuration from environment variables alone.
    ///
    /// `COCKROACH_HOST` and `COCKROACH_USER` are required.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, EnvError> {
        let host = lookup("COCKROACH_HOST").ok_or(EnvError::Missing("COCKROACH_HOST"))?;
        let user = lookup("COCKROACH_USER").ok_or(EnvError::Missing("COCKROACH_USER"))?;
        let mut config = Config {
            host,
            user,
            port: None,
            database: None,
            connect_timeout_secs: None,
            sslconfig: None,
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Override fields from `COCKROACH_*` environment variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), EnvError> {
        if let Some(host) = lookup("COCKROACH_HOST") {
            self.host = host;
        }
        if let Some(user) = lookup("COCKROACH_USER") {
            self.user = user;
        }
        if let Some(port) = lookup("COCKROACH_PORT") {
            let parsed = port.parse::<u16>().map_err(|e| EnvError::Invalid {
                var: "COCKROACH_PORT",
                value: port.clone(),
                reason: e.to_string(),
            })?;
            self.port = Some(parsed);
        }
        if let Some(database) = lookup("COCKROACH_DATABASE") {
            self.database = Some(database);
        }

        if let Some(mode) = lookup("COCKROACH_SSLMODE") {
            let parsed = mode.parse::<SslMode>().map_err(|reason| EnvError::Invalid {
                var: "COCKROACH_SSLMODE",
                value: mode.clone(),
                reason,
            })?;
            self.ssl_mut().mode = parsed;
        }
        if let Some(rootcert) = lookup("COCKROACH_SSLROOTCERT") {
            self.ssl_mut().rootcert = Some(rootcert);
        }
        if let Some(cert) = lookup("COCKROACH_SSLCERT") {
            self.ssl_mut().cert = Some(cert);
        }
        if let Some(key) = lookup("COCKROACH_SSLKEY") {
            self.ssl_mut().key = Some(key);
        }
        Ok(())
    }

    fn ssl_mut(&mut self) -> &mut SslConfig {
        self.sslconfig.get_or_insert(SslConfig {
            mode: SslMode::Disable,
            rootcert: None,
            cert: None,
            key: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn base() -> Config {
        Config {
            host: "localhost".into(),
            user: "root".into(),
            port: None,
            database: None,
            connect_timeout_secs: None,
            sslconfig: None,
        }
    }

    #[test]
    fn defaults() {
        let config = base();
        assert_eq!(config.port(), 26257);
        assert_eq!(config.default_database(), "defaultdb");
        assert_eq!(config.resolve_database(""), "defaultdb");
        assert_eq!(config.resolve_database("  "), "defaultdb");
        assert_eq!(config.resolve_database("shop"), "shop");
        assert_eq!(config.ssl_mode(), SslMode::Disable);
    }

    #[test]
    fn connection_url_includes_tls_files() {
        let mut config = base();
        config.sslconfig = Some(SslConfig {
            mode: SslMode::VerifyCa,
            rootcert: Some("/certs/ca.crt".into()),
            cert: Some("/certs/client.root.crt".into()),
            key: Some("/certs/client.root.key".into()),
        });
        assert_eq!(
            config.connection_url(""),
            "postgresql://root@localhost:26257/defaultdb?sslmode=verify-ca\
             &sslrootcert=/certs/ca.crt&sslcert=/certs/client.root.crt&sslkey=/certs/client.root.key"
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = base();
        config
            .apply_env(env(&[
                ("COCKROACH_HOST", "db.internal"),
                ("COCKROACH_PORT", "26000"),
                ("COCKROACH_SSLMODE", "verify-full"),
                ("COCKROACH_SSLROOTCERT", "/ca.crt"),
            ]))
            .unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.user, "root");
        assert_eq!(config.port(), 26000);
        let ssl = config.sslconfig.unwrap();
        assert_eq!(ssl.mode, SslMode::VerifyFull);
        assert_eq!(ssl.rootcert.as_deref(), Some("/ca.crt"));
    }

    #[test]
    fn env_rejects_bad_port() {
        let mut config = base();
        let err = config
            .apply_env(env(&[("COCKROACH_PORT", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            EnvError::Invalid {
                var: "COCKROACH_PORT",
                ..
            }
        ));
    }

    #[test]
    fn env_rejects_unknown_sslmode() {
        let mut config = base();
        let err = config
            .apply_env(env(&[("COCKROACH_SSLMODE", "prefer")]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown sslmode `prefer`"));
    }

    #[test]
    fn from_env_requires_host_and_user() {
        let err = Config::from_env(env(&[("COCKROACH_USER", "root")])).unwrap_err();
        assert!(matches!(err, EnvError::Missing("COCKROACH_HOST")));

        let config = Config::from_env(env(&[
            ("COCKROACH_HOST", "localhost"),
            ("COCKROACH_USER", "root"),
            ("COCKROACH_DATABASE", "shop"),
        ]))
        .unwrap();
        assert_eq!(config.default_database(), "shop");
    }
}
