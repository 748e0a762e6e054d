//! Application configuration management.

use serde::Deserialize;

/// Minimum accepted length of the JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration. The secret has no default.
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .finish()
    }
}

fn default_access_token_expiry() -> u64 {
    259_200 // 72 hours
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `FINTRACK__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Rejects configurations the server must not start with.
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT secret is shorter than [`MIN_JWT_SECRET_LEN`]
    /// or the token expiry is zero.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt.secret.trim().len() < MIN_JWT_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "jwt.secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }
        if self.jwt.access_token_expiry_secs == 0 {
            return Err(config::ConfigError::Message(
                "jwt.access_token_expiry_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FINTRACK__JWT__SECRET", Some(SECRET)),
                ("FINTRACK__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.jwt.access_token_expiry_secs, 259_200);
                assert_eq!(config.database.max_connections, 10);
            },
        );
    }

    #[test]
    fn test_load_fails_without_secret() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FINTRACK__JWT__SECRET", None::<&str>),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_load_rejects_short_secret() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FINTRACK__JWT__SECRET", Some("short")),
            ],
            || {
                let err = AppConfig::load().unwrap_err();
                assert!(err.to_string().contains("jwt.secret"));
            },
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig {
            secret: SECRET.to_string(),
            access_token_expiry_secs: 60,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("[hidden]"));
    }
}
