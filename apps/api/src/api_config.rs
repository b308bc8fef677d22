use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use formcraft_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 5000;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Runtime configuration for the API process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub database: Option<DatabaseConfig>,
}

impl ApiConfig {
    /// Reads configuration from the process environment and arguments.
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = non_empty("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_owned());
        let api_port = non_empty("API_PORT")
            .map(|value| {
                value.trim().parse::<u16>().map_err(|error| {
                    AppError::Validation(format!("invalid API_PORT '{value}': {error}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_API_PORT);
        let frontend_url =
            non_empty("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());

        let max_connections = non_empty("DATABASE_MAX_CONNECTIONS")
            .map(|value| {
                value.trim().parse::<u32>().map_err(|error| {
                    AppError::Validation(format!(
                        "invalid DATABASE_MAX_CONNECTIONS '{value}': {error}"
                    ))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);
        let database = non_empty("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections,
        });

        if migrate_only && database.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            frontend_url,
            database,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use formcraft_core::AppError;

    use super::{ApiConfig, DatabaseConfig};

    fn config_from(
        migrate_only: bool,
        variables: &[(&str, &str)],
    ) -> Result<ApiConfig, AppError> {
        let variables: HashMap<String, String> = variables
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(migrate_only, |name| variables.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config_from(false, &[]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_host, "127.0.0.1");
        assert_eq!(config.api_port, 5000);
        assert_eq!(config.frontend_url, "http://localhost:5173");
        assert!(config.database.is_none());
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:5000".to_owned())
        );
    }

    #[test]
    fn database_settings_are_read_when_url_is_set() {
        let config = config_from(
            false,
            &[
                ("DATABASE_URL", "postgres://localhost/forms"),
                ("DATABASE_MAX_CONNECTIONS", "4"),
                ("API_PORT", "8080"),
            ],
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            config.database,
            Some(DatabaseConfig {
                url: "postgres://localhost/forms".to_owned(),
                max_connections: 4,
            })
        );
        assert_eq!(config.api_port, 8080);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = config_from(false, &[("DATABASE_URL", "  ")]);
        assert_eq!(config.ok().and_then(|config| config.database), None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let config = config_from(false, &[("API_PORT", "not-a-port")]);
        assert!(matches!(config, Err(AppError::Validation(_))));
    }

    #[test]
    fn migrate_requires_database_url() {
        let config = config_from(true, &[]);
        assert!(matches!(config, Err(AppError::Validation(_))));
    }

    #[test]
    fn invalid_host_is_rejected_when_binding() {
        let config = config_from(false, &[("API_HOST", "localhost:80")])
            .unwrap_or_else(|_| unreachable!());
        assert!(config.socket_address().is_err());
    }
}
