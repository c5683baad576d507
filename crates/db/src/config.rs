use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{PgClient, RestClient, TableClient};
use crate::error::StoreError;
use crate::local::FileStore;

/// Configuration errors. Reported to the caller instead of panicking.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Which persistence client to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// The hosted backend's REST table API.
    #[default]
    Rest,
    /// A direct Postgres connection.
    Postgres,
}

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Project URL of the hosted backend. Required for `Rest`.
    pub api_url: Option<String>,
    /// Anonymous API key. Required for `Rest`.
    pub anon_key: Option<String>,
    /// Service key for admin calls; admin operations fail without it.
    pub service_key: Option<String>,
    /// Required for `Postgres`.
    pub database_url: Option<String>,
    /// Separate admin connection; falls back to `database_url`.
    pub admin_database_url: Option<String>,
    /// File backing the local key/value store.
    pub local_store_path: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `STORE_BACKEND`        | `rest`                   |
    /// | `STORE_API_URL`        | required for `rest`      |
    /// | `STORE_ANON_KEY`       | required for `rest`      |
    /// | `STORE_SERVICE_KEY`    | unset                    |
    /// | `DATABASE_URL`         | required for `postgres`  |
    /// | `ADMIN_DATABASE_URL`   | unset                    |
    /// | `LOCAL_STORE_PATH`     | `storefront-local.json`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("rest") => StoreBackend::Rest,
            Some("postgres") => StoreBackend::Postgres,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            None => 30,
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                value: raw,
            })?,
        };

        let config = Self {
            backend,
            api_url: var("STORE_API_URL"),
            anon_key: var("STORE_ANON_KEY"),
            service_key: var("STORE_SERVICE_KEY"),
            database_url: var("DATABASE_URL"),
            admin_database_url: var("ADMIN_DATABASE_URL"),
            local_store_path: var("LOCAL_STORE_PATH")
                .unwrap_or_else(|| "storefront-local.json".into())
                .into(),
            request_timeout_secs,
        };

        match config.backend {
            StoreBackend::Rest => {
                config.rest_credentials()?;
            }
            StoreBackend::Postgres => {
                if config.database_url.is_none() {
                    return Err(ConfigError::Missing("DATABASE_URL"));
                }
            }
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `(api_url, anon_key)` for the REST and auth clients.
    pub fn rest_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = self
            .api_url
            .as_deref()
            .ok_or(ConfigError::Missing("STORE_API_URL"))?;
        let key = self
            .anon_key
            .as_deref()
            .ok_or(ConfigError::Missing("STORE_ANON_KEY"))?;
        Ok((url, key))
    }

    /// Build the configured persistence client.
    pub async fn connect(&self) -> Result<Arc<dyn TableClient>, StoreError> {
        match self.backend {
            StoreBackend::Rest => {
                let (url, key) = self.rest_credentials()?;
                if self.service_key.is_none() {
                    tracing::warn!("STORE_SERVICE_KEY not set, admin operations are disabled");
                }
                let client =
                    RestClient::new(url, key, self.service_key.clone(), self.request_timeout())?;
                tracing::info!(url, "Using REST store");
                Ok(Arc::new(client))
            }
            StoreBackend::Postgres => {
                let url = self
                    .database_url
                    .as_deref()
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;
                let pool = crate::create_pool(url).await?;
                crate::health_check(&pool).await?;
                let client = match &self.admin_database_url {
                    Some(admin_url) => {
                        let admin = crate::create_pool(admin_url).await?;
                        PgClient::public_only(pool).with_admin_pool(admin)
                    }
                    None => PgClient::new(pool),
                };
                tracing::info!("Using Postgres store");
                Ok(Arc::new(client))
            }
        }
    }

    pub fn open_local_store(&self) -> FileStore {
        FileStore::new(&self.local_store_path)
    }
}
