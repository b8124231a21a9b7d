use crate::auth::jwt::JwtConfig;

/// Which [`TableStore`](aset_db::store::TableStore) backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatastoreKind {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process-local tables, lost on restart.
    Memory,
}

impl DatastoreKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub datastore: DatastoreKind,
    /// Token settings; `None` leaves the session stage disabled.
    pub auth: Option<JwtConfig>,
    /// Write an `aset_logs` entry after every successful mutation.
    pub audit_log_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATASTORE`            | `postgres`                 |
    /// | `AUTH_ENABLED`         | `false`                    |
    /// | `AUDIT_LOG_ENABLED`    | `false`                    |
    ///
    /// When `AUTH_ENABLED` is set, [`JwtConfig::from_env`] is read as well.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let datastore = std::env::var("DATASTORE")
            .map(|raw| DatastoreKind::parse(&raw).expect("DATASTORE must be `postgres` or `memory`"))
            .unwrap_or(DatastoreKind::Postgres);

        let auth = env_flag("AUTH_ENABLED").then(JwtConfig::from_env);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            datastore,
            auth,
            audit_log_enabled: env_flag("AUDIT_LOG_ENABLED"),
        }
    }
}

/// Read a boolean switch. Unset means `false`.
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| parse_flag(&v).unwrap_or_else(|| panic!("{name} must be true or false")))
        .unwrap_or(false)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
