use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::auth::login_code::LoginCodeConfig;

/// Where the [`trialsite_db::Store`] keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process only; everything is lost on restart.
    Memory,
    /// In-process, mirrored to a JSON file after every write.
    Json { path: PathBuf },
    /// Postgres via `sqlx`; migrations run at startup.
    Postgres { database_url: String },
}

/// Default location of the JSON data file.
const DEFAULT_DATA_FILE: &str = "data/trialsite.json";

impl StorageBackend {
    /// Resolve `STORAGE_BACKEND` and its companion variables.
    pub fn parse(
        kind: &str,
        data_file: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, String> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "json" => Ok(Self::Json {
                path: PathBuf::from(data_file.unwrap_or_else(|| DEFAULT_DATA_FILE.into())),
            }),
            "postgres" => database_url
                .filter(|url| !url.is_empty())
                .map(|database_url| Self::Postgres { database_url })
                .ok_or_else(|| "DATABASE_URL must be set when STORAGE_BACKEND=postgres".into()),
            other => Err(format!(
                "Unknown STORAGE_BACKEND '{other}'. Valid: [\"memory\", \"json\", \"postgres\"]"
            )),
        }
    }
}

/// Credentials for the platform super admin created at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// `JWT_SECRET`. In production, override via environment variables.
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
    /// How long to wait for background jobs after shutdown begins (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub storage: StorageBackend,
    pub jwt: JwtConfig,
    pub login_codes: LoginCodeConfig,
    /// Set only when both bootstrap variables are present.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `STORAGE_BACKEND`          | `json`                     |
    /// | `DATA_FILE`                | `data/trialsite.json`      |
    /// | `DATABASE_URL`             | -- (required for postgres) |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | --                         |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | --                         |
    ///
    /// JWT and login-code variables are documented on [`JwtConfig::from_env`]
    /// and [`LoginCodeConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let storage = StorageBackend::parse(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "json".into()),
            std::env::var("DATA_FILE").ok(),
            std::env::var("DATABASE_URL").ok(),
        )
        .unwrap_or_else(|msg| panic!("{msg}"));

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            storage,
            jwt: JwtConfig::from_env(),
            login_codes: LoginCodeConfig::from_env(),
            bootstrap_admin,
        }
    }
}
