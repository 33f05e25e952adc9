/// Configuration management for the API server
///
/// Loaded once at startup from environment variables (a `.env` file is
/// honoured in development).
///
/// # Environment Variables
///
/// - `API_HOST` / `API_PORT`: bind address (default: 0.0.0.0:8080)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for permissive
/// - `PRODUCTION`: enables HSTS and secure cookies (default: false)
/// - `COOKIE_SECURE`: overrides the cookie `Secure` flag
/// - `ENABLE_DEBUG_ROUTES`: mounts `/api/debug/*` (default: false)
/// - `REPORTS_SURFACE_ERRORS`: report failures return 500 instead of an empty list
/// - `RUN_MIGRATIONS`: applies the reference schema on startup
/// - `MYSQL_HOST`, `MYSQL_USER`, `MYSQL_DATABASE`: required
/// - `MYSQL_PORT` (3306), `MYSQL_PASSWORD` (empty), `DATABASE_MAX_CONNECTIONS` (10)
/// - `JWT_SECRET`: required, at least 32 characters, no default
/// - `JWT_TTL_HOURS`: session lifetime (default: 8)
///
/// # Example
///
/// ```no_run
/// use medgas_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context as _;
use medgas_shared::db::pool::DatabaseConfig;
use std::{env, fmt, str::FromStr};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database connection settings
    pub database: DatabaseConfig,

    /// Session token settings
    pub jwt: JwtConfig,

    /// Optional behaviour switches
    pub features: FeatureFlags,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` means permissive)
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS)
    pub production: bool,

    /// `Secure` attribute on the session cookie
    pub cookie_secure: bool,
}

/// Session token configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session lifetime in hours
    pub ttl_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Mount the admin-only diagnostics under `/api/debug`
    pub debug_routes: bool,

    /// Report endpoints return 500 on persistence failure instead of an
    /// empty successful list
    pub reports_surface_errors: bool,

    /// Apply `migrations/` at startup
    pub run_migrations: bool,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `JWT_SECRET` is shorter than 32 characters.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let production = parse_or(&lookup, "PRODUCTION", false)?;

        let api = ApiConfig {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "API_PORT", 8080)?,
            cors_origins: parse_origins(lookup("CORS_ORIGINS").as_deref().unwrap_or("*")),
            production,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", production)?,
        };

        let database = DatabaseConfig {
            host: required("MYSQL_HOST")?,
            port: parse_or(&lookup, "MYSQL_PORT", 3306)?,
            user: required("MYSQL_USER")?,
            password: lookup("MYSQL_PASSWORD").unwrap_or_default(),
            database: required("MYSQL_DATABASE")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            ..DatabaseConfig::default()
        };

        let secret = required("JWT_SECRET")?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let ttl_hours = parse_or(&lookup, "JWT_TTL_HOURS", 8)?;
        if ttl_hours <= 0 {
            anyhow::bail!("JWT_TTL_HOURS must be positive");
        }

        let features = FeatureFlags {
            debug_routes: parse_or(&lookup, "ENABLE_DEBUG_ROUTES", false)?,
            reports_surface_errors: parse_or(&lookup, "REPORTS_SURFACE_ERRORS", false)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", false)?,
        };

        Ok(Self {
            api,
            database,
            jwt: JwtConfig { secret, ttl_hours },
            features,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.ttl_hours)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
