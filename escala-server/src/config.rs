//! Server configuration

use chrono_tz::Tz;

use crate::BoxError;

/// Minimum JWT secret length outside development
const MIN_JWT_SECRET_LEN: usize = 32;

/// First administrator, created at startup when no administrator exists
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub login: String,
    pub password: String,
    pub name: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx SQLite URL
    pub database_url: String,
    /// HTTP port
    pub port: u16,
    /// Environment: development | production | test
    pub environment: String,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,
    /// Timezone used for "today" and day boundaries
    pub business_tz: Tz,
    /// Allowed CORS origin; `None` means permissive in development, closed otherwise
    pub cors_origin: Option<String>,
    /// Login attempts per minute per client IP
    pub login_rate_limit: u32,
    /// Key rate limits by `X-Forwarded-For`; only safe behind a proxy that overwrites it
    pub trust_proxy: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production-use-only")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, BoxError> {
        match std::env::var(name) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| format!("{name} has an invalid value: {raw}").into()),
            _ => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("NODE_ENV").unwrap_or_else(|_| "development".into());

        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(
                format!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long").into(),
            );
        }

        let tz_name =
            std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "America/Sao_Paulo".into());
        let business_tz: Tz = tz_name
            .parse()
            .map_err(|_| format!("BUSINESS_TIMEZONE is not a valid IANA timezone: {tz_name}"))?;

        let jwt_expiration_hours = Self::parse_var("JWT_EXPIRATION_HOURS", 8i64)?;
        if jwt_expiration_hours <= 0 {
            return Err("JWT_EXPIRATION_HOURS must be positive".into());
        }

        let login_rate_limit = Self::parse_var("LOGIN_RATE_LIMIT", 10u32)?;
        if login_rate_limit == 0 {
            return Err("LOGIN_RATE_LIMIT must be at least 1".into());
        }

        let bootstrap_admin = match (std::env::var("ADMIN_LOGIN"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(login), Ok(password)) if !login.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    login,
                    password,
                    name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".into()),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            port: Self::parse_var("BACKEND_PORT", 3333u16)?,
            environment,
            jwt_secret,
            jwt_expiration_hours,
            business_tz,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            login_rate_limit,
            trust_proxy: Self::parse_var("TRUST_PROXY", false)?,
            bootstrap_admin,
        })
    }

    /// In-memory configuration for tests; never reads the environment.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            port: 0,
            environment: "test".into(),
            jwt_secret: "test-secret-with-at-least-thirty-two-chars".into(),
            jwt_expiration_hours: 8,
            business_tz: chrono_tz::America::Sao_Paulo,
            cors_origin: None,
            login_rate_limit: 1_000,
            trust_proxy: false,
            bootstrap_admin: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
