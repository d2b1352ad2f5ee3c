use crate::auth::jwt::JwtConfig;

/// Credentials for the administrator account created at startup when no
/// account with that email exists yet.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// How long shutdown waits for background tasks, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Analytics snapshot refresh period in seconds (default: `20`).
    pub analytics_refresh_secs: u64,
    /// Base URL of the OCR service (default: `http://localhost:5000`).
    pub ocr_service_url: String,
    /// Timeout for OCR requests in seconds (default: `20`).
    pub ocr_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Optional first administrator, from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shorter than the request timeout so a stalled OCR call surfaces as an
/// OCR error rather than a generic request timeout.
const DEFAULT_OCR_TIMEOUT_SECS: u64 = 20;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:8081`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `ANALYTICS_REFRESH_SECS` | `20`                       |
    /// | `OCR_SERVICE_URL`        | `http://localhost:5000`    |
    /// | `OCR_TIMEOUT_SECS`       | `20`                       |
    /// | `ADMIN_EMAIL`            | unset                      |
    /// | `ADMIN_PASSWORD`         | unset                      |
    /// | `ADMIN_FULL_NAME`        | `Administrator`            |
    ///
    /// # Panics
    ///
    /// Panics on unparsable numbers and on missing JWT settings.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:8081")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", &DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let analytics_refresh_secs: u64 = env_or("ANALYTICS_REFRESH_SECS", "20")
            .parse()
            .expect("ANALYTICS_REFRESH_SECS must be a valid u64");
        assert!(analytics_refresh_secs > 0, "ANALYTICS_REFRESH_SECS must be positive");

        let ocr_service_url = env_or("OCR_SERVICE_URL", "http://localhost:5000");

        let ocr_timeout_secs: u64 = env_or("OCR_TIMEOUT_SECS", &DEFAULT_OCR_TIMEOUT_SECS.to_string())
            .parse()
            .expect("OCR_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let admin_bootstrap = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    email,
                    password,
                    full_name: env_or("ADMIN_FULL_NAME", "Administrator"),
                })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            analytics_refresh_secs,
            ocr_service_url,
            ocr_timeout_secs,
            jwt,
            admin_bootstrap,
        }
    }
}
