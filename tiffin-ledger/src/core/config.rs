use chrono_tz::Tz;

use crate::utils::time::parse_timezone;

/// Ledger configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, logs) |
/// | DATABASE_PATH | <WORK_DIR>/tiffin.db | SQLite file |
/// | BUSINESS_TIMEZONE | UTC | IANA zone that defines "today" |
/// | LOG_LEVEL | info | Fallback when RUST_LOG is unset |
/// | LOG_DIR | - | Daily rolling log files when the directory exists |
/// | ENVIRONMENT | development | `production` switches logs to JSON lines |
/// | OPERATOR_SECRET | - | Enables operator self-registration |
/// | SEED_OPERATOR_EMAIL | admin@tiffin.com | Default operator |
/// | SEED_OPERATOR_NAME | Admin | Default operator display name |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/tiffin BUSINESS_TIMEZONE=Asia/Kolkata cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub timezone: Tz,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
    /// Operator self-registration is disabled when `None`
    pub operator_secret: Option<String>,
    pub seed_operator_email: String,
    pub seed_operator_name: String,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = env_opt("WORK_DIR").unwrap_or_else(|| "./data".into());
        let database_path =
            env_opt("DATABASE_PATH").unwrap_or_else(|| format!("{work_dir}/tiffin.db"));

        let timezone = match env_opt("BUSINESS_TIMEZONE") {
            Some(name) => parse_timezone(&name).unwrap_or_else(|| {
                tracing::warn!(timezone = %name, "Unknown BUSINESS_TIMEZONE, using UTC");
                chrono_tz::UTC
            }),
            None => chrono_tz::UTC,
        };

        Self {
            work_dir,
            database_path,
            timezone,
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            operator_secret: env_opt("OPERATOR_SECRET"),
            seed_operator_email: env_opt("SEED_OPERATOR_EMAIL")
                .unwrap_or_else(|| "admin@tiffin.com".into()),
            seed_operator_name: env_opt("SEED_OPERATOR_NAME").unwrap_or_else(|| "Admin".into()),
        }
    }

    /// Environment config rooted at `work_dir`; used by tests
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/tiffin.db", config.work_dir);
        config
    }

    /// Production logs as JSON lines
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
