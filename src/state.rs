use std::path::PathBuf;
use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::core::repository::CityInfoRepository;
use crate::error::{AppError, Result};
use crate::notify::{LocalMailService, MailService};

/// Maximum page size a client may request for city listings.
pub const MAX_CITIES_PAGE_SIZE: u32 = 20;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_SIZE: usize = 20_871_520;

/// Signing and validation settings for bearer tokens.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Base64-encoded HS256 signing secret
    pub secret: String,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Token validity window in seconds from issuance
    pub token_ttl_secs: i64,
}

/// Mail notification settings.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub to_address: String,
    pub from_address: String,
}

/// Configuration for the application
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite connection string
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Directory for uploaded and downloadable files
    pub file_dir: PathBuf,
    /// City whose users may mutate points of interest
    pub policy_city: String,
    /// Token settings
    pub auth: AuthConfig,
    /// Mail settings
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from the environment, falling back to development
    /// defaults. `.env` files are honoured when loaded by the caller.
    pub fn from_env() -> Result<Self> {
        let token_ttl_secs = match std::env::var("CITYINFO_TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|e| AppError::Config(format!("invalid CITYINFO_TOKEN_TTL_SECS: {}", e)))?,
            Err(_) => 3600,
        };

        Ok(Self {
            database_url: env_or("CITYINFO_DATABASE_URL", "sqlite://cityinfo.db"),
            bind_addr: env_or("CITYINFO_BIND_ADDR", "127.0.0.1:3000"),
            file_dir: PathBuf::from(env_or("CITYINFO_FILE_DIR", "files")),
            policy_city: env_or("CITYINFO_POLICY_CITY", "Antwerp"),
            auth: AuthConfig {
                secret: env_or(
                    "CITYINFO_AUTH_SECRET",
                    "Y2l0eWluZm8gZGV2LW9ubHkgc2lnbmluZyBzZWNyZXQsIHJlcGxhY2UgaW4gcHJvZHVjdGlvbg==",
                ),
                issuer: env_or("CITYINFO_AUTH_ISSUER", "https://localhost:3000"),
                audience: env_or("CITYINFO_AUTH_AUDIENCE", "cityinfoapi"),
                token_ttl_secs,
            },
            mail: MailConfig {
                to_address: env_or("CITYINFO_MAIL_TO", "admin@cityinfo.example"),
                from_address: env_or("CITYINFO_MAIL_FROM", "noreply@cityinfo.example"),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Application state that can be shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Repository over cities and points of interest
    pub repo: CityInfoRepository,
    /// Fire-and-forget mail notifier
    pub mail: Arc<dyn MailService>,
}

impl AppState {
    /// Create application state over an open database pool.
    pub fn new(config: Config, pool: SqlitePool) -> Arc<Self> {
        let mail = Arc::new(LocalMailService::new(
            config.mail.from_address.clone(),
            config.mail.to_address.clone(),
        ));

        Arc::new(Self {
            repo: CityInfoRepository::new(pool),
            config,
            mail,
        })
    }

    /// Create application state with a custom mail service.
    pub fn with_mail(config: Config, pool: SqlitePool, mail: Arc<dyn MailService>) -> Arc<Self> {
        Arc::new(Self {
            repo: CityInfoRepository::new(pool),
            config,
            mail,
        })
    }
}
