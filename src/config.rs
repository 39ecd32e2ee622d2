use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Where plate photos go. S3 is used when all MinIO variables are present.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        upload_dir: String,
    },
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    /// Zero disables the in-process reminder loop.
    pub reminder_interval_secs: u64,
    pub enable_seed: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:///data/restaurant.db?mode=rwc".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "platelog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "platelog-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = match (
            std::env::var("MINIO_ENDPOINT"),
            std::env::var("MINIO_BUCKET"),
            std::env::var("MINIO_ACCESS_KEY"),
            std::env::var("MINIO_SECRET_KEY"),
        ) {
            (Ok(endpoint), Ok(bucket), Ok(access_key), Ok(secret_key)) => StorageConfig::S3 {
                endpoint,
                bucket,
                access_key,
                secret_key,
            },
            _ => StorageConfig::Local {
                upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".into()),
            },
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            reminder_interval_secs: env_parse("REMINDER_INTERVAL_SECS", 60),
            enable_seed: env_parse("ENABLE_SEED", false),
        })
    }

    pub fn reminder_interval(&self) -> Option<Duration> {
        (self.reminder_interval_secs > 0).then(|| Duration::from_secs(self.reminder_interval_secs))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
