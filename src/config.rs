use clap::Parser;
use once_cell::sync::Lazy;

/// Default JWT lifetime in seconds.
pub const JWT_EXPIRES_IN: i64 = 86400i64;

/// Page size used when a list request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 200;

pub const DEFAULT_CAREER_DURATION_YEARS: i32 = 3;

/// Number of entries returned by the activity feed when no limit is given.
pub const ACTIVITY_FEED_LIMIT: u64 = 20;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = 10)]
    pub database_max_connections: u32,

    /// Apply pending migrations before serving.
    #[clap(long, env, default_value_t = true)]
    pub run_migrations: bool,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value_t = JWT_EXPIRES_IN)]
    pub jwt_expires_in: i64,

    #[clap(long, env)]
    pub admin_email: String,

    #[clap(long, env)]
    pub admin_password: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}
