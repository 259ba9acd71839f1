/// Outpass service configuration loaded from environment variables.
#[derive(Debug)]
pub struct OutpassConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing and validating access tokens.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 5000). Env var: `OUTPASS_PORT`.
    pub outpass_port: u16,
    /// Lifetime of a staff notification in hours (default 12).
    /// Env var: `NOTIFICATION_TTL_HOURS`.
    pub notification_ttl_hours: i64,
    /// Seconds between expired-notification sweeps (default 60).
    /// Env var: `NOTIFICATION_PURGE_INTERVAL_SECS`.
    pub notification_purge_interval_secs: u64,
}

impl OutpassConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            outpass_port: std::env::var("OUTPASS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            notification_ttl_hours: std::env::var("NOTIFICATION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(12),
            notification_purge_interval_secs: std::env::var("NOTIFICATION_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &u64| *s > 0)
                .unwrap_or(60),
        }
    }
}
