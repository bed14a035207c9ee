/// Core configuration
///
/// # Environment variables
///
/// All configuration items can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | POLL_INTERVAL_SECS | 30 | Snapshot polling interval |
/// | ORDERS_LIMIT | 300 | Max orders returned by a snapshot fetch |
/// | TABLES_COUNT | 10 | Table count used to seed fresh settings |
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Snapshot polling interval in seconds
    pub poll_interval_secs: u64,
    /// Bound on the order listing
    pub orders_limit: usize,
    /// Default table count before settings are loaded
    pub tables_count: u32,
}

impl CoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            orders_limit: std::env::var("ORDERS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(shared::store::ORDERS_LIMIT),
            tables_count: std::env::var("TABLES_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Override selected values.
    ///
    /// Mostly used by tests.
    pub fn with_overrides(poll_interval_secs: u64, tables_count: u32) -> Self {
        let mut config = Self::from_env();
        config.poll_interval_secs = poll_interval_secs;
        config.tables_count = tables_count;
        config
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
