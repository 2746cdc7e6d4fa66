use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a scrape run, read from `PRICEWALK_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub ready_timeout_secs: u64,
    /// When set, the first loaded page's source is written here.
    pub debug_html_path: Option<PathBuf>,
}

impl AppConfig {
    /// Upper bound on how long to wait for product containers after a
    /// page load or pagination click.
    #[must_use]
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
