use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr: stdout carries the report.
pub fn init_logging(config: &crate::config::Config) {
    let level = Level::from_str(&config.logs.level).unwrap_or(Level::INFO);

    let mut filter = EnvFilter::new(level.as_str().to_ascii_lowercase());
    if !config.logs.enable_reqwest_logging {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "cookie_store=warn"] {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
