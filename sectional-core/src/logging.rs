//! Logging setup on the standard `log` facade
//!
//! Configure once at startup, then use the standard macros everywhere.
//! Safe to call repeatedly; only the first call takes effect.

use std::io::Write;
use std::sync::Once;

use log::LevelFilter;

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Initialize the global logger from configuration
pub fn init(config: &LoggingConfig) {
    INIT.call_once(|| {
        let level = match config.level.as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };

        let mut builder = env_logger::Builder::new();
        builder.filter_level(level);

        if config.format == "json" {
            builder.format(|buf, record| {
                let line = serde_json::json!({
                    "ts": chrono::Utc::now().to_rfc3339(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            });
        }

        let _ = builder.try_init();
    });
}
