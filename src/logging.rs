//! Logging setup and scoped event macros.
//!
//! Compact timestamped output with per-target level configuration.
//! `RUST_LOG` overrides whatever the settings file says.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! contentkit = "debug"
//! ```
//!
//! ```bash
//! RUST_LOG=contentkit=debug contentkit watch
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Build the filter directive string from a logging config.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config.default.clone();
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();
    for (module, level) in modules {
        directives.push_str(&format!(",{module}={level}"));
    }
    directives
}

/// Initialize logging with configuration.
///
/// Only the first call takes effect. `verbose` raises the default level to
/// `info` unless `RUST_LOG` is set.
pub fn init_with_config(config: &LoggingConfig, verbose: bool) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            let mut raised = config.clone();
            raised.default = "info".to_string();
            EnvFilter::new(filter_directives(&raised))
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_timer(CompactTime)
            .with_level(true)
            .with_writer(std::io::stderr)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event with scope context.
///
/// # Examples
/// ```ignore
/// log_event!("tracker", "manifest written", "{}", path.display());
/// log_event!("tracker", "ready");
/// ```
#[macro_export]
macro_rules! log_event {
    ($scope:expr, $event:expr) => {
        tracing::info!("[{}] {}", $scope, $event)
    };
    ($scope:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $scope, $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
///
/// # Examples
/// ```ignore
/// debug_event!("tracker", "queued", "{}", event);
/// ```
#[macro_export]
macro_rules! debug_event {
    ($scope:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $scope, $event)
    };
    ($scope:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $scope, $event, format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_directives_sorted() {
        let mut modules = HashMap::new();
        modules.insert("watcher".to_string(), "trace".to_string());
        modules.insert("content".to_string(), "debug".to_string());

        let config = LoggingConfig {
            default: "warn".to_string(),
            modules,
        };

        assert_eq!(
            filter_directives(&config),
            "warn,content=debug,watcher=trace"
        );
    }
}
