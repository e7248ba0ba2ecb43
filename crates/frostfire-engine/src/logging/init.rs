use std::sync::Once;

/// Crates whose `info` output drowns the demos' own logs.
const NOISY_CRATES: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "frostfire_demos=debug,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Builds a filter from `-v` / `-q` style counters.
    ///
    /// Zero verbosity keeps `RUST_LOG` (or the default) in charge.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => Some(log::LevelFilter::Warn),
            (false, 0) => None,
            (false, 1) => Some(log::LevelFilter::Debug),
            (false, _) => Some(log::LevelFilter::Trace),
        };
        Self {
            env_filter: level.map(filter_for),
            ..Self::default()
        }
    }
}

/// Filter string for `level` that keeps the GPU stack at `warn`.
fn filter_for(level: log::LevelFilter) -> String {
    let mut filter = level.to_string().to_lowercase();
    for c in NOISY_CRATES {
        filter.push_str(&format!(",{c}=warn"));
    }
    filter
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.parse_filters(&filter_for(log::LevelFilter::Info));
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_verbosity_defers_to_env() {
        assert_eq!(LoggingConfig::from_verbosity(0, false).env_filter, None);
    }

    #[test]
    fn verbosity_levels() {
        let f = LoggingConfig::from_verbosity(1, false).env_filter.unwrap();
        assert!(f.starts_with("debug,"));
        let f = LoggingConfig::from_verbosity(3, false).env_filter.unwrap();
        assert!(f.starts_with("trace,"));
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let f = LoggingConfig::from_verbosity(2, true).env_filter.unwrap();
        assert_eq!(f, "warn,wgpu_core=warn,wgpu_hal=warn,naga=warn");
    }
}
