use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "vista_engine=debug,wgpu_core=warn"). `write_style` controls ANSI
/// coloring.
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

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Intended usage is early in
/// `main`. With no explicit filter and no `RUST_LOG`, defaults to info-level
/// output with the chattier wgpu internals held at warn.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
            builder.filter_module("wgpu_core", log::LevelFilter::Warn);
            builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
