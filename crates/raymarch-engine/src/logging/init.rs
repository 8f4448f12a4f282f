use std::sync::Once;

/// Logger configuration.
///
/// Filter precedence: `env_filter`, then `RUST_LOG`, then `default_level`
/// with wgpu and naga held at warn.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax, e.g. "raymarch_engine=debug,wgpu=warn".
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    /// Per-frame buffer uploads and dispatch sizes at trace level.
    pub trace_frames: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            trace_frames: false,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

const FRAME_MODULE: &str = "raymarch_engine::render";
const QUIET_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

/// Installs the global logger. Later calls do nothing.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match explicit_filter(&config, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
                for module in QUIET_MODULES {
                    builder.filter_module(module, log::LevelFilter::Warn);
                }
            }
        }
        if config.trace_frames {
            builder.filter_module(FRAME_MODULE, log::LevelFilter::Trace);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

/// Filter string that overrides the defaults, if any.
fn explicit_filter(config: &LoggingConfig, rust_log: Option<String>) -> Option<String> {
    config
        .env_filter
        .clone()
        .or(rust_log)
        .filter(|f| !f.trim().is_empty())
}
