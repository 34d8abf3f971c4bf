use env_logger::{Builder, Env, WriteStyle};

/// Used when neither the caller nor `RUST_LOG` sets a filter. Quiets wgpu's internals.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"strata_engine=debug"`. Overrides `RUST_LOG`.
    pub filter: Option<String>,
    /// Millisecond timestamps, for lining monitor reports up with frames.
    pub timestamps: bool,
    pub color: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None, timestamps: true, color: WriteStyle::Auto }
    }
}

/// Installs `env_logger` as the global logger.
///
/// Returns `false` when a logger was already installed (by an earlier call or by the
/// embedding host); the existing logger is kept.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut builder = match &config.filter {
        Some(filter) => {
            let mut b = Builder::new();
            b.parse_filters(filter);
            b
        }
        None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
    };

    builder.write_style(config.color);
    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }

    let installed = builder.try_init().is_ok();
    if installed {
        log::debug!("logger installed");
    }
    installed
}
