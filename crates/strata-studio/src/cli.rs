use std::time::Duration;

use strata_engine::logging::LoggingConfig;

#[derive(clap::Parser, Debug)]
#[command(name = "strata-studio", version, about = "Drive the strata renderer with a synthetic scene", long_about = None)]
pub struct Arguments {
    /// Number of objects in the synthetic scene
    #[arg(short, long, default_value_t = 5_000)]
    pub objects: usize,

    /// Render into a recording backend instead of a window
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub headless: bool,

    /// Stop after this many frames (0 runs until the window closes)
    #[arg(short, long, default_value_t = 0)]
    pub frames: u64,

    /// Performance sampling interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Seed for scene generation
    #[arg(long, default_value_t = 0x5EED)]
    pub seed: u64,

    /// Log filter in env_logger syntax (defaults to RUST_LOG, then "info")
    #[arg(long)]
    pub log: Option<String>,
}

impl Arguments {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// `None` when the run is unbounded.
    pub fn frame_limit(&self) -> Option<u64> {
        (self.frames > 0).then_some(self.frames)
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults() {
        let args = Arguments::parse_from(["strata-studio"]);
        assert_eq!(args.objects, 5_000);
        assert!(!args.headless);
        assert_eq!(args.frame_limit(), None);
        assert_eq!(args.interval(), Duration::from_secs(1));
    }

    #[test]
    fn headless_benchmark_flags() {
        let args = Arguments::parse_from([
            "strata-studio", "--headless", "-o", "200", "-f", "120", "--interval-ms", "250", "--log", "debug",
        ]);
        assert!(args.headless);
        assert_eq!((args.objects, args.frame_limit()), (200, Some(120)));
        assert_eq!(args.interval(), Duration::from_millis(250));
        assert_eq!(args.logging().filter.as_deref(), Some("debug"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Arguments::try_parse_from(["strata-studio", "--interval-ms", "0"]).is_err());
    }
}
