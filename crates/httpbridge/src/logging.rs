use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const BRIDGE_TARGETS: [&str; 4] = [
    "httpbridge",
    "httpbridge_dict",
    "httpbridge_channel",
    "httpbridge_proto",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Bridge crates log at `level`; everything else at `warn` or quieter.
pub fn log_targets(level: LogLevel) -> Targets {
    let level = LevelFilter::from(level);
    BRIDGE_TARGETS.iter().fold(
        Targets::new().with_default(level.min(LevelFilter::WARN)),
        |targets, target| targets.with_target(*target, level),
    )
}

/// Route diagnostics to stderr so stdout stays machine-readable.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let targets = log_targets(level);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(level))
        .with_ansi(false)
        .with_target(true);

    let _ = match format {
        LogFormat::Text => builder.finish().with(targets).try_init(),
        LogFormat::Json => builder.json().finish().with(targets).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn bridge_crates_follow_requested_level() {
        let targets = log_targets(LogLevel::Debug);
        assert!(targets.would_enable("httpbridge_proto::dispatch", &Level::DEBUG));
        assert!(targets.would_enable("httpbridge_channel", &Level::DEBUG));
        assert!(!targets.would_enable("httpbridge_proto", &Level::TRACE));
    }

    #[test]
    fn other_targets_stay_at_warn() {
        let targets = log_targets(LogLevel::Trace);
        assert!(!targets.would_enable("clap_builder", &Level::INFO));
        assert!(targets.would_enable("clap_builder", &Level::WARN));

        let quiet = log_targets(LogLevel::Error);
        assert!(!quiet.would_enable("clap_builder", &Level::WARN));
    }
}
