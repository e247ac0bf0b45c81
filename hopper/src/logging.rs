use hopper_config::LoggingConfig;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Installs the terminal logger described by `config`. Does nothing when logging is disabled.
pub fn init_log(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }

    let (level, unknown_level) = match config.level.parse::<LevelFilter>() {
        Ok(level) => (level, false),
        Err(_) => (LevelFilter::Info, true),
    };

    let mut builder = ConfigBuilder::new();
    if config.timestamp {
        builder.set_time_format_rfc3339();
    } else {
        builder.set_time_level(LevelFilter::Off);
    }
    if config.threads {
        builder.set_thread_level(LevelFilter::Info);
    } else {
        builder.set_thread_level(LevelFilter::Off);
    }

    let color = if config.color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    // Fails only if a logger is already installed, which keeps that one
    let _ = TermLogger::init(
        level,
        builder.build(),
        TerminalMode::Mixed,
        color,
    );

    if unknown_level {
        log::warn!(
            "Unknown log level {:?}, falling back to info",
            config.level
        );
    }
}
