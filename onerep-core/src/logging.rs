use log::LevelFilter;
use std::io::Write;

pub fn init_logger(level: LevelFilter) {
    init_logger_with_target(level, env_logger::Target::Stdout);
}

/// Install the `LEVEL: target - message` logger. Later calls only adjust the level.
pub fn init_logger_with_target(level: LevelFilter, target: env_logger::Target) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(target)
        .filter_level(level);

    let _ = builder.try_init();

    log::set_max_level(level);
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lvl = match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    };
    Some(lvl)
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn set_debug_log_level() {
    init_logger(LevelFilter::Trace);
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("trace"), Some(LevelFilter::Trace));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn unknown_level_is_refused() {
        assert!(!set_log_level("verbose"));
    }
}
