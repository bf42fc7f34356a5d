use env_logger::Builder;
use log::LevelFilter;

use crate::constants::LOG_ENV_VAR;

/// Initialize logging, given a `verbosity_level`.
///
/// The environment variable `KONSUMER_LAG_LOG`, if set, takes precedence.
///
/// # Arguments
///
/// * `verbosity_level` - Negative values make it quieter, positive values make it more verbose.
pub fn init(verbosity_level: i8) {
    let default_log_level = match verbosity_level {
        i8::MIN..=-2 => LevelFilter::Off,
        -1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3..=i8::MAX => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(default_log_level)
        .parse_env(LOG_ENV_VAR)
        .format_timestamp_millis()
        .init();
}
