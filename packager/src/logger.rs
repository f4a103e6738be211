//! `env_logger` setup shared by the packager binaries.

use log::LevelFilter;
use std::io::Write;

/// Install the global logger.
///
/// `verbosity` counts `-v` flags. Without any, a set `RUST_LOG` decides the
/// level on its own; with them, the flags set the default level and
/// module-scoped `RUST_LOG` directives still apply. Calling this more than
/// once is harmless.
pub fn init(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    let rust_log_set = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    if let Some(level) = level_override(verbosity, rust_log_set) {
        builder.filter_level(level);
    }

    builder.format(|f, record| {
        let style = f.default_level_style(record.level()).bold();
        write!(f, "{style}{:>5}{style:#} ", record.level())?;
        if log::log_enabled!(log::Level::Debug) {
            write!(f, "[{}] ", record.target())?;
        }
        writeln!(f, "{}", record.args())
    });

    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

/// The level the `-v` count imposes, or `None` to leave `RUST_LOG` in charge.
#[must_use]
pub fn level_override(verbosity: u8, rust_log_set: bool) -> Option<LevelFilter> {
    (verbosity > 0 || !rust_log_set).then(|| verbosity_level(verbosity))
}

/// Map the number of `-v` flags to a level filter.
///
/// Progress is reported on stderr directly, so the default only shows
/// warnings.
#[must_use]
pub fn verbosity_level(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3.. => LevelFilter::Trace,
    }
}
