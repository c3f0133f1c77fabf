use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

/// Installs an `env_logger` writing `LEVEL [target] message` lines to stderr.
/// Only the first call has an effect.
pub fn build_logger_for_level(level: LevelFilter) {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} [{}] {}",
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        });

    // a logger may already be installed (e.g. by another test)
    let _ = builder.try_init();
}

/// Raises `default` by one level per `verbosity`, e.g. `Warn` with `-vv` gives `Debug`.
pub fn build_logger_for_verbosity(default: LevelFilter, verbosity: usize) {
    build_logger_for_level(raise_level(default, verbosity));
}

fn raise_level(default: LevelFilter, verbosity: usize) -> LevelFilter {
    LevelFilter::iter()
        .skip_while(|&level| level != default)
        .nth(verbosity)
        .unwrap_or(LevelFilter::Trace)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verbosity() {
        assert_eq!(raise_level(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(raise_level(LevelFilter::Warn, 1), LevelFilter::Info);
        assert_eq!(raise_level(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(raise_level(LevelFilter::Info, 10), LevelFilter::Trace);
        assert_eq!(raise_level(LevelFilter::Off, 1), LevelFilter::Error);
    }

    #[test]
    fn repeated_initialisation() {
        build_logger_for_level(LevelFilter::Info);
        build_logger_for_verbosity(LevelFilter::Warn, 2);
        log::info!("logger installed");
    }
}
