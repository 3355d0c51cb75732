/// Logging setup and conditional performance logging
///
/// The crate logs through the `log` facade. Binaries, benches and tests that
/// want to see the output call [`init`] once; library code never installs a
/// logger on its own.
///
/// The `perf_log!` macro is compiled out unless the `perf_timing` feature is
/// enabled, so hot paths pay nothing for their timing statements by default.
///
/// # Examples
///
/// ```rust
/// rail_advisor::logging::init(true);
/// rail_advisor::perf_log!("detection took {:.2}ms", 1.5);
/// ```
use log::LevelFilter;

/// Install `env_logger` as the global logger
///
/// `RUST_LOG` still wins when set. Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let level = if verbose {
        if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Log a timing line at debug level, only with the `perf_timing` feature
#[macro_export]
macro_rules! perf_log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(feature = "perf_timing")]
        {
            log::debug!($($arg),+);
        }
    };
}

pub use perf_log;
