//! Logging helpers: `log` macros that can be silenced per module, plus the
//! one-time `env_logger` setup used by the application entry point.
//!
//! A module opts in by declaring the switch the macros read:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::log_info;
//! log_info!("opened {}", path.display());
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs `env_logger`. `RUST_LOG` wins over the default filter, which is
/// `info`, or `debug` when `debug` is set. Later calls do nothing.
pub fn init_logging(debug: bool) {
    INIT.call_once(|| {
        let default_level = if debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let _ = env_logger::Builder::new()
            .filter_level(default_level)
            .parse_default_env()
            .try_init();
    });
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
