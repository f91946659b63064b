//! FILENAME: crosstab-engine/src/logging.rs
// PURPOSE: Category-tagged logging over the `log` facade.
//
// Each category becomes the log target, so a host can filter e.g. only
// `EXPAND` traffic. The crate never installs a logger itself.

// ============================================================================
// LOGGING MACROS
// ============================================================================

macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, $($arg)*)
    };
}

macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}
