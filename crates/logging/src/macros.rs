//! crates/logging/src/macros.rs
//! Level-gated logging macros.
//!
//! The format arguments are only evaluated when the flag's configured level
//! reaches the requested one, so disabled diagnostics cost a thread-local read.

/// Record an info diagnostic when `InfoFlag::$flag` is at least `$level`.
///
/// # Example
/// ```
/// use logging::{drain_events, info_log, init, VerbosityConfig};
///
/// let mut config = VerbosityConfig::default();
/// config.info.skip = 1;
/// init(config);
/// drain_events();
///
/// info_log!(Skip, 1, "skipping {}", "missing");
/// info_log!(Skip, 2, "too verbose");
/// assert_eq!(drain_events().len(), 1);
/// ```
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {{
        if $crate::info_gte($crate::InfoFlag::$flag, $level) {
            $crate::emit_info($crate::InfoFlag::$flag, $level, format!($($arg)*));
        }
    }};
}

/// Record a debug diagnostic when `DebugFlag::$flag` is at least `$level`.
///
/// # Example
/// ```
/// use logging::{debug_log, drain_events, init, VerbosityConfig};
///
/// let mut config = VerbosityConfig::default();
/// config.debug.dir = 2;
/// init(config);
/// drain_events();
///
/// debug_log!(Dir, 2, "scanned {} entries", 3);
/// assert_eq!(drain_events()[0].message(), "scanned 3 entries");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {{
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, format!($($arg)*));
        }
    }};
}
