#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the verbosity flag system shared by the `filefind`
//! workspace. Library code records diagnostics with the [`debug_log!`] and
//! [`info_log!`] macros; each call names a category flag and a level and is
//! dropped unless the thread's [`VerbosityConfig`] enables that level.
//!
//! # Design
//!
//! - [`InfoFlag`] and [`DebugFlag`] enumerate the diagnostic categories;
//!   [`InfoLevels`] and [`DebugLevels`] store one level per category.
//! - [`VerbosityConfig`] maps a `-v` count onto those levels and parses
//!   `--debug` tokens such as `dir2` or `all`.
//! - Configuration and recorded [`DiagnosticEvent`]s live in thread-local
//!   storage. Binaries call [`init`] once and periodically [`drain_events`] to
//!   print what was collected.
//! - With the `tracing` feature, [`init_tracing`] installs a subscriber layer
//!   that routes `tracing` events into the same buffer.
//!
//! # Examples
//!
//! ```
//! use logging::{debug_log, drain_events, init, DebugFlag, DiagnosticEvent, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::default();
//! config.apply_debug_flag("dup2").unwrap();
//! init(config);
//! drain_events();
//!
//! debug_log!(Dup, 1, "skipping {} (cycle)", "/tmp/a/loop");
//! debug_log!(Walk, 1, "not enabled");
//!
//! let events = drain_events();
//! assert_eq!(events.len(), 1);
//! assert!(matches!(events[0], DiagnosticEvent::Debug { flag: DebugFlag::Dup, .. }));
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, debug_gte, drain_events, emit_debug,
    emit_info, info_gte, init,
};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{FindLayer, init_tracing};
