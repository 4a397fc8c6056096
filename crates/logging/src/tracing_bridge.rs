//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the verbosity flag system.
//!
//! Events whose target ends in a known category segment are routed into the
//! thread-local event buffer when the matching flag is enabled. Debug
//! categories are checked before info categories. The `minifind` binary
//! reports its totals through `minifind::stats`; the traversal engine itself
//! records through [`debug_log!`](crate::debug_log) and
//! [`info_log!`](crate::info_log) directly.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::info!(target: "minifind::stats", "visited 12 entries");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that forwards events into the verbosity flag system.
pub struct FindLayer {
    _config: VerbosityConfig,
}

impl FindLayer {
    /// Create a new layer for the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    /// Returns the last `::`-separated segment of a target.
    fn category(target: &str) -> &str {
        target.rsplit("::").next().unwrap_or(target)
    }

    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        let category = Self::category(target);
        InfoFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == category)
    }

    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        let category = Self::category(target);
        match category {
            "cycle" | "loop" => Some(DebugFlag::Dup),
            "xdev" => Some(DebugFlag::Mount),
            _ => DebugFlag::ALL
                .into_iter()
                .find(|flag| flag.name() == category),
        }
    }

    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }
}

impl<S> Layer<S> for FindLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_debug(debug_flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_info(info_flag, verbosity_level, message);
                }
            }
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Install a global subscriber that routes tracing events through [`FindLayer`].
///
/// The thread-local verbosity configuration is initialised as well so the
/// `debug_log!` and `info_log!` macros agree with the layer.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = FindLayer::new(config);

    // A subscriber may already be installed by a test harness or embedding
    // application; keep theirs.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_map_to_info_flags_by_last_segment() {
        assert_eq!(
            FindLayer::target_to_info_flag("minifind::stats"),
            Some(InfoFlag::Stats)
        );
        assert_eq!(FindLayer::target_to_info_flag("skip"), Some(InfoFlag::Skip));
        assert_eq!(FindLayer::target_to_info_flag("minifind::other"), None);
    }

    #[test]
    fn targets_map_to_debug_flags_with_aliases() {
        assert_eq!(
            FindLayer::target_to_debug_flag("filefind::dir"),
            Some(DebugFlag::Dir)
        );
        assert_eq!(
            FindLayer::target_to_debug_flag("filefind::cycle"),
            Some(DebugFlag::Dup)
        );
        assert_eq!(
            FindLayer::target_to_debug_flag("filefind::xdev"),
            Some(DebugFlag::Mount)
        );
        assert_eq!(FindLayer::target_to_debug_flag("filefind::stats"), None);
    }

    #[test]
    fn tracing_levels_map_to_verbosity_levels() {
        assert_eq!(FindLayer::level_to_verbosity_level(&Level::WARN), 1);
        assert_eq!(FindLayer::level_to_verbosity_level(&Level::DEBUG), 2);
        assert_eq!(FindLayer::level_to_verbosity_level(&Level::TRACE), 3);
    }

    #[test]
    fn layer_routes_enabled_events_into_buffer() {
        use tracing_subscriber::layer::SubscriberExt;

        let mut config = VerbosityConfig::default();
        config.info.stats = 1;
        super::super::thread_local::init(config.clone());
        super::super::thread_local::drain_events();

        let subscriber = tracing_subscriber::registry().with(FindLayer::new(config));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "minifind::stats", "visited 3 entries");
            tracing::debug!(target: "filefind::dir", "suppressed");
        });

        let events = super::super::thread_local::drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message(), "visited 3 entries");
    }
}
