//! Integration tests for the level-gated logging macros.
//!
//! These tests verify that `debug_log!` and `info_log!` record or suppress
//! diagnostics according to the thread's verbosity configuration, the way
//! `minifind -v` and `--debug FLAGS` expect.

use logging::{
    DebugFlag, DiagnosticEvent, InfoFlag, VerbosityConfig, debug_log, drain_events, info_log,
    init,
};

fn fresh(config: VerbosityConfig) {
    init(config);
    drain_events();
}

#[test]
fn debug_log_emits_when_level_sufficient() {
    let mut config = VerbosityConfig::default();
    config.debug.dir = 2;
    fresh(config);

    debug_log!(Dir, 1, "scanning {}", "/tmp");

    let events = drain_events();
    assert_eq!(
        events,
        vec![DiagnosticEvent::Debug {
            flag: DebugFlag::Dir,
            level: 1,
            message: "scanning /tmp".to_string(),
        }]
    );
}

#[test]
fn debug_log_suppresses_when_level_insufficient() {
    let mut config = VerbosityConfig::default();
    config.debug.dir = 1;
    fresh(config);

    debug_log!(Dir, 2, "should not appear");

    assert!(drain_events().is_empty());
}

#[test]
fn debug_log_does_not_evaluate_arguments_when_disabled() {
    fresh(VerbosityConfig::default());

    let mut evaluated = false;
    debug_log!(Walk, 1, "{}", {
        evaluated = true;
        "value"
    });

    assert!(!evaluated);
    assert!(drain_events().is_empty());
}

#[test]
fn info_log_respects_flag_boundaries() {
    let mut config = VerbosityConfig::default();
    config.info.stats = 1;
    fresh(config);

    info_log!(Stats, 1, "visited {} entries", 4);
    info_log!(Skip, 1, "different flag");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DiagnosticEvent::Info { flag: InfoFlag::Stats, level: 1, message } if message == "visited 4 entries"
    ));
}

#[test]
fn verbose_level_three_enables_walk_but_not_stat() {
    fresh(VerbosityConfig::from_verbose_level(3));

    debug_log!(Walk, 1, "push");
    debug_log!(Stat, 1, "lstat");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message(), "push");
}

#[test]
fn events_from_mixed_macros_keep_order() {
    let mut config = VerbosityConfig::default();
    config.info.skip = 1;
    config.debug.prune = 1;
    fresh(config);

    info_log!(Skip, 1, "first");
    debug_log!(Prune, 1, "second");
    info_log!(Skip, 1, "third");

    let messages: Vec<String> = drain_events()
        .iter()
        .map(|event| event.message().to_string())
        .collect();
    assert_eq!(messages, ["first", "second", "third"]);
}
