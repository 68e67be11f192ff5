//! End-to-end timing scenarios: events in, actuator history out, driven by
//! the simulated clock.

use super::mock_hw::Sim;

use keyfeedback::app::events::{FeedbackEvent, SuppressReason};
use keyfeedback::channels::Channels;
use keyfeedback::config::{FeedbackConfig, HID_USAGE_KEY, KEY_F24, PulseConfig, StartCue};
use keyfeedback::events::Event;
use keyfeedback::patterns::PatternKind;

const TOGGLE_KEY: Event = Event::KeyPress {
    usage_page: HID_USAGE_KEY,
    keycode: KEY_F24,
    pressed: true,
};

const ENTER_LAYER: Event = Event::LayerChange {
    layer: 1,
    entered: true,
};

fn battery_led_without_boot_show() -> FeedbackConfig {
    let mut cfg = FeedbackConfig::battery_led();
    if let Some(b) = cfg.battery.as_mut() {
        b.boot_delay_ms = None;
    }
    cfg
}

// ── Battery level ─────────────────────────────────────────────

#[test]
fn battery_85_shows_green_for_two_seconds() {
    let mut sim = Sim::new(battery_led_without_boot_show());
    sim.send(0, Event::BatteryQuery { level: Some(85) });

    assert_eq!(sim.hw.lit_at(0), Channels::GREEN);
    assert_eq!(sim.hw.lit_at(1999), Channels::GREEN);
    sim.run_until(5000);
    assert_eq!(sim.hw.lit_at(2000), Channels::NONE);
    assert_eq!(sim.service.next_deadline(), None);
    assert!(sim.service.is_idle());
    assert!(sim.sink.contains(&FeedbackEvent::PatternFinished(
        PatternKind::BatteryLevel { level: 85 }
    )));
}

#[test]
fn four_band_low_middle_mixes_red_and_green() {
    let mut sim = Sim::new(FeedbackConfig::battery_led_four_band());
    sim.send(0, Event::BatteryQuery { level: Some(35) });
    assert_eq!(sim.hw.lit_at(0), Channels::YELLOW);
}

#[test]
fn boot_show_fires_at_boot_delay() {
    let mut sim = Sim::with_hw(FeedbackConfig::battery_led(), |hw| hw.soc = 12);
    sim.run_until(999);
    assert!(sim.hw.rising_edges().is_empty());

    sim.run_until(1000);
    assert_eq!(sim.hw.rising_edges(), vec![(1000, Channels::RED)]);
    sim.run_until(4000);
    assert_eq!(sim.hw.lit_at(3000), Channels::NONE);
    assert!(sim.service.is_idle());
}

#[test]
fn battery_query_replaces_running_show() {
    let mut sim = Sim::new(battery_led_without_boot_show());
    sim.send(0, Event::BatteryQuery { level: Some(10) });
    sim.send(500, Event::BatteryQuery { level: Some(90) });
    assert_eq!(sim.hw.lit_at(500), Channels::GREEN);

    sim.run_until(5000);
    // The first show's off at t=2000 must not cut the second short.
    assert_eq!(sim.hw.lit_at(2400), Channels::GREEN);
    assert_eq!(sim.hw.lit_at(2500), Channels::NONE);
}

// ── Profile switch and connection ─────────────────────────────

/// Runs with `start_delay_ms = 0` so the cue plays at t=0. The stock
/// `vibe_motor` preset waits 500 ms before its cue, which would put the
/// connection at t=500 right on top of it; see
/// `stock_preset_profile_switch_spaces_cue_and_success` for that timing.
#[test]
fn profile_switch_then_connection_gives_short_then_long_pulse() {
    let mut cfg = FeedbackConfig::vibe_motor();
    if let Some(p) = cfg.profile.as_mut() {
        p.start_delay_ms = 0;
    }
    let mut sim = Sim::new(cfg);

    sim.send(0, Event::ProfileChange { connected: false });
    // First poll at t=100 finds no connection and re-arms for t=600.
    sim.run_until(500);
    sim.hw.connected = true;
    sim.send(500, Event::ConnectionEstablished { err: None });
    sim.run_until(3000);

    let edges = sim.hw.rising_edges();
    assert_eq!(edges, vec![(0, Channels::MOTOR), (500, Channels::MOTOR)]);
    // Short cue ran its full 100 ms.
    assert_eq!(sim.hw.lit_at(99), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(100), Channels::NONE);
    // Long pulse.
    assert_eq!(sim.hw.lit_at(1499), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(1500), Channels::NONE);
    assert!(sim.sink.contains(&FeedbackEvent::ConditionMet(
        PatternKind::ProfileSequence { connected: false }
    )));
}

#[test]
fn stock_preset_profile_switch_spaces_cue_and_success() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(0, Event::ProfileChange { connected: false });
    // Cue 500..600, first poll at 600 finds nothing.
    sim.run_until(1000);
    sim.hw.connected = true;
    sim.send(1000, Event::ConnectionEstablished { err: None });
    sim.run_until(3000);

    assert_eq!(
        sim.hw.rising_edges(),
        vec![(500, Channels::MOTOR), (1000, Channels::MOTOR)]
    );
    assert_eq!(sim.hw.lit_at(999), Channels::NONE);
    assert_eq!(sim.hw.lit_at(1999), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(2000), Channels::NONE);
}

#[test]
fn connection_during_cue_is_latched_not_truncating() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(0, Event::ProfileChange { connected: false });
    // Cue runs 500..600; connection arrives mid-cue.
    sim.send(550, Event::ConnectionEstablished { err: None });
    assert_eq!(sim.hw.lit_at(550), Channels::MOTOR);

    sim.run_until(3000);
    // Cue and success pulse are contiguous: success starts as the cue ends.
    assert_eq!(sim.hw.lit_at(599), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(600), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(1599), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(1600), Channels::NONE);
    assert!(sim.service.is_idle());
}

#[test]
fn duplicate_connection_during_success_is_suppressed() {
    let mut sim = Sim::with_hw(FeedbackConfig::vibe_motor(), |hw| hw.connected = true);
    sim.send(0, Event::ProfileChange { connected: false });
    sim.run_until(700);
    assert_eq!(sim.service.active_pattern(), Some(PatternKind::ProfileSequence { connected: false }));

    sim.send(700, Event::ConnectionEstablished { err: None });
    assert_eq!(
        sim.sink.events.last(),
        Some(&FeedbackEvent::Suppressed(SuppressReason::AlreadyConfirmed))
    );
    sim.run_until(3000);
    assert_eq!(sim.hw.lit_at(1599), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(1600), Channels::NONE);
}

#[test]
fn already_connected_switch_plays_one_success_pulse() {
    let mut cfg = FeedbackConfig::vibe_motor();
    cfg.connection = Some(PulseConfig {
        channels: Channels::MOTOR,
        on_ms: 300,
    });
    let mut sim = Sim::with_hw(cfg, |hw| hw.connected = true);

    sim.send(0, Event::ProfileChange { connected: true });
    sim.send(10, Event::ConnectionEstablished { err: None });
    sim.run_until(3000);

    // Cue then a single 1000 ms success; the standalone pulse never runs.
    assert_eq!(sim.hw.rising_edges(), vec![(500, Channels::MOTOR)]);
    assert_eq!(sim.hw.lit_at(1599), Channels::MOTOR);
    assert!(!sim
        .sink
        .contains(&FeedbackEvent::PatternStarted(PatternKind::SinglePulse { on_ms: 300 })));
}

#[test]
fn failed_connection_is_ignored() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(
        0,
        Event::ConnectionEstablished {
            err: Some(keyfeedback::events::ErrorCode(0x3e)),
        },
    );
    assert!(sim.hw.rising_edges().is_empty());
}

#[test]
fn double_cue_preset() {
    let mut cfg = FeedbackConfig::vibe_motor();
    if let Some(p) = cfg.profile.as_mut() {
        p.cue = StartCue::Double {
            on_ms: 100,
            gap_ms: 100,
        };
    }
    let mut sim = Sim::new(cfg);
    sim.send(0, Event::ProfileChange { connected: false });
    sim.run_until(1000);
    assert_eq!(
        sim.hw.rising_edges(),
        vec![(500, Channels::MOTOR), (700, Channels::MOTOR)]
    );
    // Still polling.
    assert_eq!(sim.hw.lit_at(1000), Channels::NONE);
    assert!(!sim.service.is_idle());
}

// ── Layer, toggle, cancellation ───────────────────────────────

#[test]
fn layer_during_poll_cancels_poll() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(0, Event::ProfileChange { connected: false });
    sim.run_until(800);
    assert_eq!(sim.service.active_pattern(), Some(PatternKind::ProfileSequence { connected: false }));

    sim.send(800, ENTER_LAYER);
    assert_eq!(sim.service.active_pattern(), Some(PatternKind::SinglePulse { on_ms: 150 }));

    // Connection comes up long after; the cancelled poll must not react.
    sim.hw.connected = true;
    sim.run_until(5000);
    assert_eq!(
        sim.hw.rising_edges(),
        vec![(500, Channels::MOTOR), (800, Channels::MOTOR)]
    );
    assert_eq!(sim.hw.lit_at(950), Channels::NONE);
    assert_eq!(sim.service.next_deadline(), None);
}

#[test]
fn toggle_double_press_restores_layer_feedback() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    assert!(sim.service.toggle_enabled());

    sim.send(0, TOGGLE_KEY);
    assert!(!sim.service.toggle_enabled());
    sim.send(1000, ENTER_LAYER);
    assert_eq!(
        sim.sink.events.last(),
        Some(&FeedbackEvent::Suppressed(SuppressReason::ToggleDisabled))
    );

    sim.send(2000, TOGGLE_KEY);
    assert!(sim.service.toggle_enabled());
    sim.send(3000, ENTER_LAYER);
    assert_eq!(sim.hw.lit_at(3000), Channels::MOTOR);

    // Toggle pulses at 0 and 2000, layer pulse at 3000; none at 1000.
    assert_eq!(
        sim.hw.rising_edges(),
        vec![
            (0, Channels::MOTOR),
            (2000, Channels::MOTOR),
            (3000, Channels::MOTOR)
        ]
    );
}

#[test]
fn layer_pulse_uses_toggle_value_at_event_time() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(0, ENTER_LAYER);
    sim.send(1000, TOGGLE_KEY);
    // The earlier pulse already ran to completion.
    assert_eq!(sim.hw.lit_at(100), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(150), Channels::NONE);
    assert!(sim.sink.contains(&FeedbackEvent::PatternFinished(
        PatternKind::SinglePulse { on_ms: 150 }
    )));
}

#[test]
fn layer_pulse_supersedes_toggle_confirmation() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(0, TOGGLE_KEY);
    sim.send(10, TOGGLE_KEY);
    sim.send(100, ENTER_LAYER);
    sim.run_until(1000);

    assert!(sim.sink.contains(&FeedbackEvent::Superseded {
        previous: PatternKind::ToggleFeedback { on_ms: 400 },
        by: PatternKind::SinglePulse { on_ms: 150 },
    }));
    // The layer pulse owns the output; the confirmation's off at t=410 is gone.
    assert_eq!(sim.hw.lit_at(249), Channels::MOTOR);
    assert_eq!(sim.hw.lit_at(250), Channels::NONE);
    assert!(sim.hw.shown.iter().all(|(at, _)| *at != 410));
    assert!(sim.service.is_idle());
}

#[test]
fn layer_leave_and_release_are_silent() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.send(
        0,
        Event::LayerChange {
            layer: 1,
            entered: false,
        },
    );
    sim.send(
        10,
        Event::KeyPress {
            usage_page: HID_USAGE_KEY,
            keycode: KEY_F24,
            pressed: false,
        },
    );
    assert!(sim.hw.rising_edges().is_empty());
    assert!(sim.service.toggle_enabled());
}
