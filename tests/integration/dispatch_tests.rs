//! Listener registration and queue-driven dispatch.

use super::mock_hw::{MockHardware, RecordingSink, Sim};

use keyfeedback::app::events::FeedbackEvent;
use keyfeedback::app::service::FeedbackService;
use keyfeedback::channels::Channels;
use keyfeedback::config::{FeedbackConfig, HID_USAGE_KEY, KEY_F24};
use keyfeedback::error::InitError;
use keyfeedback::patterns::PatternKind;
use keyfeedback::events::EventQueue;

#[test]
fn init_failure_leaves_listeners_unregistered() {
    let queue = EventQueue::new();
    let mut hw = MockHardware::new(1);
    hw.fail_configure = true;
    let mut sink = RecordingSink::default();

    let result = FeedbackService::init(FeedbackConfig::vibe_motor(), &mut hw, &queue, &mut sink);
    assert_eq!(result.err(), Some(InitError::DeviceNotReady));
    assert_eq!(
        sink.events,
        vec![FeedbackEvent::InitFailed(InitError::DeviceNotReady)]
    );

    // Events from the host are dropped, not queued.
    assert!(!queue.on_layer_state_changed(1, true));
    assert!(queue.is_empty());
    assert!(hw.shown.is_empty());
}

#[test]
fn start_drives_dark_and_reports_toggle() {
    let sim = Sim::new(FeedbackConfig::vibe_motor());
    assert_eq!(sim.hw.shown, vec![(0, Channels::NONE)]);
    assert_eq!(
        sim.sink.events,
        vec![FeedbackEvent::Started {
            toggle_enabled: true
        }]
    );
    assert!(sim.queue.listeners_registered());
}

#[test]
fn queued_events_dispatch_in_order() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    assert!(sim.queue.on_key(HID_USAGE_KEY, KEY_F24, true));
    assert!(sim.queue.on_layer_state_changed(2, true));
    sim.drain(0);

    // Toggle processed first, so the layer event was suppressed.
    assert!(!sim.service.toggle_enabled());
    assert_eq!(sim.hw.rising_edges(), vec![(0, Channels::MOTOR)]);
    assert!(sim.queue.is_empty());
}

#[test]
fn listener_battery_query_reads_gauge() {
    let mut cfg = FeedbackConfig::battery_led();
    if let Some(b) = cfg.battery.as_mut() {
        b.boot_delay_ms = None;
    }
    let mut sim = Sim::with_hw(cfg, |hw| hw.soc = 45);
    sim.queue.on_battery_query(None);
    sim.drain(100);
    assert_eq!(sim.hw.lit_at(100), Channels::BLUE);
}

#[test]
fn late_tick_fires_expired_deadline_before_queued_event() {
    let mut sim = Sim::new(FeedbackConfig::vibe_motor());
    sim.queue.on_key(HID_USAGE_KEY, KEY_F24, true);
    sim.queue.on_key(HID_USAGE_KEY, KEY_F24, true);
    sim.tick(0);
    assert!(sim.service.toggle_enabled());
    assert_eq!(sim.service.next_deadline().map(|t| t.as_millis()), Some(400));

    // The confirmation ended at t=400; the layer event arrived later but
    // the loop only wakes at t=415.
    sim.queue.on_layer_state_changed(1, true);
    let before = sim.sink.events.len();
    sim.tick(415);

    assert_eq!(
        sim.sink.events[before..],
        [
            FeedbackEvent::PatternFinished(PatternKind::ToggleFeedback { on_ms: 400 }),
            FeedbackEvent::PatternStarted(PatternKind::SinglePulse { on_ms: 150 }),
        ]
    );
    assert!(
        sim.hw
            .shown
            .ends_with(&[(415, Channels::NONE), (415, Channels::MOTOR)])
    );
}
