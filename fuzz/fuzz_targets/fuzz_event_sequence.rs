//! Fuzz target: `FeedbackService::handle` / `poll`
//!
//! Decodes arbitrary bytes into a stream of timed keyboard events and
//! platform changes, feeds them through the service with the 3-band LED
//! preset, and asserts that it never panics, never schedules into the
//! past, and always comes to rest dark once the connection is up.
//!
//! cargo fuzz run fuzz_event_sequence

#![no_main]

use embassy_time::Instant;
use keyfeedback::app::events::FeedbackEvent;
use keyfeedback::app::ports::{ActuatorPort, BatteryPort, ConnectionPort, EventSink};
use keyfeedback::app::service::FeedbackService;
use keyfeedback::channels::Channels;
use keyfeedback::config::FeedbackConfig;
use keyfeedback::error::InitError;
use keyfeedback::events::{ErrorCode, Event, EventQueue};
use libfuzzer_sys::fuzz_target;

struct Rig {
    lit: Channels,
    connected: bool,
    soc: u8,
}

impl ActuatorPort for Rig {
    fn configure(&mut self) -> Result<(), InitError> {
        Ok(())
    }
    fn show(&mut self, channels: Channels) {
        assert!(channels.fits(3), "channel outside the triad");
        self.lit = channels;
    }
    fn channel_count(&self) -> usize {
        3
    }
}

impl BatteryPort for Rig {
    fn state_of_charge(&mut self) -> u8 {
        self.soc
    }
}

impl ConnectionPort for Rig {
    fn is_profile_connected(&self) -> bool {
        self.connected
    }
}

struct Null;

impl EventSink for Null {
    fn emit(&mut self, _event: &FeedbackEvent) {}
}

fn decode(op: u8, arg: u8) -> Event {
    match op % 6 {
        0 => Event::BatteryQuery {
            level: (arg & 1 == 0).then_some(arg),
        },
        1 => Event::KeyPress {
            usage_page: 0x07,
            keycode: arg,
            pressed: arg & 1 == 0,
        },
        2 => Event::LayerChange {
            layer: arg,
            entered: arg & 1 == 0,
        },
        3 => Event::ProfileChange {
            connected: arg & 1 == 0,
        },
        4 => Event::ConnectionEstablished { err: None },
        _ => Event::ConnectionEstablished {
            err: Some(ErrorCode(arg)),
        },
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cfg = FeedbackConfig::battery_led();
    // Give every event kind something to do.
    let vibe = FeedbackConfig::vibe_motor();
    cfg.layer = vibe.layer;
    cfg.toggle = vibe.toggle;
    cfg.profile = vibe.profile;

    let queue = EventQueue::new();
    let mut rig = Rig {
        lit: Channels::NONE,
        connected: false,
        soc: 50,
    };
    let Ok(mut service) = FeedbackService::init(cfg, &mut rig, &queue, &mut Null) else {
        return;
    };
    service.start(Instant::from_millis(0), &mut rig, &mut Null);

    let mut now = 0u64;
    for chunk in data.chunks_exact(3) {
        now += u64::from(chunk[0]) * 8;
        rig.soc = chunk[2];
        rig.connected = chunk[1] & 0x80 != 0;

        while let Some(at) = service.next_deadline() {
            if at > Instant::from_millis(now) {
                break;
            }
            service.poll(at, &mut rig, &mut Null);
        }
        service.handle(decode(chunk[1], chunk[2]), Instant::from_millis(now), &mut rig, &mut Null);
        if let Some(at) = service.next_deadline() {
            assert!(at >= Instant::from_millis(now), "deadline in the past");
        }
    }

    rig.connected = true;
    for _ in 0..64 {
        let Some(at) = service.next_deadline() else {
            break;
        };
        service.poll(at, &mut rig, &mut Null);
    }
    assert!(service.is_idle(), "pattern never finished");
    assert_eq!(rig.lit, Channels::NONE);
});
