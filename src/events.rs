//! Inbound keyboard events and the serial dispatch queue.
//!
//! Events are produced by independent asynchronous sources:
//! - key-scan interrupts (key presses, layer changes)
//! - radio-stack callbacks (profile switches, connection established)
//! - periodic battery polling
//!
//! Every producer funnels into one FIFO queue; the dispatch loop drains it
//! and is the only context that touches the feedback core. Mutual
//! exclusion comes from this serialisation, not from locking the core.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ key scan        │────▶│              │     │                  │
//! │ radio callbacks │────▶│  EventQueue  │────▶│  dispatch loop   │
//! │ battery poll    │────▶│  (16 slots)  │     │  (FeedbackService│
//! └─────────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! Listener entry points only enqueue once the core has been brought up
//! successfully; before that (or after a failed init) events are dropped.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

/// HCI status reported by the radio stack with a failed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub u8);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HCI 0x{:02x}", self.0)
    }
}

/// Keyboard-state events consumed by the feedback core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Show the battery level. `None` asks the fuel gauge at dispatch time.
    BatteryQuery { level: Option<u8> },
    /// A decoded key transition.
    KeyPress {
        usage_page: u8,
        keycode: u8,
        pressed: bool,
    },
    /// A layer became active (`entered`) or inactive.
    LayerChange { layer: u8, entered: bool },
    /// The active BLE profile changed; `connected` is its state right now.
    ProfileChange { connected: bool },
    /// Radio-stack connection callback. `Some(err)` means the attempt failed.
    ConnectionEstablished { err: Option<ErrorCode> },
}

// ── Queue ──────────────────────────────────────────────────────

/// Bounded multi-producer, single-consumer event queue.
pub struct EventQueue {
    channel: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_CAP>,
    registered: AtomicBool,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            registered: AtomicBool::new(false),
        }
    }

    /// Enqueue without blocking. Returns `false` if the queue is full
    /// (event dropped).
    pub fn push(&self, event: Event) -> bool {
        if self.channel.try_send(event).is_err() {
            warn!("event queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Pop the oldest event. Called from the dispatch loop only.
    pub fn pop(&self) -> Option<Event> {
        self.channel.try_receive().ok()
    }

    /// Process every pending event in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    // ── Listener registration ─────────────────────────────────

    /// Start accepting events from the listener entry points.
    pub fn register_listeners(&self) {
        self.registered.store(true, Ordering::Release);
    }

    pub fn listeners_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    fn deliver(&self, event: Event) -> bool {
        self.listeners_registered() && self.push(event)
    }

    // ── Listener entry points ─────────────────────────────────

    pub fn on_battery_query(&self, level: Option<u8>) -> bool {
        self.deliver(Event::BatteryQuery { level })
    }

    pub fn on_key(&self, usage_page: u8, keycode: u8, pressed: bool) -> bool {
        self.deliver(Event::KeyPress {
            usage_page,
            keycode,
            pressed,
        })
    }

    pub fn on_layer_state_changed(&self, layer: u8, entered: bool) -> bool {
        self.deliver(Event::LayerChange { layer, entered })
    }

    pub fn on_profile_changed(&self, connected: bool) -> bool {
        self.deliver(Event::ProfileChange { connected })
    }

    pub fn on_connected(&self, err: Option<ErrorCode>) -> bool {
        self.deliver(Event::ConnectionEstablished { err })
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The firmware-wide queue the host's listeners feed.
pub static EVENTS: EventQueue = EventQueue::new();

// ── Host entry points (feed `EVENTS`) ─────────────────────────

pub fn register_listeners() {
    EVENTS.register_listeners();
}

pub fn on_battery_query(level: Option<u8>) -> bool {
    EVENTS.on_battery_query(level)
}

pub fn on_key(usage_page: u8, keycode: u8, pressed: bool) -> bool {
    EVENTS.on_key(usage_page, keycode, pressed)
}

pub fn on_layer_state_changed(layer: u8, entered: bool) -> bool {
    EVENTS.on_layer_state_changed(layer, entered)
}

pub fn on_profile_changed(connected: bool) -> bool {
    EVENTS.on_profile_changed(connected)
}

pub fn on_connected(err: Option<ErrorCode>) -> bool {
    EVENTS.on_connected(err)
}
