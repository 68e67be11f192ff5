//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to                  |
//! |------------|------------------|------------------------------|
//! | `hardware` | ActuatorPort     | GPIO outputs                 |
//! |            | BatteryPort      | published fuel-gauge level   |
//! |            | ConnectionPort   | published profile state      |
//! | `log_sink` | EventSink        | Serial log output            |
//! | `platform` | BatteryPort      | atomics fed by the host      |
//! |            | ConnectionPort   |                              |
//! | `time`     | (clock)          | ESP32 system timer           |

pub mod hardware;
pub mod log_sink;
pub mod platform;
pub mod time;
