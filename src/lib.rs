//! Keyboard feedback core.
//!
//! Drives a single physical actuator (RGB LED triad or vibration motor)
//! in response to keyboard-state events: battery queries, layer changes,
//! the feedback toggle key, profile switches and connection callbacks.
//! Exposes the pure-logic modules for integration testing; the ESP-IDF
//! wiring lives in the `keyfeedback` binary behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod patterns;
pub mod pins;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
