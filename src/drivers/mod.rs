//! Actuator drivers.

pub mod actuator;
