//! GPIO assignments for the feedback actuator.
//!
//! Single source of truth: `main` references this module rather than
//! hard-coding pin numbers. Which set is used follows the selected
//! [`ActuatorKind`](crate::config::ActuatorKind).

// ---------------------------------------------------------------------------
// Vibration motor (N-MOSFET low-side switch, active HIGH)
// ---------------------------------------------------------------------------

pub const VIBE_MOTOR_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Battery indicator (discrete R/G/B, sinking, active LOW)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;
