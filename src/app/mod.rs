//! Application core: pure domain logic, zero I/O.
//!
//! Event classification, the layer-feedback toggle and the dispatch
//! service. All interaction with hardware and the host platform happens
//! through the **port traits** in [`ports`], so this layer runs unchanged
//! against mock adapters.

pub mod events;
pub mod policy;
pub mod ports;
pub mod service;
pub mod toggle;
