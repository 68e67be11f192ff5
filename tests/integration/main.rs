//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a specific slice of the
//! feedback core against mock adapters and a simulated clock. All tests
//! run on the host with no real hardware required.

mod dispatch_tests;
mod scenario_tests;
