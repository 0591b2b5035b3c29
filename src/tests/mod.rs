//! Internal test modules with crate access.
//!
//! Tests here exercise the controller through arbitrary operation
//! sequences and check invariants that must hold after every settle,
//! using the shared fixtures from the test harness.

mod paging_properties;
