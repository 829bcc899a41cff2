//! Internal test modules - whitebox tests with crate access
//!
//! Scenario tests that wire several modules together. Unit tests live next to the
//! code they cover.
