//! Integration tests
//!
//! Drives the extraction pipeline and the full router against a scripted
//! caption tool.

pub mod e2e;
pub mod fixtures;
