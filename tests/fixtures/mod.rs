//! Test fixtures for carpool-planner.
//!
//! Provides:
//! - Real Seoul locations
//! - A table-driven provider with call counting and injectable failures

#![allow(dead_code)]

pub mod seoul_locations;
pub mod table_provider;

pub use seoul_locations::*;
pub use table_provider::*;
