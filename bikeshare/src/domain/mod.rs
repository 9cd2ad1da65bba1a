//! Domain types shared across the crate.

mod station;

pub use station::{StationRecord, StationRef};
