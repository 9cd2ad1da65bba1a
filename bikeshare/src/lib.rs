//! Bay Area bike-share feed client.
//!
//! Fetches the real-time station-status feed over HTTP, normalizes it into
//! [`StationRecord`]s, and answers queries against the most recent snapshot:
//! lookup by id, filter by city, empty/full detection, percent-available
//! computation, offline detection.

pub mod client;
pub mod domain;
pub mod feed;
pub mod store;

pub use client::{BikeShareClient, FetchEvent};
pub use domain::{StationRecord, StationRef};
pub use feed::{FeedClient, FeedConfig, FeedError};
pub use store::{ServicePolicy, StationStore};
