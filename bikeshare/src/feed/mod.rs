//! Station-status feed access.
//!
//! The feed is a single JSON document served over HTTP:
//! `{"executionTime": "...", "stationBeanList": [ ... ]}`. Numeric fields
//! occasionally arrive as strings, so the wire types coerce both forms.

pub mod convert;

mod client;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_FEED_URL, FeedClient, FeedConfig};
pub use error::FeedError;
pub use mock::MockFeed;
pub use types::{StationDto, StationFeed};
