//! Mock feed for testing without network access.
//!
//! Loads a feed document from a JSON file and serves it as if it had been
//! fetched from the live endpoint.

use std::path::Path;

use crate::feed::convert::normalize_all;
use crate::store::StationStore;

use super::error::FeedError;
use super::types::{StationDto, StationFeed};

/// Feed source backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct MockFeed {
    stations: Vec<StationDto>,
}

impl MockFeed {
    /// Load a feed document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| FeedError::Io {
            message: format!("failed to read {path:?}: {e}"),
        })?;

        let feed: StationFeed = serde_json::from_str(&json).map_err(|e| FeedError::Json {
            message: format!("failed to parse {path:?}: {e}"),
        })?;

        Ok(Self {
            stations: feed.station_bean_list,
        })
    }

    /// The raw station objects, in feed order.
    pub fn stations(&self) -> &[StationDto] {
        &self.stations
    }

    /// Consume the mock and return the raw station objects.
    pub fn into_stations(self) -> Vec<StationDto> {
        self.stations
    }

    /// Normalize into a default-policy store, as a successful fetch would.
    pub fn into_store(self) -> StationStore {
        StationStore::new(normalize_all(self.stations))
    }
}
