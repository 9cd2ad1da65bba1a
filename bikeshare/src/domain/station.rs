//! Normalized station types.

use serde::Serialize;

/// One station's state as of the most recent fetch.
///
/// Built from the raw feed by [`crate::feed::convert`]; immutable after
/// normalization. Serializes back out with the feed's own field names.
///
/// The dock-count invariant `available_docks + available_bikes <= total_docks`
/// is expected from the upstream feed but not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Unique station identifier.
    pub id: u32,
    pub station_name: String,
    pub available_docks: u32,
    pub total_docks: u32,
    pub available_bikes: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Feed-defined status code. The enumeration is owned by the feed;
    /// which values count as "in service" is decided by
    /// [`crate::store::ServicePolicy`].
    pub status_key: i64,
    pub st_address_1: String,
    pub st_address_2: String,
    pub city: String,
    pub postal_code: String,
    pub location: String,
    pub altitude: String,
    /// Marks a non-production station.
    pub test_station: bool,
    pub land_mark: String,
    /// `None` when the feed reports null or an empty string.
    pub last_communication_time: Option<String>,
}

/// A station designated either by id or by an already-resolved record.
///
/// Operations like [`crate::store::StationStore::is_empty_station`] accept
/// either form: the id variant is resolved through the store, the record
/// variant skips the lookup.
///
/// ```
/// use bikeshare::StationRef;
///
/// let by_id: StationRef = 42.into();
/// assert!(matches!(by_id, StationRef::Id(42)));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum StationRef<'a> {
    Id(u32),
    Record(&'a StationRecord),
}

impl From<u32> for StationRef<'static> {
    fn from(id: u32) -> Self {
        StationRef::Id(id)
    }
}

impl<'a> From<&'a StationRecord> for StationRef<'a> {
    fn from(record: &'a StationRecord) -> Self {
        StationRef::Record(record)
    }
}
