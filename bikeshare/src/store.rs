//! In-memory station snapshot and query operations.

use std::collections::HashMap;

use crate::domain::{StationRecord, StationRef};

/// Decides which stations count as in service.
///
/// The feed's `statusKey` enumeration is feed-defined, so the set of values
/// treated as "in service" is configurable rather than hard-coded. Test
/// stations are never in service.
#[derive(Debug, Clone)]
pub struct ServicePolicy {
    /// Status keys that count as in service.
    pub in_service_keys: Vec<i64>,
}

impl ServicePolicy {
    /// Policy recognizing the given status keys as in service.
    pub fn new(in_service_keys: impl Into<Vec<i64>>) -> Self {
        Self {
            in_service_keys: in_service_keys.into(),
        }
    }

    /// Whether a station is online: in service and not a test station.
    pub fn is_online(&self, station: &StationRecord) -> bool {
        !station.test_station && self.in_service_keys.contains(&station.status_key)
    }
}

impl Default for ServicePolicy {
    fn default() -> Self {
        // statusKey 1 is the only value observed as in-service on the feed
        Self::new([1])
    }
}

/// The complete station set as of the most recent successful fetch.
///
/// Records are kept in feed insertion order and indexed by id. The whole
/// snapshot is replaced on each fetch; queries never observe a partial
/// update. Query methods return references into the snapshot or owned
/// values, never anything that lets a caller mutate stored state.
#[derive(Debug, Clone)]
pub struct StationStore {
    records: Vec<StationRecord>,
    by_id: HashMap<u32, usize>,
    policy: ServicePolicy,
}

impl StationStore {
    /// Build a store with the default service policy.
    pub fn new(records: Vec<StationRecord>) -> Self {
        Self::with_policy(records, ServicePolicy::default())
    }

    /// Build a store with a custom service policy.
    ///
    /// Ids are expected to be unique; if the feed ever repeats one, the last
    /// occurrence wins the index.
    pub fn with_policy(records: Vec<StationRecord>, policy: ServicePolicy) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();

        Self {
            records,
            by_id,
            policy,
        }
    }

    /// A store with no stations (the state before the first fetch).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of stations in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no stations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The station with the highest id, or `None` if the snapshot is empty.
    pub fn last_station(&self) -> Option<&StationRecord> {
        self.records.iter().max_by_key(|r| r.id)
    }

    /// Exact-match lookup by id.
    pub fn station(&self, id: u32) -> Option<&StationRecord> {
        self.by_id.get(&id).map(|&i| &self.records[i])
    }

    /// All stations in feed order.
    pub fn stations(&self) -> &[StationRecord] {
        &self.records
    }

    /// Stations whose city matches the filter, case-insensitively.
    ///
    /// An unmatched filter yields an empty vec, never an error.
    pub fn stations_in_city(&self, city: &str) -> Vec<&StationRecord> {
        let wanted = city.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.city.to_lowercase() == wanted)
            .collect()
    }

    /// Online stations with no bikes available.
    pub fn empty_stations(&self) -> Vec<&StationRecord> {
        self.records
            .iter()
            .filter(|r| self.is_empty_record(r))
            .collect()
    }

    /// Online stations with no docks available.
    pub fn full_stations(&self) -> Vec<&StationRecord> {
        self.records
            .iter()
            .filter(|r| self.is_full_record(r))
            .collect()
    }

    /// Stations that are not online (offline status or test station).
    pub fn offline_stations(&self) -> Vec<&StationRecord> {
        self.records
            .iter()
            .filter(|r| !self.policy.is_online(r))
            .collect()
    }

    /// Whether the given station is empty (no bikes, online).
    ///
    /// Accepts an id or an already-resolved record; an unknown id is `false`.
    pub fn is_empty_station<'a>(&self, station: impl Into<StationRef<'a>>) -> bool {
        self.resolve(station.into())
            .is_some_and(|r| self.is_empty_record(r))
    }

    /// Whether the given station is full (no docks, online).
    ///
    /// Accepts an id or an already-resolved record; an unknown id is `false`.
    pub fn is_full_station<'a>(&self, station: impl Into<StationRef<'a>>) -> bool {
        self.resolve(station.into())
            .is_some_and(|r| self.is_full_record(r))
    }

    /// Percentage of docks currently holding a bike, rounded half-up to two
    /// decimal places.
    ///
    /// Returns `0.0` when `totalDocks` is zero or the id is unknown; never
    /// errors.
    pub fn percent_available_bikes<'a>(&self, station: impl Into<StationRef<'a>>) -> f64 {
        let Some(record) = self.resolve(station.into()) else {
            return 0.0;
        };

        if record.total_docks == 0 {
            return 0.0;
        }

        let percent = record.available_bikes as f64 / record.total_docks as f64 * 100.0;
        round2(percent)
    }

    fn resolve<'a>(&'a self, station: StationRef<'a>) -> Option<&'a StationRecord> {
        match station {
            StationRef::Id(id) => self.station(id),
            StationRef::Record(record) => Some(record),
        }
    }

    fn is_empty_record(&self, record: &StationRecord) -> bool {
        record.available_bikes == 0 && self.policy.is_online(record)
    }

    fn is_full_record(&self, record: &StationRecord) -> bool {
        record.available_docks == 0 && self.policy.is_online(record)
    }
}

/// Round half-up to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
