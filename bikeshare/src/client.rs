//! Client facade: fetch wiring, snapshot ownership, and the query surface.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::{StationRecord, StationRef};
use crate::feed::convert::normalize_all;
use crate::feed::{FeedClient, FeedConfig, FeedError};
use crate::store::{ServicePolicy, StationStore};

/// Capacity of the notification channel; slow subscribers miss old events
/// rather than blocking a fetch.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Lifecycle notification, broadcast once per `fetch()` call.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// A fetch completed and the snapshot was replaced.
    Fetched,
    /// A fetch failed; `status` carries the HTTP status code when the
    /// failure was a transport-level one.
    Error {
        message: String,
        status: Option<u16>,
    },
}

/// Bike-share feed client.
///
/// Owns the feed client and the current snapshot. Cloning is cheap and
/// clones share the snapshot, so one task can fetch while others query.
///
/// Queries are synchronous and operate on the in-memory snapshot; before the
/// first successful fetch they see an empty store. Each `fetch()` replaces
/// the whole snapshot in a single swap, so racing fetches are last-write-wins
/// and queries never observe a partial update.
#[derive(Clone)]
pub struct BikeShareClient {
    feed: FeedClient,
    snapshot: Arc<Mutex<Arc<StationStore>>>,
    events: broadcast::Sender<FetchEvent>,
    policy: ServicePolicy,
}

impl BikeShareClient {
    /// Create a client against the default production feed.
    pub fn new() -> Result<Self, FeedError> {
        Self::with_config(FeedConfig::new())
    }

    /// Create a client against a custom feed URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self, FeedError> {
        Self::with_config(FeedConfig::new().with_url(url))
    }

    /// Create a client with full feed configuration.
    pub fn with_config(config: FeedConfig) -> Result<Self, FeedError> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            feed: FeedClient::new(config)?,
            snapshot: Arc::new(Mutex::new(Arc::new(StationStore::empty()))),
            events,
            policy: ServicePolicy::default(),
        })
    }

    /// Override which status keys count as in service.
    ///
    /// Applies to snapshots built by subsequent fetches.
    pub fn with_policy(mut self, policy: ServicePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Subscribe to fetch notifications.
    ///
    /// Each `fetch()` delivers exactly one event to every current subscriber:
    /// [`FetchEvent::Fetched`] on success, [`FetchEvent::Error`] on failure.
    pub fn subscribe(&self) -> broadcast::Receiver<FetchEvent> {
        self.events.subscribe()
    }

    /// Fetch the feed and replace the snapshot.
    ///
    /// Returns the number of stations on success. The same outcome is also
    /// broadcast to subscribers; no retry, no cancellation.
    pub async fn fetch(&self) -> Result<usize, FeedError> {
        match self.feed.fetch_all().await {
            Ok(stations) => {
                let records = normalize_all(stations);
                let count = records.len();
                let store = Arc::new(StationStore::with_policy(records, self.policy.clone()));
                *self.lock() = store;

                debug!(stations = count, url = self.feed.url(), "feed fetch complete");
                let _ = self.events.send(FetchEvent::Fetched);
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, url = self.feed.url(), "feed fetch failed");
                let _ = self.events.send(FetchEvent::Error {
                    message: err.to_string(),
                    status: err.status(),
                });
                Err(err)
            }
        }
    }

    /// Handle on the current snapshot, for running many queries against one
    /// consistent view.
    pub fn snapshot(&self) -> Arc<StationStore> {
        self.lock().clone()
    }

    /// All stations in feed order.
    pub fn stations(&self) -> Vec<StationRecord> {
        self.snapshot().stations().to_vec()
    }

    /// Exact-match lookup by id.
    pub fn station(&self, id: u32) -> Option<StationRecord> {
        self.snapshot().station(id).cloned()
    }

    /// The station with the highest id, or `None` before the first fetch.
    pub fn last_station(&self) -> Option<StationRecord> {
        self.snapshot().last_station().cloned()
    }

    /// Stations in the given city (case-insensitive match).
    pub fn stations_in_city(&self, city: &str) -> Vec<StationRecord> {
        self.snapshot()
            .stations_in_city(city)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Online stations with no bikes available.
    pub fn empty_stations(&self) -> Vec<StationRecord> {
        self.snapshot()
            .empty_stations()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Online stations with no docks available.
    pub fn full_stations(&self) -> Vec<StationRecord> {
        self.snapshot()
            .full_stations()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Stations that are not in service.
    pub fn offline_stations(&self) -> Vec<StationRecord> {
        self.snapshot()
            .offline_stations()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether the given station (id or record) is empty.
    pub fn is_empty_station<'a>(&self, station: impl Into<StationRef<'a>>) -> bool {
        self.snapshot().is_empty_station(station)
    }

    /// Whether the given station (id or record) is full.
    pub fn is_full_station<'a>(&self, station: impl Into<StationRef<'a>>) -> bool {
        self.snapshot().is_full_station(station)
    }

    /// Percent of docks holding a bike, rounded to two decimal places.
    pub fn percent_available_bikes<'a>(&self, station: impl Into<StationRef<'a>>) -> f64 {
        self.snapshot().percent_available_bikes(station)
    }

    fn lock(&self) -> MutexGuard<'_, Arc<StationStore>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::broadcast::error::TryRecvError;

    /// Spin up a server that answers one connection per queued response,
    /// in order, and return a feed URL pointing at it.
    async fn serve_responses(responses: Vec<Vec<u8>>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                // Drain the request headers before responding
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                socket.write_all(&response).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        format!("http://{addr}/stations/json")
    }

    async fn serve_once(response: Vec<u8>) -> String {
        serve_responses(vec![response]).await
    }

    fn http_response(status_line: &str, body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        )
        .into_bytes()
    }

    fn fixture_body() -> String {
        std::fs::read_to_string("data/fixtures/stations.json").unwrap()
    }

    #[test]
    fn queries_before_first_fetch_are_empty() {
        let client = BikeShareClient::new().unwrap();

        assert!(client.stations().is_empty());
        assert!(client.station(1).is_none());
        assert!(client.last_station().is_none());
        assert!(client.stations_in_city("San Jose").is_empty());
        assert!(!client.is_empty_station(1));
        assert!(!client.is_full_station(1));
        assert_eq!(client.percent_available_bikes(1), 0.0);
    }

    #[tokio::test]
    async fn fetch_populates_snapshot_and_notifies() {
        let url = serve_once(http_response("200 OK", &fixture_body())).await;
        let client = BikeShareClient::with_url(url).unwrap();
        let mut events = client.subscribe();

        let count = client.fetch().await.unwrap();
        assert_eq!(count, 64);

        assert!(matches!(events.try_recv(), Ok(FetchEvent::Fetched)));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        assert_eq!(client.stations().len(), 64);
        assert_eq!(
            client.station(3).unwrap().station_name,
            "San Jose Civic Center"
        );
        assert_eq!(client.last_station().unwrap().id, 77);
        assert_eq!(client.stations_in_city("san francisco").len(), 34);
        assert!(client.is_full_station(57));
        assert_eq!(client.percent_available_bikes(58), 36.84);
    }

    #[tokio::test]
    async fn http_500_emits_exactly_one_error_event() {
        let url = serve_once(http_response("500 Internal Server Error", "")).await;
        let client = BikeShareClient::with_url(url).unwrap();
        let mut events = client.subscribe();

        let err = client.fetch().await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        match events.try_recv() {
            Ok(FetchEvent::Error { status, .. }) => assert_eq!(status, Some(500)),
            other => panic!("expected error event, got {other:?}"),
        }
        // No fetch notification follows a failure
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        assert!(client.stations().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let url = serve_once(http_response("200 OK", "this is not json")).await;
        let client = BikeShareClient::with_url(url).unwrap();
        let mut events = client.subscribe();

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Json { .. }));
        assert_eq!(err.status(), None);

        match events.try_recv() {
            Ok(FetchEvent::Error { status, .. }) => assert_eq!(status, None),
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refetch_replaces_whole_snapshot() {
        let offline = std::fs::read_to_string("data/fixtures/stations_with_offline.json").unwrap();
        let url = serve_responses(vec![
            http_response("200 OK", &fixture_body()),
            http_response("200 OK", &offline),
        ])
        .await;

        let client = BikeShareClient::with_url(url).unwrap();

        client.fetch().await.unwrap();
        assert_eq!(client.stations().len(), 64);
        assert!(client.station(77).is_some());

        client.fetch().await.unwrap();
        assert_eq!(client.stations().len(), 12);
        assert_eq!(client.offline_stations().len(), 1);
        // No merging with previous data: station 77 is gone
        assert!(client.station(77).is_none());
    }

    #[tokio::test]
    async fn clones_share_the_snapshot() {
        let url = serve_once(http_response("200 OK", &fixture_body())).await;
        let client = BikeShareClient::with_url(url).unwrap();
        let observer = client.clone();

        client.fetch().await.unwrap();

        assert_eq!(observer.stations().len(), 64);
        assert!(observer.is_empty_station(4));
    }

    #[tokio::test]
    async fn custom_policy_applies_to_fetched_snapshot() {
        let offline = std::fs::read_to_string("data/fixtures/stations_with_offline.json").unwrap();
        let url = serve_once(http_response("200 OK", &offline)).await;

        let client = BikeShareClient::with_url(url)
            .unwrap()
            .with_policy(ServicePolicy::new([1, 3]));
        client.fetch().await.unwrap();

        // Status key 3 now counts as in service, so nothing is offline and
        // the zero-bike station becomes genuinely empty.
        assert!(client.offline_stations().is_empty());
        assert_eq!(client.empty_stations().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_handle_is_consistent() {
        let url = serve_once(http_response("200 OK", &fixture_body())).await;
        let client = BikeShareClient::with_url(url).unwrap();
        client.fetch().await.unwrap();

        let snapshot = client.snapshot();
        let station = snapshot.station(58).unwrap();
        assert_eq!(snapshot.percent_available_bikes(station), 36.84);
        assert_eq!(snapshot.percent_available_bikes(58), 36.84);
    }
}
