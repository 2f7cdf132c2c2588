use crate::cache::{ArchiveCache, Clock, FeedSnapshot};
use crate::departures::{schedule, DepartureEvent};
use crate::fetcher::Fetcher;
use crate::persisted::{departures_key, table_key, PersistedCache};
use crate::queries::{
    departure_list, departure_stop_times, find_routes, find_stops, list_routes, list_stops,
    DepartureList, DepartureQuery, RouteList, RouteSearch, RouteSearchResult, StopList,
    StopSearch, StopSearchResult,
};
use crate::objects::StopTime;
use crate::table::ParsedTable;
use crate::{Error, FeedBuilder};
use chrono::{Duration, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

const ROUTES: &str = "routes.txt";
const STOPS: &str = "stops.txt";
const TRIPS: &str = "trips.txt";
const STOP_TIMES: &str = "stop_times.txt";

/// A parsed table as kept in the persisted cache, with the archive it comes from
#[derive(Serialize, Deserialize)]
struct StoredTable {
    feed_sha256: String,
    table: Arc<ParsedTable>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    Available,
    Unavailable,
    Error,
}

/// Whether the feed source can currently be reached
#[derive(Debug, Serialize, PartialEq)]
pub struct SourceStatus {
    pub status: SourceState,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

/// A remote feed and every question that can be asked about it
///
/// ```no_run
/// # async fn run() -> Result<(), gtfs_departures::Error> {
/// let feed = gtfs_departures::Feed::new("https://example.org/google_transit.zip")?;
/// let departures = feed
///     .departures(&gtfs_departures::DepartureQuery::new("25", "1234"))
///     .await?;
/// for d in departures.departures {
///     println!("{} {}", d.departure.format("%H:%M"), d.trip_id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Feed {
    url: String,
    cache: ArchiveCache,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn PersistedCache>,
    clock: Arc<dyn Clock>,
    table_ttl: Duration,
    departures_ttl: Duration,
}

impl Feed {
    /// A feed with the default settings, see [FeedBuilder] to change them
    pub fn new(url: &str) -> Result<Feed, Error> {
        FeedBuilder::default().build(url)
    }

    pub(crate) fn from_parts(
        url: &str,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn PersistedCache>,
        clock: Arc<dyn Clock>,
        snapshot_ttl: Duration,
        table_ttl: Duration,
        departures_ttl: Duration,
    ) -> Feed {
        Feed {
            url: url.to_owned(),
            cache: ArchiveCache::new(Arc::clone(&fetcher), Arc::clone(&clock), snapshot_ttl),
            fetcher,
            store,
            clock,
            table_ttl,
            departures_ttl,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache(&self) -> &ArchiveCache {
        &self.cache
    }

    /// The current snapshot of the feed, downloaded if missing or expired
    pub async fn snapshot(&self) -> Result<Arc<FeedSnapshot>, Error> {
        self.cache.snapshot(&self.url).await
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("ignoring unreadable persisted entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("persisted cache lookup failed: {}", e);
                None
            }
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("impossible to serialize {} for the persisted cache: {}", key, e);
                return;
            }
        };
        let ttl_seconds = u64::try_from(ttl.num_seconds()).unwrap_or(0);
        if let Err(e) = self.store.put(key, raw, ttl_seconds).await {
            warn!("persisted cache update failed: {}", e);
        }
    }

    /// A small table of `snapshot`, from memory, from the persisted cache or parsed
    async fn table(
        &self,
        snapshot: &FeedSnapshot,
        file_name: &str,
    ) -> Result<Arc<ParsedTable>, Error> {
        if let Some(table) = snapshot.memoized(file_name) {
            return Ok(table);
        }

        let key = table_key(file_name.trim_end_matches(".txt"), &self.url);
        if let Some(stored) = self.load::<StoredTable>(&key).await {
            if stored.feed_sha256 == snapshot.sha256() {
                debug!("{} read from the persisted cache", file_name);
                return Ok(snapshot.memoize(file_name, stored.table));
            }
        }

        let table = snapshot.table(file_name)?;
        let stored = StoredTable {
            feed_sha256: snapshot.sha256().to_owned(),
            table: Arc::clone(&table),
        };
        self.save(&key, &stored, self.table_ttl).await;
        Ok(table)
    }

    /// All routes, or those whose id or names contain `q`
    pub async fn routes(&self, q: Option<&str>) -> Result<RouteList, Error> {
        let snapshot = self.snapshot().await?;
        let routes = self.table(&snapshot, ROUTES).await?;
        Ok(list_routes(&routes, q))
    }

    /// All stops, or those whose name contains `q`
    pub async fn stops(&self, q: Option<&str>) -> Result<StopList, Error> {
        let snapshot = self.snapshot().await?;
        let stops = self.table(&snapshot, STOPS).await?;
        Ok(list_stops(&stops, q))
    }

    pub async fn find_stop(&self, search: &StopSearch) -> Result<StopSearchResult, Error> {
        search.validate()?;
        let snapshot = self.snapshot().await?;
        let stops = self.table(&snapshot, STOPS).await?;
        Ok(find_stops(&stops, search))
    }

    pub async fn find_route(&self, search: &RouteSearch) -> Result<RouteSearchResult, Error> {
        search.validate()?;
        let snapshot = self.snapshot().await?;
        let routes = self.table(&snapshot, ROUTES).await?;
        if !search.include_stops {
            return find_routes(&routes, search, None);
        }
        let trips = self.table(&snapshot, TRIPS).await?;
        let stops = self.table(&snapshot, STOPS).await?;
        let stop_times = snapshot.entry(STOP_TIMES)?;
        find_routes(&routes, search, Some((&trips, stop_times, &stops)))
    }

    /// Every upcoming departure of a route at a stop after `reference`, earliest first
    pub async fn next_departures(
        &self,
        route_id: &str,
        stop_id: &str,
        reference: NaiveDateTime,
    ) -> Result<Vec<DepartureEvent>, Error> {
        let stop_times = self.stop_times_at(route_id, stop_id).await?;
        Ok(schedule(stop_times, reference))
    }

    /// The next departures from now
    pub async fn departures(&self, query: &DepartureQuery) -> Result<DepartureList, Error> {
        self.departures_at(query, self.clock.local_now()).await
    }

    /// The next departures after `reference`
    pub async fn departures_at(
        &self,
        query: &DepartureQuery,
        reference: NaiveDateTime,
    ) -> Result<DepartureList, Error> {
        let (route_id, stop_id) = query.validate()?;
        let events = self.next_departures(route_id, stop_id, reference).await?;
        Ok(departure_list(route_id, stop_id, events, query.limit))
    }

    /// Stop times of a route at a stop, possibly from the short lived persisted entry
    async fn stop_times_at(&self, route_id: &str, stop_id: &str) -> Result<Vec<StopTime>, Error> {
        let key = departures_key(route_id, stop_id, &self.url);
        if let Some(stop_times) = self.load::<Vec<StopTime>>(&key).await {
            debug!("stop times of {} at {} read from the persisted cache", route_id, stop_id);
            return Ok(stop_times);
        }

        let snapshot = self.snapshot().await?;
        let trips = self.table(&snapshot, TRIPS).await?;
        let stop_times =
            departure_stop_times(route_id, stop_id, &trips, snapshot.entry(STOP_TIMES)?)?;
        self.save(&key, &stop_times, self.departures_ttl).await;
        Ok(stop_times)
    }

    /// Checks whether the feed source answers, without touching the cached snapshot
    pub async fn source_status(&self) -> SourceStatus {
        match self.fetcher.probe(&self.url).await {
            Ok(()) => SourceStatus {
                status: SourceState::Available,
                url: self.url.clone(),
                status_code: None,
                error: None,
                message: "GTFS data source is accessible".to_owned(),
            },
            Err(Error::FetchStatus { status, .. }) => SourceStatus {
                status: SourceState::Unavailable,
                url: self.url.clone(),
                status_code: Some(status),
                error: None,
                message: format!("GTFS data source returned status code {}", status),
            },
            Err(e) => SourceStatus {
                status: SourceState::Error,
                url: self.url.clone(),
                status_code: None,
                error: Some(e.to_string()),
                message: "Failed to connect to GTFS data source".to_owned(),
            },
        }
    }
}
