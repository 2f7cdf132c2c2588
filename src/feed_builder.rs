use crate::cache::{Clock, SystemClock};
use crate::fetcher::Fetcher;
use crate::persisted::{NoopCache, PersistedCache};
use crate::{Error, Feed};
use chrono::Duration;
use std::sync::Arc;

/// Allows to parameterize how a [Feed] is fetched and cached
///
/// ```no_run
/// let feed = gtfs_departures::FeedBuilder::default()
///     .snapshot_ttl(chrono::Duration::hours(1))
///     .store(std::sync::Arc::new(gtfs_departures::DirectoryCache::new("/tmp/gtfs")))
///     .build("https://example.org/google_transit.zip")?;
/// # Ok::<(), gtfs_departures::Error>(())
/// ```
#[derive(Derivative)]
#[derivative(Default)]
pub struct FeedBuilder {
    /// How long a downloaded archive is used before being downloaded again
    #[derivative(Default(value = "Duration::hours(6)"))]
    pub snapshot_ttl: Duration,
    /// Lifetime of the parsed tables in the persisted cache
    #[derivative(Default(value = "Duration::hours(6)"))]
    pub table_ttl: Duration,
    /// Lifetime of the stop times of a route at a stop in the persisted cache
    #[derivative(Default(value = "Duration::minutes(5)"))]
    pub departures_ttl: Duration,
    fetcher: Option<Arc<dyn Fetcher>>,
    store: Option<Arc<dyn PersistedCache>>,
    clock: Option<Arc<dyn Clock>>,
}

impl FeedBuilder {
    /// Returns Self and can be chained
    pub fn snapshot_ttl(&mut self, ttl: Duration) -> &mut Self {
        self.snapshot_ttl = ttl;
        self
    }

    pub fn table_ttl(&mut self, ttl: Duration) -> &mut Self {
        self.table_ttl = ttl;
        self
    }

    pub fn departures_ttl(&mut self, ttl: Duration) -> &mut Self {
        self.departures_ttl = ttl;
        self
    }

    /// Replaces the http client, mostly for tests or other transports
    pub fn fetcher(&mut self, fetcher: Arc<dyn Fetcher>) -> &mut Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Durable cache shared across restarts, nothing is persisted by default
    pub fn store(&mut self, store: Arc<dyn PersistedCache>) -> &mut Self {
        self.store = Some(store);
        self
    }

    pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the feed of `url`; nothing is downloaded before the first query
    pub fn build(&self, url: &str) -> Result<Feed, Error> {
        let fetcher = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => default_fetcher()?,
        };
        let store = self
            .store
            .clone()
            .unwrap_or_else(|| Arc::new(NoopCache) as Arc<dyn PersistedCache>);
        let clock = self
            .clock
            .clone()
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        Ok(Feed::from_parts(
            url,
            fetcher,
            store,
            clock,
            self.snapshot_ttl,
            self.table_ttl,
            self.departures_ttl,
        ))
    }
}

#[cfg(feature = "read-url")]
fn default_fetcher() -> Result<Arc<dyn Fetcher>, Error> {
    Ok(Arc::new(crate::fetcher::HttpFetcher::new()?))
}

#[cfg(not(feature = "read-url"))]
fn default_fetcher() -> Result<Arc<dyn Fetcher>, Error> {
    Err(Error::Transport(
        "no fetcher configured, build with the read-url feature or provide one".to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lifetimes() {
        let builder = FeedBuilder::default();
        assert_eq!(Duration::hours(6), builder.snapshot_ttl);
        assert_eq!(Duration::hours(6), builder.table_ttl);
        assert_eq!(Duration::minutes(5), builder.departures_ttl);
    }
}
