/*! Fetches a [GTFS](https://gtfs.org/) feed, keeps it cached and answers questions about it:
the routes, the stops, the stops near a location and the next departures of a route at a stop.

The feed is downloaded as a zip archive on the first question, then kept in memory
for a configurable time. Small tables (routes, stops, trips) are parsed once per
downloaded archive; stop_times.txt is only ever parsed with a filter so that a
large feed never has to fit in memory as a table.

A durable [PersistedCache] can be plugged in to share parsed tables across restarts.

```no_run
# async fn run() -> Result<(), gtfs_departures::Error> {
let feed = gtfs_departures::Feed::new("https://example.org/google_transit.zip")?;
println!("there are {} routes", feed.routes(None).await?.count);
# Ok(())
# }
```
*/

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod archive;
pub mod cache;
pub mod departures;
pub mod error;
mod feed;
mod feed_builder;
pub mod fetcher;
pub mod geo;
pub mod objects;
pub mod persisted;
pub mod queries;
pub mod table;
pub mod time;


pub use cache::{ArchiveCache, Clock, FeedSnapshot, SystemClock};
pub use error::{Error, ErrorKind};
pub use feed::{Feed, SourceState, SourceStatus};
pub use feed_builder::FeedBuilder;
pub use fetcher::Fetcher;
#[cfg(feature = "read-url")]
pub use fetcher::HttpFetcher;
pub use persisted::{DirectoryCache, NoopCache, PersistedCache};
pub use queries::{DepartureQuery, RouteSearch, StopSearch};
