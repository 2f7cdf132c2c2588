use crate::archive::extract_entries;
use crate::fetcher::Fetcher;
use crate::table::{parse_table, ParsedTable};
use crate::Error;
use bytes::Bytes;
use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Source of the current time, injected so that expiry can be simulated
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall clock time in the zone the feed schedules are written in
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }
}

/// The clock of the machine, schedules being read in its local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One downloaded version of a feed: the raw archive and its decompressed files
///
/// A snapshot is never modified once built, except for the memoized tables
/// which are parsed from its own files. A new download always gives a new
/// snapshot, so tables from two versions of the feed cannot be mixed.
#[derive(Debug)]
pub struct FeedSnapshot {
    url: String,
    raw: Bytes,
    entries: HashMap<String, Bytes>,
    fetched_at: DateTime<Utc>,
    sha256: String,
    tables: Mutex<HashMap<String, Arc<ParsedTable>>>,
}

impl FeedSnapshot {
    /// Decompresses `raw` and builds the snapshot
    pub fn from_bytes(url: &str, raw: Bytes, fetched_at: DateTime<Utc>) -> Result<Self, Error> {
        let entries = extract_entries(&raw)?;
        let sha256 = format!("{:x}", Sha256::digest(&raw));
        Ok(Self {
            url: url.to_owned(),
            raw,
            entries,
            fetched_at,
            sha256,
            tables: Mutex::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// sha256 sum of the raw archive
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Names of all the files of the archive
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decompressed content of one file
    pub fn entry(&self, file_name: &str) -> Result<&Bytes, Error> {
        self.entries
            .get(file_name)
            .ok_or_else(|| Error::MissingFile(file_name.to_owned()))
    }

    /// Already parsed table, if any
    pub fn memoized(&self, file_name: &str) -> Option<Arc<ParsedTable>> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file_name)
            .cloned()
    }

    /// Keeps `table` as the parsed version of `file_name`
    ///
    /// If another caller memoized the same file first, its table is kept and returned.
    pub fn memoize(&self, file_name: &str, table: Arc<ParsedTable>) -> Arc<ParsedTable> {
        Arc::clone(
            self.tables
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(file_name.to_owned())
                .or_insert(table),
        )
    }

    /// Parsed table of a (small) file, parsed on first access only
    ///
    /// Do not use it for stop_times.txt, see [crate::table::parse_table_filtered].
    pub fn table(&self, file_name: &str) -> Result<Arc<ParsedTable>, Error> {
        if let Some(table) = self.memoized(file_name) {
            return Ok(table);
        }
        let table = parse_table(file_name, self.entry(file_name)?)?;
        Ok(self.memoize(file_name, Arc::new(table)))
    }
}

/// Keeps the last downloaded snapshot of a feed for a limited time
///
/// There is a single slot: asking for another url, or asking after the time to
/// live, downloads the feed again and replaces the snapshot wholesale.
/// Concurrent misses are not deduplicated: each of them downloads and the last
/// one to finish is kept.
pub struct ArchiveCache {
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<Arc<FeedSnapshot>>>,
}

impl ArchiveCache {
    pub fn new(fetcher: Arc<dyn Fetcher>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            fetcher,
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The snapshot currently held, fresh or not
    pub fn current(&self) -> Option<Arc<FeedSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets the current snapshot, the next call to [ArchiveCache::snapshot] downloads
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns a fresh snapshot of `url`, downloading it if needed
    ///
    /// A failed download is reported even if an expired snapshot is still held.
    pub async fn snapshot(&self, url: &str) -> Result<Arc<FeedSnapshot>, Error> {
        if let Some(current) = self.current() {
            let age = self.clock.now().signed_duration_since(current.fetched_at());
            if current.url() == url && age < self.ttl {
                debug!("feed {} served from cache ({}s old)", url, age.num_seconds());
                return Ok(current);
            }
        }

        let started = std::time::Instant::now();
        let raw = self.fetcher.fetch(url).await?;
        let snapshot = Arc::new(FeedSnapshot::from_bytes(url, raw, self.clock.now())?);
        info!(
            "fetched feed {} ({} bytes, {} files, sha256 {}) in {} ms",
            url,
            snapshot.raw().len(),
            snapshot.entries.len(),
            snapshot.sha256(),
            started.elapsed().as_millis()
        );

        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
