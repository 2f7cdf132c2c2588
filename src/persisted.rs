//! Optional durable key/value store consulted before parsing feed tables
//!
//! Every failure of a store is reported as [Error::Store]; the feed swallows
//! them, logs them and falls back to parsing the archive.

use crate::cache::{Clock, SystemClock};
use crate::Error;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

/// A durable cache shared by several processes or restarts
#[async_trait]
pub trait PersistedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn put(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), Error>;
}

/// Stores nothing: every lookup is a miss
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl PersistedCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: String, _ttl_seconds: u64) -> Result<(), Error> {
        Ok(())
    }
}

/// Short stable hash of a feed url, so that two feeds never share keys
pub fn url_hash(url: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(url.as_bytes()));
    digest[..16].to_owned()
}

/// Key of a table of a feed, like `gtfs:routes:<hash>`
pub fn table_key(table: &str, url: &str) -> String {
    format!("gtfs:{}:{}", table, url_hash(url))
}

/// Key of the stop times matching a route and a stop of a feed
///
/// Feed identifiers may contain `:`, they are escaped so that two different
/// pairs never share a key.
pub fn departures_key(route_id: &str, stop_id: &str, url: &str) -> String {
    format!(
        "gtfs:departures:{}:{}:{}",
        escape_id(route_id),
        escape_id(stop_id),
        url_hash(url)
    )
}

fn escape_id(id: &str) -> Cow<'_, str> {
    if id.contains(|c: char| c == '%' || c == ':') {
        Cow::Owned(id.replace('%', "%25").replace(':', "%3A"))
    } else {
        Cow::Borrowed(id)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredValue {
    expires_at: i64,
    value: String,
}

/// Keeps each entry as a small json file in a directory
#[derive(Clone)]
pub struct DirectoryCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl DirectoryCache {
    /// The directory is created on first write
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock<P: Into<PathBuf>>(dir: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        // sanitized names may collide, the hash of the full key keeps them apart
        self.dir
            .join(format!("{}-{}.json", file_name, url_hash(key)))
    }
}

fn store_error(key: &str, e: impl std::fmt::Display) -> Error {
    Error::Store(format!("{}: {}", key, e))
}

#[async_trait]
impl PersistedCache for DirectoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(store_error(key, e)),
        };
        let stored: StoredValue =
            serde_json::from_str(&content).map_err(|e| store_error(key, e))?;
        if stored.expires_at <= self.clock.now().timestamp() {
            if let Err(e) = fs::remove_file(&path).await {
                debug!("impossible to remove expired entry {}: {}", key, e);
            }
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    async fn put(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| store_error(key, e))?;
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let stored = StoredValue {
            expires_at: self.clock.now().timestamp().saturating_add(ttl),
            value,
        };
        let content = serde_json::to_string(&stored).map_err(|e| store_error(key, e))?;
        fs::write(self.path(key), content)
            .await
            .map_err(|e| store_error(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Mutex;

    struct StepClock(Mutex<DateTime<Utc>>);

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gtfs-departures-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn keys_are_namespaced_per_feed() {
        let a = table_key("routes", "https://a.example/gtfs.zip");
        let b = table_key("routes", "https://b.example/gtfs.zip");
        assert!(a.starts_with("gtfs:routes:"));
        assert_eq!(a, table_key("routes", "https://a.example/gtfs.zip"));
        assert_ne!(a, b);
        assert_eq!("gtfs:routes:".len() + 16, a.len());
        assert!(departures_key("R1", "A", "https://a.example/gtfs.zip")
            .starts_with("gtfs:departures:R1:A:"));
    }

    #[test]
    fn ids_with_colons_do_not_collide() {
        let url = "https://a.example/gtfs.zip";
        assert_ne!(
            departures_key("a:b", "c", url),
            departures_key("a", "b:c", url)
        );
        assert_ne!(
            departures_key("a%3Ab", "c", url),
            departures_key("a:b", "c", url)
        );
        assert!(departures_key("a:b", "c", url).starts_with("gtfs:departures:a%3Ab:c:"));
    }

    #[tokio::test]
    async fn noop_never_hits() {
        NoopCache.put("k", "v".to_owned(), 60).await.unwrap();
        assert_eq!(None, NoopCache.get("k").await.unwrap());
    }

    #[tokio::test]
    async fn directory_round_trip_and_expiry() {
        let clock = Arc::new(StepClock(Mutex::new(Utc::now())));
        let store = DirectoryCache::with_clock(temp_dir("expiry"), clock.clone());
        assert_eq!(None, store.get("gtfs:routes:abc").await.unwrap());
        store
            .put("gtfs:routes:abc", "[1,2]".to_owned(), 60)
            .await
            .unwrap();
        assert_eq!(
            Some("[1,2]".to_owned()),
            store.get("gtfs:routes:abc").await.unwrap()
        );
        assert_eq!(None, store.get("gtfs:stops:abc").await.unwrap());

        {
            let mut now = clock.0.lock().unwrap();
            *now = *now + Duration::seconds(61);
        }
        assert_eq!(None, store.get("gtfs:routes:abc").await.unwrap());
        assert!(!store.path("gtfs:routes:abc").exists());
    }

    #[tokio::test]
    async fn corrupted_entry_is_a_store_error() {
        let dir = temp_dir("corrupted");
        let store = DirectoryCache::new(&dir);
        store.put("k", "v".to_owned(), 60).await.unwrap();
        fs::write(store.path("k"), "not json").await.unwrap();
        assert!(matches!(store.get("k").await, Err(Error::Store(_))));
    }
}
