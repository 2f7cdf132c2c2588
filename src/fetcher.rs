use crate::Error;
use async_trait::async_trait;
use bytes::Bytes;

/// Retrieves the raw archive behind a feed url
///
/// Implementations must not retry: a failed transfer is reported as is and
/// the retry policy, if any, belongs to the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads the whole archive
    async fn fetch(&self, url: &str) -> Result<Bytes, Error>;

    /// Checks that the source answers without necessarily downloading it
    async fn probe(&self, url: &str) -> Result<(), Error> {
        self.fetch(url).await.map(|_| ())
    }
}

/// Fetches feeds over http(s) with [reqwest]
///
/// The library must be built with the read-url feature
#[cfg(feature = "read-url")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "read-url")]
impl HttpFetcher {
    /// Requests give up after 30 seconds
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "read-url")]
fn check_status(status: reqwest::StatusCode) -> Result<(), Error> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::FetchStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
        })
    }
}

#[cfg(feature = "read-url")]
#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, Error> {
        let res = self.client.get(url).send().await?;
        check_status(res.status())?;
        Ok(res.bytes().await?)
    }

    async fn probe(&self, url: &str) -> Result<(), Error> {
        let res = self.client.head(url).send().await?;
        check_status(res.status())
    }
}

#[cfg(all(test, feature = "read-url"))]
mod tests {
    use super::*;

    #[test]
    fn unsuccessful_status_is_a_fetch_error() {
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
        match check_status(reqwest::StatusCode::SERVICE_UNAVAILABLE) {
            Err(Error::FetchStatus {
                status,
                status_text,
            }) => {
                assert_eq!(503, status);
                assert_eq!("Service Unavailable", status_text);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
