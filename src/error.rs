use thiserror::Error;

#[derive(Debug)]
pub struct LineError {
    pub headers: Vec<String>,
    pub values: Vec<String>,
}

/// How an [Error] should be reported to whoever asked the question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The feed could not be obtained or read; the caller did nothing wrong
    ServiceUnavailable,
    /// The query itself is incomplete or out of range
    InvalidInput,
}

/// An error that can occur when fetching, reading or querying a feed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("feed source answered {status} {status_text}")]
    FetchStatus { status: u16, status_text: String },
    #[cfg(feature = "read-url")]
    #[error("impossible to remotely access the feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("impossible to remotely access the feed: {0}")]
    Transport(String),
    #[error("invalid feed archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("impossible to read '{file_name}' from the archive")]
    NamedFileIO {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not find file {0} in the feed")]
    MissingFile(String),
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        file_name: String,
        #[source]
        source: csv::Error,
        line_in_error: Option<LineError>,
    },
    #[error("'{0}' is not a valid time")]
    InvalidTime(String),
    #[error("invalid query: {0}")]
    InvalidInput(String),
    #[error("persisted cache failure: {0}")]
    Store(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::ServiceUnavailable,
        }
    }

    pub fn is_caller_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_status_message_carries_the_status() {
        let e = Error::FetchStatus {
            status: 404,
            status_text: "Not Found".to_owned(),
        };
        assert_eq!("feed source answered 404 Not Found", e.to_string());
        assert_eq!(ErrorKind::ServiceUnavailable, e.kind());
    }

    #[test]
    fn only_invalid_input_is_a_caller_error() {
        assert!(Error::InvalidInput("route_id is required".into()).is_caller_error());
        assert!(!Error::MissingFile("trips.txt".into()).is_caller_error());
        assert!(!Error::InvalidTime("8h".into()).is_caller_error());
    }
}
