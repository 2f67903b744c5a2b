use thiserror::Error;

/// Errors that can occur while talking to the Bitbucket API
///
/// Transport and record-mapping errors propagate to their immediate caller.
/// The only place failures are swallowed is the bulk file fetcher, which
/// isolates at the per-repository granularity and logs instead.
#[derive(Error, Debug)]
pub enum BitbucketError {
    /// A required environment variable is not set
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The API answered with a non-success status code
    #[error("Bitbucket API error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The request could not be sent or the response body could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body did not match the expected record shape
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Writing a downloaded file to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned download task panicked or was aborted
    #[error("Download task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
