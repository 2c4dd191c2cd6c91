use thiserror::Error;

/// Core error type, one variant per failure kind.
///
/// Every user-facing error maps to a distinct process exit code via
/// [`Error::exit_code`] so scripts can distinguish failure classes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration corruption: {0}")]
    Corrupt(String),

    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("secrets file error: {0}")]
    Secrets(#[from] dotenvy::Error),

    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("secret {0} is not configured")]
    MissingSecret(&'static str),

    #[error("crontab failed: {0}")]
    Cron(String),
}

impl Error {
    /// Exit code for this error kind. 1 is reserved for unclassified
    /// failures at the binary layer.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArgument(_) => 2,
            Error::Corrupt(_) => 3,
            Error::Io(_) | Error::Malformed(_) | Error::Secrets(_) => 4,
            Error::Request { .. } | Error::Status { .. } | Error::MissingSecret(_) => 5,
            Error::Cron(_) => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Cap an HTTP error body for inclusion in an [`Error::Status`], cutting
/// on a char boundary so multibyte responses cannot panic the caller.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
