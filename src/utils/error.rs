// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors (timeouts included)

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // Any other non-2xx status

    #[error("Wikipedia rate limit likely exceeded")]
    RateLimited,

    #[error("Page not found: {0}")]
    PageNotFound(String),
}

/// One failed attempt in the candidate-page chain. None of these are fatal.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Fetching '{title}' failed: {source}")]
    Fetch {
        title: String,
        #[source]
        source: WikiError,
    },

    #[error("No weekly number-one table found on '{0}'")]
    NoWeeklyTable(String),

    #[error("'{title}' yielded only {rows} dated rows (need {min})")]
    TooFewRows { title: String, rows: usize, min: usize },

    #[error("'{title}' has no rows dated in {year}")]
    NoRowsForYear { title: String, year: i32 },

    #[error("'{0}' already failed earlier in this build")]
    PreviouslyFailed(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wikipedia interaction failed: {0}")]
    Wiki(#[from] WikiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
