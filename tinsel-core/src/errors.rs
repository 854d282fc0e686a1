// tinsel-core/src/errors.rs
use thiserror::Error;

/// Errors that can occur during a chat request/response cycle.
///
/// The transport makes no attempt to recover: callers get exactly one of
/// these, or a reply. An empty `choices` array is not an error; it surfaces
/// as an absent reply instead.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never produced an HTTP response.
    #[error("Network Error: {0}")]
    Network(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API Error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded as a chat response.
    #[error("Decode Error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors reported by the toy record backends.
///
/// Distinct from "no data": an absent record is an `Ok(None)` at the store
/// interface, never an error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding the record collection failed.
    #[error("Serialization Error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The embedded database rejected an operation.
    #[error("Database Error: {0}")]
    Database(#[from] rusqlite::Error),
}
