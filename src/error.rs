//! Error types for the Sansay exporter.
//!
//! Errors are split by how far they reach: [`FetchError`] and [`ParseError`]
//! end a collection cycle, while [`FieldError`] and [`ProjectionError`] only
//! ever cost the single field that raised them.

use thiserror::Error;

/// Failure to retrieve the status document from the switch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Target could not be turned into a URL
    #[error("invalid target URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request could not be constructed
    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    /// Connection, TLS or timeout failure
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Failure to deserialize the XML status document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Not well-formed XML
    #[error("malformed XML document: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// Well-formed, but not the expected nesting
    #[error("malformed XML document: {0}")]
    Structure(#[from] quick_xml::DeError),

    /// Root element is not `<mysqldump>`
    #[error("unexpected root element <{0}>, expected <mysqldump>")]
    UnexpectedRoot(String),

    /// Body holds no element at all
    #[error("empty XML document, expected <mysqldump>")]
    MissingRoot,
}

/// Failure to access a record attribute by its wire name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("not a field name: {0}")]
    NotFound(String),

    #[error("cannot set field {0}")]
    NotSettable(String),

    #[error("{0} is not a string field")]
    WrongType(String),
}

/// Failure to turn a field value into a sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("field {field} has non-numeric value {value:?}: {source}")]
    InvalidNumber {
        field: String,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("field {field} value {value:?} is out of range")]
    OutOfRange { field: String, value: String },
}

/// Main error type for Sansay exporter operations.
#[derive(Debug, Error)]
pub enum SansayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Metrics error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// HTTP server error
    #[error("HTTP server error: {0}")]
    Server(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Sansay exporter operations.
pub type Result<T> = std::result::Result<T, SansayError>;
