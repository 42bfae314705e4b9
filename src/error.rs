//! Error types for metadata fetching and conversion.
//!
//! This module provides [`FetchError`] for everything that can go wrong while
//! resolving a metadata location, [`MetadataError`] for all crosswalk
//! operations, and the [`Result`] convenience type.

use thiserror::Error;

/// Error raised while resolving or parsing a metadata location.
///
/// A fetch error is fatal for the run: there is no retry and no partial
/// result.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The location does not end in `.json`, `.yml` or `.yaml`.
    #[error("{0} is not a JSON or YAML file")]
    UnsupportedExtension(String),

    /// The location parsed, but its top-level value is not a mapping.
    #[error("{0} does not contain a mapping at the top level")]
    NotAMapping(String),

    /// The location could not be interpreted as a URL or path.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure or non-success HTTP status.
    #[error("Failed to fetch {location}: {source}")]
    Http {
        /// The URL that was requested
        location: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Local file could not be read or written.
    #[error("Failed to access {location}: {source}")]
    Io {
        /// The path that was accessed
        location: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid JSON.
    #[error("Failed to parse JSON from {location}: {source}")]
    Json {
        /// The location the content came from
        location: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Content is not valid YAML.
    #[error("Failed to parse YAML from {location}: {source}")]
    Yaml {
        /// The location the content came from
        location: String,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },
}

/// Error type for all metadata operations.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// A metadata source could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The record cannot be projected into the target schema.
    #[error("Schema mapping error: {0}")]
    SchemaMapping(String),

    /// A date field is not in `YYYY-MM-DD` form.
    #[error("Invalid date in {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Name of the offending field
        field: String,
        /// The value that failed to parse
        value: String,
    },

    /// A rendered document could not be parsed back.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The rendered document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error from the underlying destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MetadataError`].
pub type Result<T> = std::result::Result<T, MetadataError>;
