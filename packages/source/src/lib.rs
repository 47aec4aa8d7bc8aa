#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! County-by-county acquisition from the ARDA church locations layer.
//!
//! The upstream `ArcGIS` `MapServer` only answers spatial-extent queries,
//! so a state is scraped one county envelope at a time:
//!
//! 1. [`query`] turns each county bounding box into a query URL.
//! 2. [`transport`] fetches each URL (with timeout and [`retry`]).
//! 3. [`acquire`] parses each response, converts it to `GeoJSON` with
//!    [`arda_esri`], filters by state, and pauses between requests.
//! 4. [`output`] writes the merged collection to disk.

pub mod acquire;
pub mod output;
pub mod pacing;
pub mod progress;
pub mod query;
pub mod registry;
pub mod retry;
pub mod transport;

use arda_esri::ConversionError;

pub use acquire::{Acquisition, fetch_and_convert_all};
pub use query::{QueryTemplate, build_query_url, build_query_urls};
pub use transport::{HttpTransport, Transport};

/// Errors that can occur while acquiring features.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// `ArcGIS` answered with an error payload instead of features.
    #[error("ArcGIS error{} from {url}: {message}", .code.map(|c| format!(" {c}")).unwrap_or_default())]
    Upstream {
        /// Requested URL.
        url: String,
        /// Error code reported by the server.
        code: Option<i64>,
        /// Error message reported by the server.
        message: String,
    },

    /// Response body is not valid JSON or lacks the `features` array.
    #[error("Failed to parse response from {url}: {message}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A feature could not be converted to `GeoJSON`.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An endpoint definition file is not valid TOML.
    #[error("Invalid endpoint definition: {0}")]
    Definition(#[from] toml::de::Error),
}

impl SourceError {
    /// Whether this error came from the network exchange itself rather
    /// than from the content of a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Upstream { .. }
        )
    }

    /// Whether retrying the same request might succeed: connection
    /// failures, timeouts, HTTP 429 and HTTP 5xx.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
