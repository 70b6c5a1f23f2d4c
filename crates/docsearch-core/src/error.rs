//! Error types and handling for docsearch-core operations.
//!
//! All public functions in this crate return [`Result<T>`] with a single,
//! categorized [`Error`] enum. Errors that the repository manager memoizes
//! (library lookup failures, initialization failures) carry enough context
//! to be surfaced directly in a tool-call error payload.

use thiserror::Error;

/// The main error type for docsearch-core operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A library id was requested that is not present in the configured set.
    ///
    /// Carries the full list of known ids so callers can surface a helpful
    /// message without a second lookup.
    #[error("library '{id}' not found (available: {})", available.join(", "))]
    LibraryNotFound {
        /// The id that was requested.
        id: String,
        /// All ids configured for this process.
        available: Vec<String>,
    },

    /// Initialization of a library's repository failed.
    ///
    /// This is memoized by the manager: once a library fails to initialize,
    /// subsequent `get` calls return this error again without retrying.
    #[error("failed to initialize library '{id}': {cause}")]
    LibraryInitializationFailed {
        /// The library id that failed to initialize.
        id: String,
        /// The underlying cause, as a message (errors are cloned for
        /// memoization, so the source chain is flattened to text here).
        cause: String,
    },

    /// `by-id` was called with an id outside the document range.
    #[error("document {id} not found in library '{library_id}'")]
    DocumentNotFound {
        /// The library that was searched.
        library_id: String,
        /// The requested document id.
        id: u32,
    },

    /// A `by-id` request carried a non-integer id string.
    #[error("invalid document id '{0}': expected a non-negative integer")]
    InvalidDocumentId(String),

    /// Network operation failed while fetching an index or document.
    #[error("network error: {0}")]
    Network(String),

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Markdown or index-line parsing failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other unexpected failure, surfaced as-is.
    #[error("{0}")]
    Transient(String),
}

impl Error {
    /// Returns a short machine-stable category name, useful for logging and
    /// metrics without parsing the display message.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::LibraryNotFound { .. } => "library_not_found",
            Self::LibraryInitializationFailed { .. } => "library_init_failed",
            Self::DocumentNotFound { .. } => "document_not_found",
            Self::InvalidDocumentId(_) => "invalid_document_id",
            Self::Network(_) => "network",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Transient(_) => "transient",
        }
    }

    /// Wrap this error as the cause of an initialization failure for `id`.
    #[must_use]
    pub fn into_init_failure(self, id: &str) -> Self {
        Self::LibraryInitializationFailed {
            id: id.to_string(),
            cause: self.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
