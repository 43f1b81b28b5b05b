//! Unified error types for the catalog.
//!
//! Every fallible operation in the crate returns [`Result`]. The web layer maps
//! these variants onto HTTP status codes in `web::error`.

use thiserror::Error;

/// All errors produced by the catalog, its stores and the admin surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// The live store rejected or failed a query.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No product with this id exists in the active store.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// A price was negative or not a finite number.
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// A product write failed validation.
    #[error("Invalid product: {message}")]
    InvalidProduct {
        /// Which field was rejected and why
        message: String,
    },

    /// Page size was zero or otherwise unusable.
    #[error("Invalid pagination: {message}")]
    InvalidPagination {
        /// Why the page request was rejected
        message: String,
    },

    /// The requested sort order is not one of the supported values.
    #[error("Unknown sort order: {value}")]
    InvalidSort {
        /// The sort string as received
        value: String,
    },

    /// A static snapshot location could not be read.
    #[error("Data source {location} unavailable: {message}")]
    DataSource {
        /// Path or URL of the snapshot
        location: String,
        /// Failure detail (I/O error, HTTP status text, ...)
        message: String,
    },

    /// Missing, expired or wrong admin credentials.
    #[error("Authentication required")]
    Unauthorized,

    /// The authenticated identity is not an admin.
    #[error("{email} is not an administrator")]
    Forbidden {
        /// Identity that was denied
        email: String,
    },

    /// An access key could not be hashed or checked.
    #[error("Credential hashing error: {0}")]
    Credential(#[from] bcrypt::BcryptError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or request body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote snapshot fetch failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
