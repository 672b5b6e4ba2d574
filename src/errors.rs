//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Export failures are
//! still caught at the exporter boundary and turned into a single user alert;
//! these variants exist so the cause can be logged before that happens.

use thiserror::Error;

/// Error type shared by all layers of the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Payment form input failed validation
    #[error("Invalid payment form: {message}")]
    InvalidForm {
        /// Which field was rejected and why
        message: String,
    },

    /// Payment method string is not card, mobile or bank
    #[error("Unknown payment method: {method}")]
    UnknownPaymentMethod {
        /// The raw value received from the form
        method: String,
    },

    /// Transaction id is empty or contains characters unsafe in a filename
    #[error("Invalid transaction id: {id:?}")]
    InvalidTransactionId {
        /// The rejected id
        id: String,
    },

    /// Rendering the receipt to a raster image failed
    #[error("Capture error: {message}")]
    Capture {
        /// Cause reported by the capture backend
        message: String,
    },

    /// Building or serializing a PDF or DOCX document failed
    #[error("Document error: {message}")]
    Document {
        /// Cause reported by the document backend
        message: String,
    },

    /// Writing to or printing the auxiliary print view failed
    #[error("Print error: {message}")]
    Print {
        /// Cause reported by the print surface
        message: String,
    },

    /// No auxiliary print view could be opened
    #[error("Print view unavailable")]
    PrintUnavailable,

    /// A receipt or content item lookup found nothing
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of item looked up (e.g. "Receipt", "Announcement")
        kind: &'static str,
        /// The id that was requested
        id: String,
    },

    /// Every id suffix for one second is already taken
    #[error("No transaction ids left for {second}")]
    TransactionIdsExhausted {
        /// The second whose ids ran out
        second: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable missing or invalid
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting into a string buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
