//! Receipt entity - One completed (simulated) payment.
//!
//! A `ReceiptRecord` is built once by payment intake and only ever read afterwards.
//! The payment method is a sum type, so a record carries exactly the one detail
//! field that belongs to its method.

use crate::errors::{Error, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a gift; only affects the display label
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, poise::ChoiceParameter,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Tithe
    #[default]
    Tithe,
    /// Offering
    Offering,
}

impl PaymentType {
    /// Display label used by every receipt rendering
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tithe => "Tithe",
            Self::Offering => "Offering",
        }
    }
}

/// How the payment was made, with the one detail relevant to that method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card; only the last four characters are ever shown
    Card {
        /// Full card number as entered (digits only)
        card_number: String,
    },
    /// Mobile money transfer
    Mobile {
        /// Phone number the payment came from
        mobile_number: String,
    },
    /// Bank transfer
    Bank {
        /// Bank reference for the transfer
        reference: String,
    },
}

impl PaymentMethod {
    /// Raw method key as it appears in forms ("card", "mobile", "bank")
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::Mobile { .. } => "mobile",
            Self::Bank { .. } => "bank",
        }
    }

    /// Human readable method label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Card { .. } => "Credit/Debit Card",
            Self::Mobile { .. } => "Mobile Money",
            Self::Bank { .. } => "Bank Transfer",
        }
    }

    /// The method-specific detail row as `(label, value)`, card numbers masked.
    #[must_use]
    pub fn detail(&self) -> (&'static str, String) {
        match self {
            Self::Card { card_number } => ("Card:", mask_card_number(card_number)),
            Self::Mobile { mobile_number } => ("Mobile:", mobile_number.clone()),
            Self::Bank { reference } => ("Reference:", reference.clone()),
        }
    }
}

/// Maps a raw payment method key to its display label.
///
/// Unknown keys are returned unchanged.
#[must_use]
pub fn display_label(method: &str) -> &str {
    match method {
        "card" => "Credit/Debit Card",
        "mobile" => "Mobile Money",
        "bank" => "Bank Transfer",
        other => other,
    }
}

/// Masks a card number down to its last four characters.
///
/// Returns an empty string for an empty card number.
#[must_use]
pub fn mask_card_number(card_number: &str) -> String {
    if card_number.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = card_number.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {tail}")
}

/// Opaque transaction identifier, safe to use as a filename stem
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    /// Validates a transaction id: non-empty ASCII alphanumerics, `-` and `_` only.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if safe {
            Ok(Self(id))
        } else {
            Err(Error::InvalidTransactionId { id })
        }
    }

    /// Generates a new id of the form `TX-<yyyymmddHHMMSS>-<4 hex digits>`.
    ///
    /// The suffix comes from the sub-second part of `now`, which keeps ids
    /// generated within the same second apart.
    #[must_use]
    pub fn generate<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self::generate_with_offset(now, 0)
    }

    /// Like [`TransactionId::generate`], with the hex suffix advanced by
    /// `offset` (mod 0x10000). Used to step past ids already taken.
    #[must_use]
    pub fn generate_with_offset<Tz: TimeZone>(now: &DateTime<Tz>, offset: u32) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let suffix = now.timestamp_subsec_nanos().wrapping_add(offset) % 0x1_0000;
        Self(format!("TX-{}-{suffix:04x}", now.format("%Y%m%d%H%M%S")))
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TransactionId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A completed payment, the sole input of every receipt export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Payer's email address
    pub member_email: String,
    /// Payer's full name
    pub member_name: String,
    /// Tithe or offering
    pub payment_type: PaymentType,
    /// Amount as entered, without currency symbol (e.g. "50.00")
    pub amount: String,
    /// Payment method and its detail
    #[serde(flatten)]
    pub method: PaymentMethod,
    /// Free text notes, shown verbatim when non-empty
    pub notes: Option<String>,
    /// Identifier used for export filenames
    pub transaction_id: TransactionId,
    /// Human readable creation time; display only
    pub timestamp: String,
}

impl ReceiptRecord {
    /// Notes, or `None` when absent or empty
    #[must_use]
    pub fn visible_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.is_empty())
    }

    /// File name for an export of this receipt with the given extension
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("Payment_Receipt_{}.{extension}", self.transaction_id)
    }
}
