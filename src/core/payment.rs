//! Payment intake business logic.
//!
//! Turns the flat fields of a (simulated) payment form into a validated
//! `ReceiptRecord` and keeps issued receipts in memory so they can be exported
//! later. Nothing is charged and nothing survives a restart.

use crate::{
    entities::{PaymentMethod, PaymentType, ReceiptRecord, TransactionId},
    errors::{Error, Result},
};
use chrono::{DateTime, TimeZone};
use std::{collections::BTreeMap, fmt, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;

/// Display format of receipt timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw payment form fields, as a member typed them
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    /// Member email
    pub member_email: String,
    /// Member full name
    pub member_name: String,
    /// Tithe or offering
    pub payment_type: PaymentType,
    /// Amount without currency symbol
    pub amount: String,
    /// "card", "mobile" or "bank"
    pub payment_method: String,
    /// Card number, used when the method is "card"
    pub card_number: String,
    /// Mobile number, used when the method is "mobile"
    pub mobile_number: String,
    /// Bank reference, used when the method is "bank"
    pub reference: String,
    /// Optional notes
    pub notes: String,
}

impl PaymentForm {
    /// Validates the form and builds an immutable receipt record.
    ///
    /// Only the detail field matching the selected method is kept; the others
    /// are dropped even when filled in.
    pub fn into_record(self, transaction_id: TransactionId, timestamp: String) -> Result<ReceiptRecord> {
        let member_name = required(self.member_name, "Member name")?;
        let member_email = required(self.member_email, "Email")?;
        if !member_email.contains('@') {
            return Err(invalid(format!("Email {member_email:?} is not an email address")));
        }

        let amount = self.amount.trim().to_string();
        match amount.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {}
            _ => return Err(invalid(format!("Amount {amount:?} must be a positive number"))),
        }

        let method = match self.payment_method.trim() {
            "card" => {
                // Same normalization the form applies while typing.
                let entered = required(self.card_number, "Card number")?;
                let card_number: String =
                    format_card_input(&entered).split_whitespace().collect();
                if card_number.len() < 4 {
                    return Err(invalid("Card number must contain at least 4 digits".to_string()));
                }
                PaymentMethod::Card { card_number }
            }
            "mobile" => PaymentMethod::Mobile {
                mobile_number: required(self.mobile_number, "Mobile number")?,
            },
            "bank" => PaymentMethod::Bank {
                reference: required(self.reference, "Bank reference")?,
            },
            other => {
                return Err(Error::UnknownPaymentMethod {
                    method: other.to_string(),
                });
            }
        };

        let notes = Some(self.notes.trim().to_string()).filter(|notes| !notes.is_empty());

        Ok(ReceiptRecord {
            member_email,
            member_name,
            payment_type: self.payment_type,
            amount,
            method,
            notes,
            transaction_id,
            timestamp,
        })
    }
}

fn required(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

const fn invalid(message: String) -> Error {
    Error::InvalidForm { message }
}

/// Formats card number input the way the payment form shows it while typing:
/// digits only, in groups of four, at most 16 digits.
///
/// Input with fewer than four digits is returned as bare digits.
#[must_use]
pub fn format_card_input(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return digits.into_iter().collect();
    }
    digits
        .chunks(4)
        .take(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A receipt together with the member it was issued to
#[derive(Debug)]
struct IssuedReceipt {
    issued_to: String,
    record: Arc<ReceiptRecord>,
}

/// Receipts issued since startup, keyed by transaction id.
///
/// Ids start with their creation time, so iteration order is issue order.
/// Every receipt belongs to the member it was issued to; lookups by anyone
/// else behave as if the receipt did not exist.
#[derive(Debug, Default)]
pub struct ReceiptBook {
    receipts: RwLock<BTreeMap<TransactionId, IssuedReceipt>>,
}

impl ReceiptBook {
    /// Creates an empty book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a form and records the resulting receipt for `member`.
    ///
    /// The transaction id and display timestamp are both derived from `now`.
    /// When the id is already taken the suffix is advanced until a free one
    /// is found, so an issued receipt is never replaced.
    pub async fn issue<Tz: TimeZone>(
        &self,
        form: PaymentForm,
        now: &DateTime<Tz>,
        member: &str,
    ) -> Result<Arc<ReceiptRecord>>
    where
        Tz::Offset: fmt::Display,
    {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let mut receipts = self.receipts.write().await;

        let transaction_id = (0..=u32::from(u16::MAX))
            .map(|offset| TransactionId::generate_with_offset(now, offset))
            .find(|id| !receipts.contains_key(id))
            .ok_or_else(|| Error::TransactionIdsExhausted {
                second: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            })?;

        let record = Arc::new(form.into_record(transaction_id, timestamp)?);
        receipts.insert(
            record.transaction_id.clone(),
            IssuedReceipt {
                issued_to: member.to_string(),
                record: Arc::clone(&record),
            },
        );
        info!(
            "Issued receipt {} ({} {})",
            record.transaction_id,
            record.payment_type.label(),
            record.method.key()
        );
        Ok(record)
    }

    /// Looks up one of `member`'s receipts by transaction id
    pub async fn get(&self, transaction_id: &str, member: &str) -> Result<Arc<ReceiptRecord>> {
        let not_found = || Error::NotFound {
            kind: "Receipt",
            id: transaction_id.to_string(),
        };
        let id = TransactionId::parse(transaction_id).map_err(|_| not_found())?;
        self.receipts
            .read()
            .await
            .get(&id)
            .filter(|issued| issued.issued_to == member)
            .map(|issued| Arc::clone(&issued.record))
            .ok_or_else(not_found)
    }

    /// `member`'s transaction ids containing `partial`, newest first, at most `limit`
    pub async fn search_ids(&self, member: &str, partial: &str, limit: usize) -> Vec<String> {
        let partial = partial.to_uppercase();
        self.receipts
            .read()
            .await
            .iter()
            .rev()
            .filter(|(id, issued)| {
                issued.issued_to == member && id.as_str().to_uppercase().contains(&partial)
            })
            .take(limit)
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Number of receipts issued
    pub async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }

    /// Whether no receipt has been issued yet
    pub async fn is_empty(&self) -> bool {
        self.receipts.read().await.is_empty()
    }
}
