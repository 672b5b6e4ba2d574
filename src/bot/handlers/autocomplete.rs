//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests transaction ids and payment methods as the user types.

use crate::{bot::BotData, errors::Error};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Payment methods accepted by `/give`
const PAYMENT_METHODS: [&str; 3] = ["card", "mobile", "bank"];

/// Provides autocomplete suggestions for transaction ids.
///
/// Returns up to 25 ids issued to the caller that contain the partial input,
/// newest first.
pub async fn autocomplete_transaction_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let member = ctx.author().id.to_string();
    ctx.data()
        .receipts
        .search_ids(&member, partial.trim(), MAX_SUGGESTIONS)
        .await
}

/// Provides autocomplete suggestions for payment methods.
pub async fn autocomplete_payment_method(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_payment_methods(partial)
}

fn matching_payment_methods(partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    PAYMENT_METHODS
        .iter()
        .filter(|method| method.contains(&partial_lower))
        .map(|&method| method.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_matching_payment_methods() {
        assert_eq!(matching_payment_methods(""), vec!["card", "mobile", "bank"]);
        assert_eq!(matching_payment_methods("CA"), vec!["card"]);
        assert_eq!(matching_payment_methods(" b"), vec!["mobile", "bank"]);
        assert!(matching_payment_methods("cash").is_empty());
    }
}
