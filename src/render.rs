//! Pure row formatting for the transaction list.
//!
//! No state, no I/O: the same transaction always renders to the same row.

use chrono::{TimeZone, Utc};

use crate::api::Transaction;

/// Formatted fields for one list row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub title: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    /// Comma-joined tag line; `None` when the transaction has no tags
    pub tags: Option<String>,
}

/// Map one transaction to its formatted row.
pub fn render_row(tx: &Transaction) -> RenderedRow {
    RenderedRow {
        title: tx.title.clone(),
        description: tx.description.clone(),
        amount: format_amount(tx.amount, &tx.currency),
        date: format_date(tx.date),
        tags: if tx.tags.is_empty() {
            None
        } else {
            Some(tx.tags.join(", "))
        },
    }
}

/// Symbol-prefixed, thousands-grouped rendering for recognized lowercase
/// ISO codes; anything else falls back to the raw number.
pub fn format_amount(amount: f64, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format_currency(amount, symbol),
        None => format!("{}", amount),
    }
}

/// Calendar date (`M/D/YYYY`, UTC) from epoch seconds. Out-of-range
/// timestamps render as the epoch itself.
pub fn format_date(epoch_secs: i64) -> String {
    let date = Utc.timestamp_opt(epoch_secs, 0).single().unwrap_or_default();
    date.format("%-m/%-d/%Y").to_string()
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "usd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        _ => None,
    }
}

fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            id: "1".to_string(),
            amount: 1234.5,
            currency: "usd".to_string(),
            date: 1700000000,
            title: "Rent".to_string(),
            description: "November".to_string(),
            tags: vec!["housing".to_string(), "recurring".to_string()],
        }
    }

    #[test]
    fn test_usd_is_localized() {
        assert_eq!(format_amount(1234.5, "usd"), "$1,234.50");
        assert_eq!(format_amount(0.99, "usd"), "$0.99");
        assert_eq!(format_amount(-5.0, "usd"), "-$5.00");
        assert_eq!(format_amount(1000000.0, "usd"), "$1,000,000.00");
    }

    #[test]
    fn test_unrecognized_currency_is_raw() {
        assert_eq!(format_amount(12.5, "xyz"), "12.5");
        assert_eq!(format_amount(12.0, "xyz"), "12");
    }

    #[test]
    fn test_date_from_epoch_seconds() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_date(1700000000), "11/14/2023");
        assert_eq!(format_date(0), "1/1/1970");
    }

    #[test]
    fn test_tags_joined_only_when_present() {
        let row = render_row(&sample());
        assert_eq!(row.tags.as_deref(), Some("housing, recurring"));

        let mut untagged = sample();
        untagged.tags.clear();
        assert_eq!(render_row(&untagged).tags, None);
    }

    #[test]
    fn test_render_is_pure() {
        let tx = sample();
        assert_eq!(render_row(&tx), render_row(&tx));
        assert_eq!(tx, sample());
    }
}
