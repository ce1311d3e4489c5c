use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// One logged expense. `id` is the creation timestamp in milliseconds and
/// never changes once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl ExpenseRecord {
    pub fn new(id: i64, draft: ExpenseDraft, photo: Option<String>) -> Self {
        Self {
            id,
            date: draft.date,
            category: draft.category,
            amount: draft.amount,
            note: draft.note,
            photo,
        }
    }

    /// Apply edited values, keeping `id` and `photo`.
    pub fn with_draft(&self, draft: ExpenseDraft) -> Self {
        Self {
            id: self.id,
            date: draft.date,
            category: draft.category,
            amount: draft.amount,
            note: draft.note,
            photo: self.photo.clone(),
        }
    }
}

/// Validated form input. Construction is the only place user-entered
/// amounts are parsed, so a record can never carry a non-number.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    pub note: String,
}

impl ExpenseDraft {
    pub fn parse(date: &str, category: &str, amount: &str, note: &str) -> Result<Self> {
        let date = date.trim();
        if date.is_empty() {
            anyhow::bail!("Date is required");
        }
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;

        let category = category.trim();
        if category.is_empty() {
            anyhow::bail!("Category is required");
        }

        let amount = parse_amount(amount)?;
        if amount < Decimal::ZERO {
            anyhow::bail!("Amount must not be negative");
        }

        Ok(Self {
            date: parsed.format("%Y-%m-%d").to_string(),
            category: category.to_string(),
            amount,
            note: note.trim().to_string(),
        })
    }
}

/// Largest accepted amount, 10^15. Keeps sums of many records well inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Parse a typed amount, tolerating currency symbols, thousands separators
/// and surrounding whitespace.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !"$₹€£¥".contains(*c))
        .collect();
    if cleaned.is_empty() {
        anyhow::bail!("Amount is required");
    }
    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Invalid amount '{}'", s.trim()))?;
    if amount.abs() > MAX_AMOUNT {
        anyhow::bail!("Amount '{}' is too large", s.trim());
    }
    Ok(amount)
}

/// Stored amounts may be numbers, strings, or `null` (a `NaN` written by an
/// older build). Anything that does not parse, or is out of range, counts
/// as zero.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let amount = match value {
        serde_json::Value::Number(n) => parse_amount(&n.to_string()).unwrap_or_default(),
        serde_json::Value::String(s) => parse_amount(&s).unwrap_or_default(),
        _ => Decimal::ZERO,
    };
    Ok(amount)
}
