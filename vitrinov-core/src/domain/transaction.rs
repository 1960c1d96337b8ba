//! Sales transaction domain model

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::amount::{decimal_from_json, deserialize_lenient_decimal, Amount};
use super::civil_date::{format_api_date, group_label};
use super::result::{Error, Result};
use super::wire::{deserialize_id, deserialize_optional_text, deserialize_text};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sign shown in front of the amount
    pub fn sign(&self) -> &'static str {
        match self {
            Self::Income => "+",
            Self::Expense => "-",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown types from the server are treated as income (the only kind
/// the app ever records)
fn deserialize_transaction_type<'de, D>(deserializer: D) -> std::result::Result<TransactionType, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(|v| v.as_str()).map(str::trim) {
        Some(t) if t.eq_ignore_ascii_case("expense") => TransactionType::Expense,
        _ => TransactionType::Income,
    })
}

/// A sale as returned by `/transactions/filter`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub client_name: String,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_transaction_type")]
    pub transaction_type: TransactionType,
    /// Civil date key, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "deserialize_text")]
    pub transaction_date: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub notes: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub image_path: Option<String>,
}

impl Transaction {
    /// Attached image resolved against the API host
    pub fn image_url(&self, base_url: &str) -> Option<String> {
        resolve_image_url(base_url, self.image_path.as_deref()?)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d").ok()
    }
}

/// Resolve a stored image path against the API host.
///
/// Absolute URLs are kept; relative paths live under `/static/uploads/`.
pub fn resolve_image_url(base_url: &str, image_path: &str) -> Option<String> {
    let path = image_path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    let base = base_url.trim_end_matches('/');
    let relative = path.trim_start_matches('/');
    if relative.starts_with("uploads/") {
        Some(format!("{}/static/{}", base, relative))
    } else {
        Some(format!("{}/static/uploads/{}", base, relative))
    }
}

/// Totals returned alongside a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub ingresos: String,
    pub egresos: String,
    pub saldo: String,
}

impl Default for TransactionSummary {
    fn default() -> Self {
        Self {
            ingresos: "0".to_string(),
            egresos: "0".to_string(),
            saldo: "0".to_string(),
        }
    }
}

impl TransactionSummary {
    /// Read the `summary` object; missing fields stay `"0"`
    pub fn from_json(value: Option<&JsonValue>) -> Self {
        let field = |key: &str| -> String {
            match value.and_then(|v| v.get(key)) {
                Some(JsonValue::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                _ => "0".to_string(),
            }
        };
        Self {
            ingresos: field("ingresos"),
            egresos: field("egresos"),
            saldo: field("saldo"),
        }
    }

    /// Sales total as a decimal
    pub fn income(&self) -> Decimal {
        decimal_from_json(&JsonValue::String(self.ingresos.clone()))
    }
}

/// Result of `/transactions/filter`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPage {
    pub summary: TransactionSummary,
    pub transactions: Vec<Transaction>,
}

impl TransactionPage {
    /// Build from a response body. Malformed rows are skipped.
    pub fn from_json(body: &JsonValue) -> Self {
        let transactions = body
            .get("transactions")
            .and_then(|t| t.as_array())
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| serde_json::from_value(row.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            summary: TransactionSummary::from_json(body.get("summary")),
            transactions,
        }
    }
}

/// Image picked for a sale, uploaded as a multipart file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::validation("No fue posible seleccionar la imagen."));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("sale_{}.jpg", Utc::now().timestamp_millis()));

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let mime_type = match extension.as_deref() {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("heic") => "image/heic",
            _ => "image/jpeg",
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type: mime_type.to_string(),
        })
    }
}

/// A new sale, validated and ready to send
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: String,
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub notes: String,
    pub transaction_date: NaiveDate,
    pub image: Option<ImageAttachment>,
}

impl NewSale {
    pub fn new(client_id: impl Into<String>, amount: Amount, transaction_date: NaiveDate) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(Error::validation("Selecciona un emprendedor."));
        }
        Ok(Self {
            client_id: client_id.trim().to_string(),
            transaction_type: TransactionType::Income,
            amount,
            notes: String::new(),
            transaction_date,
            image: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn date_param(&self) -> String {
        format_api_date(self.transaction_date)
    }
}

/// Changes to an existing sale
#[derive(Debug, Clone)]
pub struct SaleUpdate {
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub notes: String,
    pub image: Option<ImageAttachment>,
}

impl SaleUpdate {
    pub fn new(amount: Amount) -> Self {
        Self {
            transaction_type: TransactionType::Income,
            amount,
            notes: String::new(),
            image: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Transactions sharing one civil date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    /// Raw date key (`YYYY-MM-DD`)
    pub date: String,
    /// `"3 de mayo de 2024"`
    pub label: String,
    pub transactions: Vec<Transaction>,
}

impl DateGroup {
    pub fn total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

/// Partition by date key, most recent first. Order within a group is kept.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<DateGroup> {
    let mut grouped: BTreeMap<&str, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        grouped
            .entry(tx.transaction_date.as_str())
            .or_default()
            .push(tx.clone());
    }

    grouped
        .into_iter()
        .rev()
        .map(|(date, transactions)| DateGroup {
            date: date.to_string(),
            label: group_label(date),
            transactions,
        })
        .collect()
}

/// Avatar initials: first letter of up to two words, uppercased
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "CL".to_string()
    } else {
        letters
    }
}
