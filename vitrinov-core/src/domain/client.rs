//! Entrepreneur ("client") domain model
//!
//! Not to be confused with the HTTP client: a client here is a small
//! business tracked by the user.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};

use super::civil_date::{format_api_date, normalize_backend_date, parse_form_date};
use super::result::{Error, Result};
use super::wire::{deserialize_flag, deserialize_id, deserialize_optional_text, deserialize_text};

fn deserialize_backend_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserialize_optional_text(deserializer)?;
    Ok(value.as_deref().and_then(normalize_backend_date))
}

/// An entrepreneur as returned by `/clients/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    /// Phone number, 8 digits
    #[serde(default, rename = "num_cliente", deserialize_with = "deserialize_optional_text")]
    pub phone: Option<String>,
    #[serde(default, rename = "fecha_cobro", deserialize_with = "deserialize_backend_date")]
    pub charge_date: Option<NaiveDate>,
    #[serde(default, rename = "fecha_retiro", deserialize_with = "deserialize_backend_date")]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default, rename = "notificado", deserialize_with = "deserialize_flag")]
    pub notified: bool,
}

/// Entrepreneur name: at least 5 characters after trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientName(String);

impl ClientName {
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.chars().count() < 5 {
            return Err(Error::validation("El nombre debe tener al menos 5 caracteres."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Exactly 8 digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: &str) -> Result<Self> {
        let trimmed = phone.trim();
        if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(
                "El teléfono debe contener exactamente 8 números.",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Empty input means "no phone"
    pub fn optional(phone: &str) -> Result<Option<Self>> {
        if phone.trim().is_empty() {
            Ok(None)
        } else {
            Self::new(phone).map(Some)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Full edit of an entrepreneur
#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub name: ClientName,
    pub phone: Option<PhoneNumber>,
    pub charge_date: Option<NaiveDate>,
    pub pickup_date: Option<NaiveDate>,
    pub notified: bool,
}

impl ClientUpdate {
    pub fn new(name: ClientName) -> Self {
        Self {
            name,
            phone: None,
            charge_date: None,
            pickup_date: None,
            notified: false,
        }
    }

    /// Validate raw form fields in the order the form reports them
    pub fn from_form(
        name: &str,
        phone: &str,
        charge_date: &str,
        pickup_date: &str,
        notified: bool,
    ) -> Result<Self> {
        let name = ClientName::new(name)?;
        let phone = PhoneNumber::optional(phone)?;
        let charge_date = optional_form_date(
            charge_date,
            "La fecha de cobro debe tener formato YYYY-MM-DD.",
        )?;
        let pickup_date = optional_form_date(
            pickup_date,
            "La fecha de retiro debe tener formato YYYY-MM-DD.",
        )?;

        Ok(Self {
            name,
            phone,
            charge_date,
            pickup_date,
            notified,
        })
    }

    /// Body for `PUT /clients/update/:id`
    pub fn to_json(&self) -> JsonValue {
        json!({
            "name": self.name.as_str(),
            "num_cliente": self.phone.as_ref().map(|p| p.as_str()),
            "fecha_cobro": self.charge_date.map(format_api_date),
            "fecha_retiro": self.pickup_date.map(format_api_date),
            "notificado": if self.notified { 1 } else { 0 },
        })
    }
}

fn optional_form_date(value: &str, message: &str) -> Result<Option<NaiveDate>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_form_date(value, message).map(Some)
    }
}

/// Case-insensitive name search; blank term returns everything
pub fn filter_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let term = term.trim().to_lowercase();
    clients
        .iter()
        .filter(|c| term.is_empty() || c.name.to_lowercase().contains(&term))
        .collect()
}
