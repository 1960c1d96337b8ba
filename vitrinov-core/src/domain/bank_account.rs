//! Bank accounts attached to an entrepreneur

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::result::{Error, Result};
use super::wire::{deserialize_id, deserialize_optional_text, deserialize_text};

/// Institutions accepted by the backend
pub const BANKS: [&str; 19] = [
    "Banco Agricola",
    "Banco Davivienda",
    "Banco Industrial",
    "Banco de Fomento Agropecuario",
    "Banco Azul",
    "Banco Atlantida",
    "Banco Hipotecario",
    "Banco America Central",
    "Banco Izalqueño",
    "Banco Cuscatlan",
    "Fedecredito",
    "Banco Promerica",
    "Mi Banco",
    "Pay",
    "Bancovi R.L",
    "ABANK",
    "Comedica",
    "Credicomer",
    "Multimoney",
];

/// An account as returned by `/bankaccount/list/:client_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub id_cliente: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name_bank: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name_client: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub num_account: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub type_account: String,
}

impl BankAccount {
    pub fn holder(&self) -> &str {
        self.name_client.trim()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountType {
    #[default]
    Savings,
    Checking,
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Savings, AccountType::Checking];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "Cuenta Ahorro",
            Self::Checking => "Cuenta Corriente",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| Error::validation("Selecciona un tipo de cuenta válido."))
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of [`BANKS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bank(&'static str);

impl Bank {
    /// Exact match against the known institutions
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        BANKS
            .iter()
            .find(|b| **b == value)
            .map(|b| Self(b))
            .ok_or_else(|| Error::validation("Selecciona un banco válido."))
    }

    /// Case-insensitive substring search; blank term lists every bank
    pub fn search(term: &str) -> Vec<Bank> {
        let term = term.trim().to_lowercase();
        BANKS
            .iter()
            .filter(|b| term.is_empty() || b.to_lowercase().contains(&term))
            .map(|b| Self(b))
            .collect()
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Digits only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation("Número de cuenta: solo números."));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account holder, at least 5 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderName(String);

impl HolderName {
    pub fn new(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.chars().count() < 5 {
            return Err(Error::validation(
                "Titular de cuenta debe tener al menos 5 caracteres.",
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated account fields shared by add and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountUpdate {
    pub number: AccountNumber,
    pub holder: HolderName,
    pub account_type: AccountType,
    pub bank: Bank,
}

impl BankAccountUpdate {
    /// Checks run in form order: number, holder, type, bank
    pub fn from_form(number: &str, holder: &str, account_type: &str, bank: &str) -> Result<Self> {
        Ok(Self {
            number: AccountNumber::new(number)?,
            holder: HolderName::new(holder)?,
            account_type: AccountType::parse(account_type)?,
            bank: Bank::parse(bank)?,
        })
    }

    /// Body for `PUT /bankaccount/update/:id`
    pub fn to_json(&self) -> JsonValue {
        json!({
            "num_account": self.number.as_str(),
            "name_client": self.holder.as_str(),
            "type_account": self.account_type.as_str(),
            "name_bank": self.bank.name(),
        })
    }
}

/// A new account for a given entrepreneur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBankAccount {
    pub client_id: String,
    pub fields: BankAccountUpdate,
}

impl NewBankAccount {
    pub fn new(client_id: impl Into<String>, fields: BankAccountUpdate) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(Error::validation("Selecciona un emprendedor."));
        }
        Ok(Self {
            client_id: client_id.trim().to_string(),
            fields,
        })
    }

    /// Body for `POST /bankaccount/add`
    pub fn to_json(&self) -> JsonValue {
        json!({
            "id_cliente": self.client_id,
            "name_bank": self.fields.bank.name(),
            "name_client": self.fields.holder.as_str(),
            "num_account": self.fields.number.as_str(),
            "type_account": self.fields.account_type.as_str(),
        })
    }
}

/// Case-insensitive search on the holder name
pub fn filter_by_holder<'a>(accounts: &'a [BankAccount], term: &str) -> Vec<&'a BankAccount> {
    let term = term.trim().to_lowercase();
    accounts
        .iter()
        .filter(|a| term.is_empty() || a.holder().to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_validation_order() {
        let err = BankAccountUpdate::from_form("12a", "x", "nope", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Número de cuenta: solo números.");

        let err = BankAccountUpdate::from_form("123", "Ana", "nope", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Titular de cuenta debe tener al menos 5 caracteres.");

        let err = BankAccountUpdate::from_form("123", "Ana Pérez", "nope", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Selecciona un tipo de cuenta válido.");

        let err =
            BankAccountUpdate::from_form("123", "Ana Pérez", "Cuenta Ahorro", "Banco X").unwrap_err();
        assert_eq!(err.to_string(), "Selecciona un banco válido.");
    }

    #[test]
    fn test_empty_account_number_rejected() {
        assert!(AccountNumber::new("   ").is_err());
    }

    #[test]
    fn test_add_body() {
        let fields =
            BankAccountUpdate::from_form(" 0012345 ", " Ana Pérez ", "Cuenta Corriente", "ABANK")
                .unwrap();
        let account = NewBankAccount::new("4", fields).unwrap();
        assert_eq!(
            account.to_json(),
            json!({
                "id_cliente": "4",
                "name_bank": "ABANK",
                "name_client": "Ana Pérez",
                "num_account": "0012345",
                "type_account": "Cuenta Corriente"
            })
        );
    }

    #[test]
    fn test_bank_search() {
        assert_eq!(Bank::search("").len(), BANKS.len());
        let found: Vec<_> = Bank::search("cusca").iter().map(|b| b.name()).collect();
        assert_eq!(found, vec!["Banco Cuscatlan"]);
        assert!(Bank::search("zzz").is_empty());
    }

    #[test]
    fn test_filter_by_holder() {
        let accounts: Vec<BankAccount> = serde_json::from_value(json!([
            {"id": 1, "id_cliente": 4, "name_client": " Ana Pérez", "num_account": "1"},
            {"id": 2, "id_cliente": 4, "name_client": "Luis Gómez", "num_account": 2}
        ]))
        .unwrap();

        assert_eq!(accounts[1].num_account, "2");
        let found = filter_by_holder(&accounts, "ana");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].holder(), "Ana Pérez");
    }
}
