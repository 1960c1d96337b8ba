//! Core domain entities
//!
//! Entities, validated inputs and pure helpers. No I/O happens here
//! apart from checking that a picked image file exists.

pub mod amount;
pub mod bank_account;
pub mod civil_date;
pub mod client;
mod credentials;
pub mod report;
pub mod result;
mod session;
pub mod transaction;
mod user;
pub mod wire;

pub use amount::{format_money, Amount};
pub use bank_account::{
    AccountNumber, AccountType, Bank, BankAccount, BankAccountUpdate, HolderName, NewBankAccount,
};
pub use civil_date::DateRange;
pub use client::{Client, ClientName, ClientUpdate, PhoneNumber};
pub use credentials::{Credentials, Registration};
pub use report::{ClassificationRow, ExportedReport, NotificationReport};
pub use session::Session;
pub use transaction::{
    group_by_date, initials, DateGroup, ImageAttachment, NewSale, SaleUpdate, Transaction,
    TransactionPage, TransactionSummary, TransactionType,
};
pub use user::{user_id, User};
