//! Bank accounts command - accounts per entrepreneur

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{Confirm, Select};
use vitrinov_core::domain::bank_account::{filter_by_holder, BANKS};
use vitrinov_core::domain::{AccountType, Bank, BankAccountUpdate, NewBankAccount};

use super::{get_context, require_ok};
use crate::output;

/// Fields shared by add and update
#[derive(Args)]
pub struct AccountFields {
    /// Account number (digits only)
    #[arg(long)]
    number: String,
    /// Account holder (at least 5 characters)
    #[arg(long)]
    holder: String,
    /// "Cuenta Ahorro" or "Cuenta Corriente"; prompted when omitted
    #[arg(long = "type")]
    account_type: Option<String>,
    /// Bank name as listed by `vt bank-accounts banks`; prompted when omitted
    #[arg(long)]
    bank: Option<String>,
}

#[derive(Subcommand)]
pub enum BankAccountsCommands {
    /// List bank accounts of an entrepreneur
    List {
        /// Entrepreneur ID
        client_id: String,
        /// Filter by account holder
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a bank account
    Add {
        /// Entrepreneur ID
        client_id: String,
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Edit a bank account
    Update {
        /// Bank account ID
        id: String,
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Delete a bank account
    Delete {
        /// Bank account ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// List supported banks
    Banks {
        /// Filter by name
        #[arg(long, short)]
        search: Option<String>,
    },
}

fn pick_account_type(value: Option<String>) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let items: Vec<&str> = AccountType::ALL.iter().map(|t| t.as_str()).collect();
    let index = Select::new()
        .with_prompt("Tipo de cuenta")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(items[index].to_string())
}

fn pick_bank(value: Option<String>) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let index = Select::new()
        .with_prompt("Banco")
        .items(&BANKS)
        .default(0)
        .interact()?;
    Ok(BANKS[index].to_string())
}

fn validate(fields: AccountFields) -> Result<BankAccountUpdate> {
    let account_type = pick_account_type(fields.account_type)?;
    let bank = pick_bank(fields.bank)?;
    Ok(BankAccountUpdate::from_form(
        &fields.number,
        &fields.holder,
        &account_type,
        &bank,
    )?)
}

pub fn run(command: BankAccountsCommands) -> Result<()> {
    match command {
        BankAccountsCommands::List { client_id, search, json } => {
            let ctx = get_context("bank-accounts list")?;
            let (accounts, _) = require_ok(ctx.bank_account_service.list(&client_id))?;
            let shown = filter_by_holder(&accounts, search.as_deref().unwrap_or(""));

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
                return Ok(());
            }

            if shown.is_empty() {
                println!("No hay cuentas bancarias registradas.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Titular", "Banco", "Tipo", "Número"]);
            for account in shown {
                table.add_row(vec![
                    account.id.clone(),
                    account.holder().to_string(),
                    account.name_bank.clone(),
                    account.type_account.clone(),
                    account.num_account.clone(),
                ]);
            }
            println!("{}", table);
        }
        BankAccountsCommands::Add { client_id, fields } => {
            let account = NewBankAccount::new(client_id, validate(fields)?)?;
            let ctx = get_context("bank-accounts add")?;
            let (_, message) = require_ok(ctx.bank_account_service.add(&account))?;
            output::success(&message);
        }
        BankAccountsCommands::Update { id, fields } => {
            let update = validate(fields)?;
            let ctx = get_context("bank-accounts update")?;
            let (_, message) = require_ok(ctx.bank_account_service.update(&id, &update))?;
            output::success(&message);
        }
        BankAccountsCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("¿Eliminar la cuenta bancaria {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("Cancelado.");
                return Ok(());
            }

            let ctx = get_context("bank-accounts delete")?;
            let (_, message) = require_ok(ctx.bank_account_service.delete(&id))?;
            output::success(&message);
        }
        BankAccountsCommands::Banks { search } => {
            let banks = Bank::search(search.as_deref().unwrap_or(""));
            if banks.is_empty() {
                output::warning("Ningún banco coincide con la búsqueda.");
            }
            for bank in banks {
                println!("{}", bank);
            }
        }
    }

    Ok(())
}
