//! Transactions command - list, record, edit and delete sales

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use vitrinov_core::domain::civil_date::{civil_today, to_display_date};
use vitrinov_core::domain::{
    group_by_date, initials, Amount, ImageAttachment, NewSale, SaleUpdate, TransactionType,
};

use super::{date_range, get_context, parse_date_arg, require_ok};
use crate::output;

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List sales grouped by day, newest first
    List {
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
        /// Only sales for this entrepreneur
        #[arg(long)]
        client: Option<String>,
        /// Show receipt image URLs
        #[arg(long)]
        images: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a sale
    Add {
        /// Entrepreneur ID
        #[arg(long)]
        client_id: String,
        /// Amount, e.g. 12.50 or 12,5
        amount: String,
        /// Sale date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
        /// Receipt image to attach
        #[arg(long)]
        image: Option<PathBuf>,
        /// Record as an expense instead of income
        #[arg(long)]
        expense: bool,
    },
    /// Edit a sale
    Update {
        /// Transaction ID
        id: String,
        /// New amount
        amount: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Replace the receipt image
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        expense: bool,
    },
    /// Delete a sale
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn transaction_type(expense: bool) -> TransactionType {
    if expense {
        TransactionType::Expense
    } else {
        TransactionType::Income
    }
}

pub fn run(command: TransactionsCommands) -> Result<()> {
    match command {
        TransactionsCommands::List { from, to, client, images, json } => {
            let range = date_range(from.as_deref(), to.as_deref())?;
            let ctx = get_context("transactions list")?;

            let spinner = output::spinner("Cargando transacciones...");
            let result = ctx.transaction_service.filter(&range, client.as_deref());
            output::finish_spinner(spinner);
            let (page, _) = require_ok(result)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }

            println!(
                "{} {} - {}",
                "Ventas".bold(),
                to_display_date(range.start()),
                to_display_date(range.end())
            );
            println!(
                "  Ingresos: {}  Egresos: {}  Saldo: {}",
                format!("${}", page.summary.ingresos).green(),
                format!("${}", page.summary.egresos).red(),
                format!("${}", page.summary.saldo).bold()
            );
            println!();

            if page.transactions.is_empty() {
                println!("No hay transacciones en este rango.");
                return Ok(());
            }

            for group in group_by_date(&page.transactions) {
                println!("{}  {}", group.label.bold(), output::money(group.total()).dimmed());

                let mut table = output::create_table();
                let mut header = vec!["ID", "", "Emprendedor", "Monto", "Notas"];
                if images {
                    header.push("Imagen");
                }
                table.set_header(header);

                for tx in &group.transactions {
                    let amount = format!("{}{}", tx.transaction_type.sign(), output::money(tx.amount));
                    let mut row = vec![
                        tx.id.clone(),
                        initials(&tx.client_name),
                        tx.client_name.clone(),
                        amount,
                        tx.notes.clone(),
                    ];
                    if images {
                        row.push(tx.image_url(ctx.api_client.base_url()).unwrap_or_default());
                    }
                    table.add_row(row);
                }
                println!("{}", table);
            }
        }
        TransactionsCommands::Add { client_id, amount, date, notes, image, expense } => {
            let amount = Amount::parse(&amount)?;
            let date = date.as_deref().map(parse_date_arg).transpose()?.unwrap_or_else(civil_today);
            let mut sale = NewSale::new(client_id, amount, date)?.with_notes(notes);
            sale.transaction_type = transaction_type(expense);
            if let Some(path) = image {
                sale = sale.with_image(ImageAttachment::from_path(&path)?);
            }

            let ctx = get_context("transactions add")?;
            let spinner = output::spinner("Registrando venta...");
            let result = ctx.transaction_service.add(&sale);
            output::finish_spinner(spinner);
            let (_, message) = require_ok(result)?;
            output::success(&message);
        }
        TransactionsCommands::Update { id, amount, notes, image, expense } => {
            let mut update = SaleUpdate::new(Amount::parse(&amount)?).with_notes(notes);
            update.transaction_type = transaction_type(expense);
            if let Some(path) = image {
                update = update.with_image(ImageAttachment::from_path(&path)?);
            }

            let ctx = get_context("transactions update")?;
            let (_, message) = require_ok(ctx.transaction_service.update(&id, &update))?;
            output::success(&message);
        }
        TransactionsCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("¿Eliminar la transacción {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("Cancelado.");
                return Ok(());
            }

            let ctx = get_context("transactions delete")?;
            let (_, message) = require_ok(ctx.transaction_service.delete(&id))?;
            output::success(&message);
        }
    }

    Ok(())
}
