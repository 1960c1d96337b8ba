//! Clients command - manage entrepreneurs

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use vitrinov_core::domain::civil_date::to_display_date;
use vitrinov_core::domain::client::filter_clients;
use vitrinov_core::domain::{initials, ClientName, ClientUpdate};

use super::{get_context, require_ok};
use crate::output;

#[derive(Subcommand)]
pub enum ClientsCommands {
    /// List entrepreneurs
    List {
        /// Filter by name
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an entrepreneur
    Add {
        /// Business name (at least 5 characters)
        name: Option<String>,
    },
    /// Edit an entrepreneur
    Update {
        /// Entrepreneur ID
        id: String,
        #[arg(long)]
        name: String,
        /// Phone, 8 digits
        #[arg(long, default_value = "")]
        phone: String,
        /// Charge date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        charge_date: String,
        /// Pickup date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        pickup_date: String,
        /// Mark as notified
        #[arg(long)]
        notified: bool,
    },
    /// Delete an entrepreneur
    Delete {
        /// Entrepreneur ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

pub fn run(command: ClientsCommands) -> Result<()> {
    match command {
        ClientsCommands::List { search, json } => {
            let ctx = get_context("clients list")?;
            let spinner = output::spinner("Cargando emprendedores...");
            let result = ctx.client_service.list();
            output::finish_spinner(spinner);
            let (clients, _) = require_ok(result)?;
            let shown = filter_clients(&clients, search.as_deref().unwrap_or(""));

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
                return Ok(());
            }

            if shown.is_empty() {
                println!("No se encontraron emprendedores.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "", "Nombre", "Teléfono", "Cobro", "Retiro", "Notificado"]);
            for client in &shown {
                let notified = if client.notified {
                    "sí".green().to_string()
                } else {
                    "no".dimmed().to_string()
                };
                table.add_row(vec![
                    client.id.clone(),
                    initials(&client.name),
                    client.name.clone(),
                    client.phone.clone().unwrap_or_default(),
                    client.charge_date.map(to_display_date).unwrap_or_default(),
                    client.pickup_date.map(to_display_date).unwrap_or_default(),
                    notified,
                ]);
            }
            println!("{}", table);
            println!("{} emprendedores", shown.len());
        }
        ClientsCommands::Add { name } => {
            let name = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Nombre del emprendimiento").interact_text()?,
            };
            let name = ClientName::new(&name)?;

            let ctx = get_context("clients add")?;
            let (_, message) = require_ok(ctx.client_service.add(&name))?;
            output::success(&message);
        }
        ClientsCommands::Update {
            id,
            name,
            phone,
            charge_date,
            pickup_date,
            notified,
        } => {
            let update = ClientUpdate::from_form(&name, &phone, &charge_date, &pickup_date, notified)?;
            let ctx = get_context("clients update")?;
            let (_, message) = require_ok(ctx.client_service.update(&id, &update))?;
            output::success(&message);
        }
        ClientsCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("¿Eliminar el emprendedor {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("Cancelado.");
                return Ok(());
            }

            let ctx = get_context("clients delete")?;
            let (_, message) = require_ok(ctx.client_service.delete(&id))?;
            output::success(&message);
        }
    }

    Ok(())
}
