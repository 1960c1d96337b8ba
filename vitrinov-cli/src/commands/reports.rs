//! Reports command - spreadsheet export, transfer notifications, classification

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use vitrinov_core::domain::civil_date::{parse_api_date, to_display_date};
use vitrinov_core::domain::report::{
    filter_classification, totals_by_type, write_classification_csv, ALL_TYPES,
};

use super::{date_range, get_context, require_ok};
use crate::output;

#[derive(Subcommand)]
pub enum ReportsCommands {
    /// Download the sales spreadsheet (.xlsx)
    Export {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Only sales for this entrepreneur
        #[arg(long, default_value = "")]
        client: String,
        /// Copy the file here as well
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pending transfer notifications
    Notifications {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Transactions by payment type
    Classification {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Efectivo, Transferencia, Tarjeta, Sin categorizar or Todas
        #[arg(long = "type", default_value = ALL_TYPES)]
        tipo: String,
        /// Search business, type or notes
        #[arg(long, short)]
        search: Option<String>,
        /// Write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ReportsCommands) -> Result<()> {
    match command {
        ReportsCommands::Export { from, to, client, output: copy_to, json } => {
            let range = date_range(from.as_deref(), to.as_deref())?;
            let ctx = get_context("reports export")?;

            let spinner = output::spinner("Generando reporte...");
            let result = ctx.report_service.export(&range, &client);
            output::finish_spinner(spinner);
            let (report, message) = require_ok(result)?;

            if let Some(dest) = &copy_to {
                std::fs::copy(&report.path, dest)
                    .with_context(|| format!("Failed to copy report to {}", dest.display()))?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            output::success(&message);
            println!("  Archivo: {}", report.path.display());
            println!("  Tamaño: {}", output::format_size(report.size_bytes));
            if let Some(dest) = copy_to {
                println!("  Copia: {}", dest.display());
            }
        }
        ReportsCommands::Notifications { from, to, json } => {
            let range = date_range(from.as_deref(), to.as_deref())?;
            let ctx = get_context("reports notifications")?;
            let (report, _) = require_ok(ctx.report_service.notifications(&range))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.cantidad > 0 {
                println!("{} {}", report.cantidad.to_string().bold(), "transferencias pendientes".yellow());
            } else {
                println!("Sin transferencias pendientes.");
            }
            if !report.mensaje.is_empty() {
                output::info(&report.mensaje);
            }
        }
        ReportsCommands::Classification { from, to, tipo, search, csv, json } => {
            let range = date_range(from.as_deref(), to.as_deref())?;
            let ctx = get_context("reports classification")?;
            let spinner = output::spinner("Cargando reporte...");
            let result = ctx.report_service.classification(&range);
            output::finish_spinner(spinner);
            let (rows, _) = require_ok(result)?;

            let shown = filter_classification(&rows, &tipo, search.as_deref().unwrap_or(""));

            if let Some(path) = &csv {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_classification_csv(&shown, file)?;
                output::success(&format!("{} filas escritas en {}", shown.len(), path.display()));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
                return Ok(());
            }
            if csv.is_some() {
                return Ok(());
            }

            if shown.is_empty() {
                println!("No hay transacciones para los filtros seleccionados.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Fecha", "Tipo", "Emprendimiento", "Monto", "Notas"]);
            for row in &shown {
                let fecha = parse_api_date(&row.fecha)
                    .map(to_display_date)
                    .unwrap_or_else(|| row.fecha.clone());
                table.add_row(vec![
                    fecha,
                    row.tipo.clone(),
                    row.emprendimiento.clone(),
                    output::money(row.monto),
                    row.notas.clone(),
                ]);
            }
            println!("{}", table);

            println!("{}", "Totales".bold());
            for (tipo, total) in totals_by_type(&shown) {
                println!("  {:<16} {}", tipo, output::money(total));
            }
        }
    }

    Ok(())
}
