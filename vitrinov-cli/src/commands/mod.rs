//! CLI command implementations

pub mod auth;
pub mod bank_accounts;
pub mod clients;
pub mod config;
pub mod logs;
pub mod reports;
pub mod transactions;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use vitrinov_core::domain::civil_date::{civil_today, parse_api_date};
use vitrinov_core::{ApiResult, DateRange, EntryPoint, VitrinovContext};

/// Get the vitrinov directory from environment or default
pub fn get_vitrinov_dir() -> Result<PathBuf> {
    vitrinov_core::config::data_dir()
}

/// Get or create vitrinov context, recording which command is running
pub fn get_context(command: &str) -> Result<VitrinovContext> {
    let vitrinov_dir = get_vitrinov_dir()?;

    std::fs::create_dir_all(&vitrinov_dir)
        .with_context(|| format!("Failed to create vitrinov directory: {:?}", vitrinov_dir))?;

    let ctx = VitrinovContext::new(&vitrinov_dir, EntryPoint::Cli)
        .context("Failed to initialize vitrinov context")?;

    // Logging should never break the app
    if let Some(logger) = &ctx.logger {
        let _ = logger.log_command(command);
    }
    Ok(ctx)
}

/// Unwrap an API result, turning expiry and failures into errors
///
/// An expired session prints the re-login hint; the caller exits non-zero.
pub fn require_ok<T>(result: ApiResult<T>) -> Result<(T, String)> {
    match result {
        ApiResult::Success { data, message } => Ok((data, message)),
        ApiResult::Expired { message } => {
            eprintln!("{}", "Ejecuta 'vt login' para continuar.".dimmed());
            bail!("{}", message)
        }
        ApiResult::Failure { message } => bail!("{}", message),
    }
}

/// Parse a CLI date (`YYYY-MM-DD` or `DD/MM/YYYY`)
pub fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    match parse_api_date(value) {
        Some(date) => Ok(date),
        None => bail!("Fecha inválida: {} (usa YYYY-MM-DD)", value),
    }
}

/// Range from optional bounds. Neither bound means the civil today;
/// `--from` alone runs through today.
pub fn date_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let today = civil_today();
    let start = from.map(parse_date_arg).transpose()?.unwrap_or(today);
    let range = DateRange::day(start);
    Ok(match to.map(parse_date_arg).transpose()? {
        Some(end) if end < start => bail!("La fecha final no puede ser anterior a la inicial."),
        Some(end) => range.with_end(end),
        None if from.is_some() => range.with_end(today.max(start)),
        None => range,
    })
}
