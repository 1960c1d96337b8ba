//! Vitrinov CLI - sales tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, bank_accounts, clients, config, logs, reports, transactions};

/// Vitrinov - sales tracking for entrepreneurs
#[derive(Parser)]
#[command(name = "vt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "VITRINOV_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "VITRINOV_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sales
    Transactions {
        #[command(subcommand)]
        command: transactions::TransactionsCommands,
    },

    /// Entrepreneurs
    Clients {
        #[command(subcommand)]
        command: clients::ClientsCommands,
    },

    /// Bank accounts of entrepreneurs
    BankAccounts {
        #[command(subcommand)]
        command: bank_accounts::BankAccountsCommands,
    },

    /// Reports
    Reports {
        #[command(subcommand)]
        command: reports::ReportsCommands,
    },

    /// View and manage the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password, json } => auth::run_login(email, password, json),
        Commands::Register { name, email, password } => auth::run_register(name, email, password),
        Commands::Logout => auth::run_logout(),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Transactions { command } => transactions::run(command),
        Commands::Clients { command } => clients::run(command),
        Commands::BankAccounts { command } => bank_accounts::run(command),
        Commands::Reports { command } => reports::run(command),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
