//! Config command - show and change client settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use vitrinov_core::config::Config;

use super::get_vitrinov_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Point the client at another API server
    SetUrl {
        /// Base URL, e.g. https://apivitrinovapp.clobitech.com
        url: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let vitrinov_dir = get_vitrinov_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&vitrinov_dir)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "dataDir": config.data_dir,
                        "apiBaseUrl": config.api_base_url,
                        "tokenCheckPath": config.token_check_path,
                        "requestTimeoutSecs": config.request_timeout.as_secs(),
                        "searchDebounceMs": config.search_debounce.as_millis() as u64,
                        "cacheDir": config.cache_dir,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Configuración".bold());
            println!("  Directorio: {}", config.data_dir.display());
            println!("  Servidor: {}", config.api_base_url);
            println!("  Verificación de token: {}", config.token_check_path);
            println!("  Tiempo de espera: {}s", config.request_timeout.as_secs());
            println!("  Espera de búsqueda: {}ms", config.search_debounce.as_millis());
            println!("  Reportes: {}", config.cache_dir.display());
        }
        ConfigCommands::SetUrl { url } => {
            std::fs::create_dir_all(&vitrinov_dir)?;
            let mut config = Config::load_file(&vitrinov_dir)?;
            config.set_api_base_url(&url)?;
            config.save()?;
            output::success(&format!("Servidor configurado: {}", config.api_base_url));
        }
    }

    Ok(())
}
