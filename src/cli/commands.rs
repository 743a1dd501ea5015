//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use crate::cli::{info, print_account_table, success, warn, AccountSummary, OutputFormat};
use crate::config::{self, Config};

/// Initialize a new authlab.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("authlab.toml");

    if config_path.exists() {
        warn("authlab.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created authlab.toml");
    info("Replace the sample password, then run 'authlab serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server on {}:{}", host, port));
    crate::api::run_server(config, &host, port).await?;

    Ok(())
}

/// Print a bcrypt hash of the given password, or of one line read from stdin
pub async fn hash_password(password: Option<String>, cost: u32) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprint!("Password: ");
            }
            read_password(stdin.lock())?
        }
    };

    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    println!("{}", hash);
    Ok(())
}

/// List configured accounts without revealing credentials
pub async fn accounts(format: OutputFormat, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let summaries: Vec<AccountSummary> = config.accounts.iter().map(AccountSummary::from).collect();

    match format {
        OutputFormat::Table => print_account_table(&summaries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
    }

    Ok(())
}

/// Read the first line as the password, without its line ending
fn read_password<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("No password given on stdin");
    }
    Ok(password.to_string())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    config::load_config_or_default(path.as_deref()).map_err(|e| anyhow::anyhow!("{}", e))
}
