//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Config;

const CONFIG_FILENAME: &str = "authlab.toml";

/// Load configuration from authlab.toml, falling back to built-in defaults
/// when no file is found
pub fn load_config() -> Result<Config> {
    match find_config_file() {
        Ok(path) => load_config_from_path(&path),
        Err(Error::ConfigNotFound) => {
            tracing::info!("No {} found, using built-in defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::ConfigNotFound,
        _ => Error::Io(e),
    })?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load from an explicit path if given, otherwise search for the default file
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config_from_path(p),
        None => load_config(),
    }
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Authlab Configuration

[server]
host = "0.0.0.0"
port = 3001
# static_dir = "./public"

[session]
cookie_name = "session"
# Requires HTTPS in front of the service. Disable for plain-HTTP local testing.
secure_cookie = true
# sweep_interval_secs = 300

# Cost used when hashing plaintext passwords at startup
bcrypt_cost = 10

# Generate a hash with: authlab hash-password <password>
[[accounts]]
id = 1
username = "student"
password = "${AUTHLAB_STUDENT_PASSWORD:-password123}"
# password_hash = "$2b$10$..."
"#
}
