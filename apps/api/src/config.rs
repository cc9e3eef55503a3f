use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers are a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where `.tex` and `.pdf` artifacts are written and served from.
    pub output_dir: PathBuf,
    pub template_path: PathBuf,
    pub latex_bin: String,
    pub latex_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            output_dir: env_or("OUTPUT_DIR", "outputs").into(),
            template_path: env_or("TEMPLATE_PATH", "templates/resume_template.tex").into(),
            latex_bin: env_or("LATEX_BIN", "pdflatex"),
            latex_timeout: Duration::from_secs(
                env_or("LATEX_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("LATEX_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
