use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Parser, Debug)]
#[clap(name = "satlog-analyzer", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override listen address for the web interface
    #[clap(long)]
    pub listen: Option<String>,

    /// Override chat-completions endpoint URL
    #[clap(long)]
    pub api_url: Option<String>,

    /// Override model identifier
    #[clap(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub api_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// No timeout when unset
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:7860".to_string(),
            api_url: "https://api.cerebras.ai/v1/chat/completions".to_string(),
            model: "llama-4-scout-17b-16e-instruct".to_string(),
            api_key_env: "CEREBRAS_API_KEY".to_string(),
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn log_level(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.log_level))
    }

    /// Reads the API key once. A missing key is not an error here; requests
    /// are still attempted and fail at call time.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        let config_content = fs::read_to_string(&cli.config)
            .with_context(|| format!("Failed to read config file: {:?}", cli.config))?;

        toml::from_str(&config_content).context("Failed to parse config file")?
    } else if cli.config == PathBuf::from(DEFAULT_CONFIG_PATH) {
        Config::default()
    } else {
        anyhow::bail!("Config file not found: {:?}", cli.config);
    };

    // Apply CLI overrides
    if let Some(ref listen) = cli.listen {
        config.listen_addr = listen.clone();
    }

    if let Some(ref api_url) = cli.api_url {
        config.api_url = api_url.clone();
    }

    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }

    Ok(config)
}
