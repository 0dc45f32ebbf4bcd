use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://smart-brain-api-one.vercel.app";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Default)]
struct ClientConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Client configuration: where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration: optional JSON file named by `SMARTBRAIN_CONFIG`,
    /// then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SMARTBRAIN_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => ClientConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ClientConfigFile) -> Self {
        Self {
            base_url: file
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("SMARTBRAIN_API_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(timeout) = std::env::var("SMARTBRAIN_TIMEOUT_SECS") {
            let seconds: u64 = timeout.parse().map_err(|_| {
                anyhow!("SMARTBRAIN_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.timeout = Duration::from_secs(seconds);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| anyhow!("invalid backend base url '{}': {}", self.base_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "backend base url must be http(s), got '{}'",
                self.base_url
            ));
        }
        if self.timeout.as_secs() == 0 {
            return Err(anyhow!("timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ClientConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
