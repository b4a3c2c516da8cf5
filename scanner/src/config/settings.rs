// Scan settings, loaded from an optional JSON file and overridden by environment variables
use serde::{Deserialize, Serialize};
use shared::Strategy;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ScanError;

pub const DEFAULT_CONFIG_FILE: &str = "scan_config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSourceKind {
    #[default]
    Yahoo,
    CsvDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    #[default]
    Env,
    Vault,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSourceSettings {
    pub kind: PriceSourceKind,
    pub base_url: String,
    /// Directory holding `<SYMBOL>.csv` files for the `csv_dir` source.
    pub csv_dir: PathBuf,
    pub range: String,
    pub interval: String,
    pub timeout_secs: u64,
    /// Scale OHLC by the adjusted close when the source provides it.
    pub auto_adjust: bool,
}

impl Default for PriceSourceSettings {
    fn default() -> Self {
        PriceSourceSettings {
            kind: PriceSourceKind::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_dir: PathBuf::from("prices"),
            range: "5y".to_string(),
            interval: "1d".to_string(),
            timeout_secs: 30,
            auto_adjust: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    /// Name of the secret holding the SMTP password.
    pub credential_name: String,
    pub credential_backend: CredentialBackend,
    pub vault_file: PathBuf,
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings {
            enabled: true,
            sender: String::new(),
            recipient: String::new(),
            subject: "Daily analysis results".to_string(),
            body: "Hi,\n\nAttached is the latest CSV file with stock analysis results.\n\nBest regards,\nYour Bot"
                .to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            username: String::new(),
            credential_name: "EMAIL_PASSWORD".to_string(),
            credential_backend: CredentialBackend::Env,
            vault_file: PathBuf::from("vault.json"),
        }
    }
}

impl EmailSettings {
    /// Username used for SMTP login; falls back to the sender address.
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.sender
        } else {
            &self.username
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.sender.trim().is_empty() {
            return Err(ScanError::ConfigError("email sender is not set".to_string()));
        }
        if self.recipient.trim().is_empty() {
            return Err(ScanError::ConfigError("email recipient is not set".to_string()));
        }
        if self.smtp_host.trim().is_empty() {
            return Err(ScanError::ConfigError("SMTP host is not set".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub strategy: Strategy,
    pub tickers_file: PathBuf,
    pub results_dir: PathBuf,
    /// Feed the penultimate day's MACD state to the crossover policy.
    pub macd_previous_from_series: bool,
    pub price_source: PriceSourceSettings,
    pub email: EmailSettings,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            strategy: Strategy::RsiSma,
            tickers_file: PathBuf::from("tickers.csv"),
            results_dir: PathBuf::from("."),
            macd_previous_from_series: false,
            price_source: PriceSourceSettings::default(),
            email: EmailSettings::default(),
        }
    }
}

impl ScanSettings {
    /// Reads `path` when it exists, otherwise starts from defaults. Missing
    /// fields in the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: ScanSettings = serde_json::from_str(&content)
            .map_err(|e| ScanError::ConfigError(format!("failed to parse '{}': {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded scan settings");
        Ok(settings)
    }

    /// Load from the file named by `SCAN_CONFIG` (or the default file) and
    /// apply environment overrides.
    pub fn from_env() -> Result<Self, ScanError> {
        let path = std::env::var("SCAN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut settings = Self::load(path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(strategy) = get("SCAN_STRATEGY") {
            self.strategy = strategy.parse().map_err(ScanError::ConfigError)?;
        }
        if let Some(file) = get("SCAN_TICKERS_FILE") {
            self.tickers_file = PathBuf::from(file);
        }
        if let Some(dir) = get("SCAN_RESULTS_DIR") {
            self.results_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("SCAN_PRICE_DIR") {
            self.price_source.kind = PriceSourceKind::CsvDir;
            self.price_source.csv_dir = PathBuf::from(dir);
        }
        if let Some(sender) = get("EMAIL_SENDER") {
            self.email.sender = sender;
        }
        if let Some(recipient) = get("EMAIL_RECIPIENT") {
            self.email.recipient = recipient;
        }
        if let Some(host) = get("SMTP_HOST") {
            self.email.smtp_host = host;
        }
        if let Some(port) = get("SMTP_PORT") {
            self.email.smtp_port = port
                .parse()
                .map_err(|e| ScanError::ConfigError(format!("invalid SMTP_PORT '{}': {}", port, e)))?;
        }
        if let Some(username) = get("SMTP_USERNAME") {
            self.email.username = username;
        }
        Ok(())
    }

    pub fn results_file(&self) -> PathBuf {
        let name = match self.strategy {
            Strategy::RsiSma => "analysis_results.csv",
            Strategy::Macd => "analysis_results_macd.csv",
        };
        self.results_dir.join(name)
    }
}
