use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_quotes")]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            quotes: default_quotes(),
            smtp: SmtpConfig::default(),
            email: EmailConfig::default(),
            schedule: ScheduleConfig::default(),
            rotation: RotationConfig::default(),
            state: StateConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Loads the config file, writing a starter file first when none exists.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let raw = fs::read_to_string(config_path)
                .with_context(|| format!("failed to read config file {}", config_path.display()))?;
            toml::from_str::<DaemonConfig>(&raw)
                .with_context(|| format!("failed to parse TOML from {}", config_path.display()))?
        } else {
            let config = DaemonConfig::default();
            match config.write_to(config_path) {
                Ok(()) => warn!(
                    path = %config_path.display(),
                    "no config file found, wrote a default one; edit it before relying on delivery"
                ),
                Err(error) => warn!("failed to write default config: {error:#}"),
            }
            config
        };

        config.state.path = config.state.resolve_against(config_path);
        config.validate()?;
        Ok(config)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.quotes.is_empty() {
            bail!("config has no quotes; add at least one entry to `quotes`");
        }
        if self.email.to.is_empty() {
            bail!("config has no recipients; add at least one address to `email.to`");
        }
        if self.email.from.trim().is_empty() {
            bail!("`email.from` is empty");
        }
        Ok(())
    }
}

pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var("QUOTEY_CONFIG") {
        return Path::new(&path).to_path_buf();
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("quotey").join("config.toml");
    }

    Path::new("quotey.toml").to_path_buf()
}

fn default_quotes() -> Vec<String> {
    vec![
        "The only way to do great work is to love what you do. - Steve Jobs".to_string(),
        "Life is what happens when you're busy making other plans. - John Lennon".to_string(),
        "The future belongs to those who believe in the beauty of their dreams. - Eleanor Roosevelt"
            .to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_server")]
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub security: SmtpSecurity,
    #[serde(default = "default_smtp_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: default_smtp_server(),
            port: default_smtp_port(),
            username: "your-email@example.com".to_string(),
            password: "your-password".to_string(),
            security: SmtpSecurity::default(),
            timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

fn default_smtp_server() -> String {
    "smtp.example.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    #[default]
    Starttls,
    Tls,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            to: vec!["your-email@example.com".to_string()],
            subject: default_subject(),
        }
    }
}

fn default_from() -> String {
    "quotes@example.com".to_string()
}

fn default_subject() -> String {
    "Your Daily Quote".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_times")]
    pub times: Vec<String>,
    #[serde(default = "default_startup_notification")]
    pub startup_notification: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            times: default_times(),
            startup_notification: default_startup_notification(),
        }
    }
}

fn default_times() -> Vec<String> {
    vec!["07:00".to_string(), "12:00".to_string(), "19:00".to_string()]
}

fn default_startup_notification() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_max_repetition")]
    pub max_repetition: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_repetition: default_max_repetition(),
        }
    }
}

fn default_max_repetition() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl StateConfig {
    fn resolve_against(&self, config_path: &Path) -> PathBuf {
        if self.path.is_absolute() {
            return self.path.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.path),
            None => self.path.clone(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

fn default_state_path() -> PathBuf {
    Path::new("quotey-state.json").to_path_buf()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifierConfig {
    #[serde(default)]
    pub backend: NotifierBackend,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierBackend {
    #[default]
    Smtp,
    Log,
}
