use crate::domain::executor::Timing;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "btmenu".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Keyword the menu is invoked with, shown before the query argument.
    #[serde(default = "default_keyword")]
    pub keyword: String,
    /// Command launched to bring the adapter up.
    #[serde(default = "default_command_on")]
    pub command_on: String,
    /// Command launched to take the adapter down.
    #[serde(default = "default_command_off")]
    pub command_off: String,
    /// Preferred adapter; falls back to the first one BlueZ reports.
    #[serde(default = "default_adapter_name")]
    pub adapter_name: String,

    // Timing settings, all in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    #[serde(default = "default_operation_deadline_ms")]
    pub operation_deadline_ms: u64,
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            command_on: default_command_on(),
            command_off: default_command_off(),
            adapter_name: default_adapter_name(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_ms: default_poll_timeout_ms(),
            operation_deadline_ms: default_operation_deadline_ms(),
            scan_settle_ms: default_scan_settle_ms(),
            log_settings: LogSettings::default(),
        }
    }
}

impl Settings {
    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            poll_timeout: Duration::from_millis(self.poll_timeout_ms),
            operation_deadline: Duration::from_millis(self.operation_deadline_ms),
            scan_settle: Duration::from_millis(self.scan_settle_ms),
        }
    }
}

fn default_keyword() -> String {
    "bt".to_string()
}
fn default_command_on() -> String {
    "bluetoothctl power on".to_string()
}
fn default_command_off() -> String {
    "bluetoothctl power off".to_string()
}
fn default_adapter_name() -> String {
    "hci0".to_string()
}
fn default_poll_interval_ms() -> u64 {
    250
}
fn default_poll_timeout_ms() -> u64 {
    5000
}
fn default_operation_deadline_ms() -> u64 {
    5000
}
fn default_scan_settle_ms() -> u64 {
    2000
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_path(Self::get_settings_path()?)
    }

    fn from_path(settings_path: PathBuf) -> anyhow::Result<Self> {
        match Self::load_from_file(&settings_path) {
            Ok(settings) => Ok(Self {
                settings,
                settings_path,
            }),
            // First run: write the defaults so the file is there to edit.
            Err(_) => {
                let service = Self {
                    settings: Settings::default(),
                    settings_path,
                };
                service.save()?;
                Ok(service)
            }
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("btmenu");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &PathBuf) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }
}
