use alloc::string::{String, ToString};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{interface::StorageInterface, logging::LogChannelConfig};

use super::{IoError, SettingsError, StorageGateway, SETTINGS_PATH};

/// User-facing settings, persisted as JSON. Fields missing from the file take their defaults.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsValues {
    pub device_name: String,
    pub version: String,

    /// Whether actions persist their results to the card. Logging is unaffected.
    pub storage_enabled: bool,

    pub console_echo: bool,
    pub max_log_size: u64,
}

impl Default for SettingsValues {
    fn default() -> Self {
        SettingsValues {
            device_name: "UltimatumCardputerKey".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage_enabled: true,
            console_echo: true,
            max_log_size: LogChannelConfig::DEFAULT_MAX_SIZE,
        }
    }
}

#[derive(Default)]
pub struct Settings {
    pub values: SettingsValues,
}

impl Settings {
    /// Returns a new `Settings` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings values from the card. Does not touch the values in this instance.
    pub fn load<S: StorageInterface>(&self, gateway: &mut StorageGateway<S>) -> Result<SettingsValues, SettingsError> {
        let bytes = gateway.read(SETTINGS_PATH)?;
        serde_json::from_slice(&bytes).map_err(|_| SettingsError::Parse)
    }

    /// Loads settings values from the card and replaces the values in this instance with those
    /// loaded. If the file is missing or unreadable, keeps the existing values and writes them
    /// back so that the file is valid next time.
    pub fn load_into_self<S: StorageInterface>(&mut self, gateway: &mut StorageGateway<S>) {
        match self.load(gateway) {
            Ok(values) => {
                self.values = values;
                info!("Settings loaded from {}", SETTINGS_PATH);
            }

            Err(SettingsError::Storage(IoError::NotReady)) =>
                warn!("Storage not ready, using default settings"),

            Err(e) => {
                warn!("Settings could not be loaded ({}), writing defaults", e);
                if let Err(e) = self.save(gateway) {
                    warn!("Default settings could not be saved: {}", e);
                }
            }
        }
    }

    /// Saves the settings values in this instance to the card.
    pub fn save<S: StorageInterface>(&self, gateway: &mut StorageGateway<S>) -> Result<(), SettingsError> {
        let bytes = serde_json::to_vec_pretty(&self.values).map_err(|_| SettingsError::Serialize)?;
        gateway.write(SETTINGS_PATH, &bytes)?;
        Ok(())
    }
}
