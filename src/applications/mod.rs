use alloc::format;
use log::{info, warn};

use crate::{
    filesystem::{MountError, Settings, StorageGateway, StorageHandle, BOOTSTRAP_DIRECTORIES},
    interface::{ApplicationFramework, StorageInterface},
    logging::{LogChannel, LogLevel, Uptime},
    menu::{ActionId, ActionRunner, Report},
};

pub mod about;
pub mod settings;
pub mod storage;
pub mod wifi;

/// The parts of the OS which menu actions may use, borrowed for the duration of one action.
pub struct ActionContext<'a, F: ApplicationFramework, S: StorageInterface> {
    pub framework: &'a mut F,
    pub storage: &'a mut StorageGateway<S>,
    pub logger: &'a mut LogChannel,
    pub settings: &'a mut Settings,
}

impl<'a, F: ApplicationFramework, S: StorageInterface> ActionContext<'a, F, S> {
    pub fn uptime(&self) -> Uptime {
        Uptime::from_millis(self.framework.millis())
    }

    /// Writes a log entry. Never fails; see `LogChannel::log`.
    pub fn log(&mut self, level: LogLevel, message: &str) {
        let now = self.uptime();
        self.logger.log(self.storage, self.framework.console_mut(), now, level, message);
    }

    pub fn info(&mut self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Pushes the current settings values into the parts of the system which use them.
    pub fn apply_settings(&mut self) {
        self.logger.set_max_size(self.settings.values.max_log_size);
        self.logger.set_console_echo(self.settings.values.console_echo);
    }

    /// Mounts the card, creates the standard directories, loads settings and starts the log
    /// channel. Later steps are skipped if the card can't be mounted, but the settings defaults
    /// are still applied.
    pub fn bring_up_storage(&mut self) -> Result<StorageHandle, MountError> {
        let handle = match self.storage.mount() {
            Ok(handle) => handle,
            Err(e) => {
                self.apply_settings();
                self.error(&format!("Storage unavailable: {}", e));
                return Err(e);
            }
        };

        if let Err(e) = self.storage.ensure_directory_layout(BOOTSTRAP_DIRECTORIES) {
            warn!("{}", e);
        }

        self.settings.load_into_self(self.storage);
        self.apply_settings();

        let now = self.uptime();
        if self.logger.open(self.storage, self.framework.console_mut(), now).is_err() {
            warn!("Log channel not opened");
        }

        info!("Storage ready");
        Ok(handle)
    }

    /// Releases the card and brings it back up from scratch.
    pub fn remount(&mut self) -> Result<StorageHandle, MountError> {
        self.info("Remounting storage");
        self.logger.close();
        self.storage.unmount();
        self.bring_up_storage()
    }
}

impl<'a, F: ApplicationFramework, S: StorageInterface> ActionRunner for ActionContext<'a, F, S> {
    fn run(&mut self, action: ActionId) -> Report {
        match action {
            ActionId::ScanNetworks => wifi::scan_networks(self),
            ActionId::BeaconSpam | ActionId::Deauth | ActionId::EvilPortal => wifi::placeholder(action),

            ActionId::StorageInfo => storage::info(self),
            ActionId::BrowseFiles => storage::browse_files(self),
            ActionId::ViewLog => storage::view_log(self),
            ActionId::RotateLog => storage::rotate_log(self),

            ActionId::ToggleConsoleEcho => settings::toggle_console_echo(self),
            ActionId::TogglePersistence => settings::toggle_persistence(self),
            ActionId::RemountStorage => settings::remount_storage(self),

            ActionId::About => about::about(self),
        }
    }
}
