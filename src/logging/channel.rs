use core::fmt::{self, Display};

use alloc::{format, string::{String, ToString}};
use log::{debug, error, info, warn};

use crate::{filesystem::{InitError, IoError, StorageGateway, SYSTEM_LOG_PATH}, interface::{ConsoleInterface, StorageInterface}};

use super::Uptime;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log record. Only ever exists while it is being written out.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    pub timestamp: Uptime,
    pub level: LogLevel,
    pub message: &'a str,
}

impl<'a> LogEntry<'a> {
    /// The entry as it is stored in the log file, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl<'a> Display for LogEntry<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.level, self.message)
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct LogChannelConfig {
    active_path: String,
    pub max_size_bytes: u64,
    pub echo_to_console: bool,
}

impl LogChannelConfig {
    pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

    pub fn new(active_path: &str) -> Self {
        Self {
            active_path: active_path.to_string(),
            max_size_bytes: Self::DEFAULT_MAX_SIZE,
            echo_to_console: true,
        }
    }

    pub fn active_path(&self) -> &str {
        &self.active_path
    }
}

impl Default for LogChannelConfig {
    fn default() -> Self {
        Self::new(SYSTEM_LOG_PATH)
    }
}

/// Appends timestamped, levelled lines to one active file on the card, rotating it out to a
/// backup once it grows past the configured size.
///
/// The channel doesn't own the storage gateway or the console; they're lent to each call.
/// Until `open` succeeds, entries go to the console only.
pub struct LogChannel {
    config: LogChannelConfig,
    opened: bool,
}

impl LogChannel {
    pub fn new(config: LogChannelConfig) -> Self {
        Self { config, opened: false }
    }

    pub fn config(&self) -> &LogChannelConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn set_max_size(&mut self, bytes: u64) {
        debug!("Max log size set to {} bytes", bytes);
        self.config.max_size_bytes = bytes;
    }

    pub fn set_console_echo(&mut self, enabled: bool) {
        debug!("Console echo {}", if enabled { "enabled" } else { "disabled" });
        self.config.echo_to_console = enabled;
    }

    /// Starts writing to the card. Fails if storage isn't mounted, in which case the channel
    /// stays in console-only mode.
    pub fn open<S: StorageInterface, C: ConsoleInterface>(
        &mut self,
        gateway: &mut StorageGateway<S>,
        console: &mut C,
        now: Uptime,
    ) -> Result<(), InitError> {
        if !gateway.is_ready() {
            console.print("[Logger] ERROR: Storage manager not ready");
            error!("Log channel could not open: storage not ready");
            return Err(InitError::StorageNotReady);
        }

        self.opened = true;
        console.print("[Logger] Logger initialized");
        info!("Log channel writing to {}", self.config.active_path);
        self.log(gateway, console, now, LogLevel::Info, "Logger system started");

        Ok(())
    }

    /// Goes back to console-only mode, for example because the card is about to be unmounted.
    pub fn close(&mut self) {
        self.opened = false;
    }

    /// Writes one entry. Never fails; if the card can't be written, the failure is reported on
    /// the console and the entry is lost.
    pub fn log<S: StorageInterface, C: ConsoleInterface>(
        &mut self,
        gateway: &mut StorageGateway<S>,
        console: &mut C,
        now: Uptime,
        level: LogLevel,
        message: &str,
    ) {
        if !self.opened {
            console.print(&format!("[Logger] {}: {}", level, message));
            return;
        }

        let entry = LogEntry { timestamp: now, level, message };
        if self.config.echo_to_console {
            console.print(&entry.to_string());
        }

        // Rotate first, so that the entry which crossed the limit starts the new file
        if self.size(gateway) > self.config.max_size_bytes {
            if let Err(e) = self.rotate(gateway, now) {
                console.print("[Logger] ERROR: Log rotation failed");
                warn!("Log rotation failed: {}", e);
            }
        }

        if let Err(e) = gateway.append(&self.config.active_path, entry.to_line().as_bytes()) {
            console.print("[Logger] ERROR: Failed to write to log file");
            warn!("Log entry lost: {}", e);
        }
    }

    /// Moves the active file's contents to a backup named after the current uptime, and returns
    /// the backup's path. The active file is only removed once the backup has been written in
    /// full; on any failure it is left exactly as it was.
    pub fn rotate<S: StorageInterface>(&mut self, gateway: &mut StorageGateway<S>, now: Uptime) -> Result<String, IoError> {
        if !self.opened {
            return Err(IoError::NotReady);
        }

        let active_path = self.config.active_path.as_str();
        let backup_path = backup_path_for(gateway, active_path, now);
        info!("Rotating log to: {}", backup_path);

        let data = gateway.read(active_path)?;
        if let Err(e) = gateway.write(&backup_path, &data) {
            // Don't leave a truncated backup lying around
            if gateway.exists(&backup_path) {
                let _ = gateway.remove(&backup_path);
            }
            return Err(e);
        }
        gateway.remove(active_path)?;

        info!("Log rotation complete");
        Ok(backup_path)
    }

    /// Size of the active file, or 0 if the channel isn't open or storage isn't ready.
    pub fn size<S: StorageInterface>(&self, gateway: &StorageGateway<S>) -> u64 {
        if !self.opened {
            debug!("Log size requested while logger is not open");
            return 0;
        }
        gateway.size(&self.config.active_path)
    }
}

/// Builds `<stem>_<millis><extension>` next to the active file. If a file with that name already
/// exists, a counter is added so that an earlier backup is never overwritten.
fn backup_path_for<S: StorageInterface>(gateway: &StorageGateway<S>, active_path: &str, now: Uptime) -> String {
    let file_start = active_path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (stem, extension) = match active_path[file_start..].rfind('.') {
        Some(i) => active_path.split_at(file_start + i),
        None => (active_path, ""),
    };

    let candidate = format!("{}_{}{}", stem, now.as_millis(), extension);
    if !gateway.exists(&candidate) {
        return candidate;
    }

    (1..)
        .map(|n| format!("{}_{}_{}{}", stem, now.as_millis(), n, extension))
        .find(|path| !gateway.exists(path))
        .unwrap_or(candidate)
}
