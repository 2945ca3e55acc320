use alloc::{string::String, vec::Vec};
use thiserror::Error;

#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum MountError {
    #[error("No SD card attached")]
    NoMedium,

    #[error("SD card mount failed")]
    MountFailed,
}

#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum IoError {
    #[error("SD card not ready")]
    NotReady,

    #[error("Failed to open {path}")]
    OpenFailed { path: String },

    #[error("Short write to {path}: {written} of {expected} bytes")]
    ShortWrite { path: String, written: usize, expected: usize },

    #[error("{path} does not exist")]
    NotFound { path: String },

    #[error("{path} is not a directory")]
    NotADirectory { path: String },

    #[error("Failed to read {path}")]
    ReadFailed { path: String },

    #[error("Failed to create {path}")]
    CreateFailed { path: String },

    #[error("Failed to remove {path}")]
    RemoveFailed { path: String },
}

#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum InitError {
    #[error("Storage not ready")]
    StorageNotReady,
}

/// The paths which `ensure_directory_layout` could not create, each with its cause.
#[derive(PartialEq, Eq, Debug, Clone, Error)]
#[error("{} of the required directories could not be created", failures.len())]
pub struct LayoutError {
    pub failures: Vec<(String, IoError)>,
}

impl LayoutError {
    pub fn failed_paths(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|(path, _)| path.as_str())
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum SettingsError {
    #[error("Settings storage failed: {0}")]
    Storage(#[from] IoError),

    #[error("Settings file is not valid JSON")]
    Parse,

    #[error("Settings could not be serialized")]
    Serialize,
}
