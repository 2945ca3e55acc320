/// Directories which must exist on the card before anything else touches it. Created at boot and
/// on remount, never deleted. Parents come before their children.
pub const BOOTSTRAP_DIRECTORIES: &[&str] = &[
    "/config",
    "/data",
    "/data/captures",
    "/data/recordings",
    "/downloads",
    "/keys",
    "/logs",
    "/captures",
    "/loot",
    "/firmware",
];

pub const SETTINGS_PATH: &str = "/config/settings.json";
pub const SYSTEM_LOG_PATH: &str = "/logs/system.log";
pub const WIFI_SCAN_LOG_PATH: &str = "/logs/wifi_scan.log";
