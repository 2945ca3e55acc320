use alloc::{string::String, vec::Vec};

/// One access point discovered by a scan.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NetworkRecord {
    pub ssid: String,
    pub bssid: [u8; 6],
    pub rssi: i8,
    pub channel: u8,
    pub encrypted: bool,
}

impl NetworkRecord {
    /// The BSSID in the usual colon-separated form.
    pub fn bssid_string(&self) -> String {
        let b = self.bssid;
        alloc::format!(
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// The radio subsystem. Only scanning and connection state are used by the core.
pub trait RadioInterface {
    fn scan_networks(&mut self) -> Vec<NetworkRecord>;
    fn is_connected(&self) -> bool;
}
