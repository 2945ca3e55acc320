use core::fmt::Write;

use heapless::String;

use crate::filesystem::StorageHandle;

pub const STATUS_WIDTH: usize = 24;

pub type StatusLine = String<STATUS_WIDTH>;

/// Builds the status line shown at the top of every screen, e.g. `SD:OK WIFI:-- MEM: 123K`.
/// Always exactly `STATUS_WIDTH` characters, and never allocates.
pub fn status_line(storage: &StorageHandle, connected: bool, free_memory: usize) -> StatusLine {
    let flag = |ok: bool| if ok { "OK" } else { "--" };
    let free_kb = (free_memory / 1024).min(9999);

    let mut line = StatusLine::new();

    // Every field is bounded, so this can't overflow
    let _ = write!(line, "SD:{} WIFI:{} MEM:{:>4}K", flag(storage.mounted), flag(connected), free_kb);
    while line.push(' ').is_ok() {}

    line
}
