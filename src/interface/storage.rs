use core::fmt::{self, Display};

use fatfs::ReadWriteSeek;

/// The kind of card reported by the medium driver.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum CardType {
    Mmc,
    Sdsc,
    Sdhc,
    Unknown,
}

impl Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardType::Mmc => "MMC",
            CardType::Sdsc => "SDSC",
            CardType::Sdhc => "SDHC",
            CardType::Unknown => "UNKNOWN",
        })
    }
}

/// The driver for the removable storage medium, on its dedicated bus.
///
/// The device handed out by `connect` must present the FAT volume itself, starting at offset 0;
/// any partition table handling is the driver's job.
pub trait StorageInterface {
    type Device: ReadWriteSeek;

    /// Brings up the card and returns its block device, or `None` if no card responds.
    fn connect(&mut self) -> Option<Self::Device>;

    /// Called once the filesystem has released the device returned by `connect`.
    fn disconnect(&mut self) {}

    fn card_type(&self) -> CardType {
        CardType::Unknown
    }
}
