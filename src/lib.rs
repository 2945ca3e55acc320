#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod interface;
pub mod filesystem;
pub mod logging;
pub mod menu;
pub mod operating_system;
pub mod applications;

#[cfg(test)]
mod test_support;


use interface::{ApplicationFramework, StorageInterface};
use operating_system::OperatingSystem;

/// Firmware entry point, called by the board crate once clocks, pins, the allocator and the
/// logger are set up. Never returns.
pub fn ultimatum_main<F: ApplicationFramework, S: StorageInterface>(framework: F, medium: S) -> ! {
    let mut os = OperatingSystem::new(framework, medium);
    os.run()
}
