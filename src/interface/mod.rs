mod display;
pub use display::*;

mod buttons;
pub use buttons::*;

mod storage;
pub use storage::*;

mod radio;
pub use radio::*;

/// A line-oriented sink for human-readable console output, typically a serial port.
pub trait ConsoleInterface {
    fn print(&mut self, s: &str);
}

/// Everything the firmware core needs from the board, apart from the storage medium, which is
/// handed to the storage gateway separately so that it can own it.
pub trait ApplicationFramework {
    type DisplayI: DisplayInterface;
    type ButtonsI: ButtonsInterface;
    type RadioI: RadioInterface;
    type ConsoleI: ConsoleInterface;

    fn display(&self) -> &Self::DisplayI;
    fn display_mut(&mut self) -> &mut Self::DisplayI;

    fn buttons(&self) -> &Self::ButtonsI;
    fn buttons_mut(&mut self) -> &mut Self::ButtonsI;

    fn radio(&self) -> &Self::RadioI;
    fn radio_mut(&mut self) -> &mut Self::RadioI;

    fn console_mut(&mut self) -> &mut Self::ConsoleI;

    /// Milliseconds since boot. Must be monotonic.
    fn millis(&self) -> u64;

    /// Bytes of heap currently free.
    fn free_memory(&self) -> usize;

    /// Blocks for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}
