//! In-memory stand-ins for the board, used by the unit tests and `tests.rs`.

use core::cell::{Cell, RefCell};

use alloc::{collections::VecDeque, rc::Rc, string::{String, ToString}, vec, vec::Vec};
use fatfs::{FormatVolumeOptions, IoBase, Read, Seek, SeekFrom, Write};

use crate::interface::{
    ApplicationFramework, ButtonEvent, ButtonsInterface, CardType, Colour, ConsoleInterface,
    DisplayInterface, FontSize, NetworkRecord, RadioInterface, RawKey, ShapeFill, StorageInterface,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RamDiskError;

impl fatfs::IoError for RamDiskError {
    fn is_interrupted(&self) -> bool {
        false
    }

    fn new_unexpected_eof_error() -> Self {
        RamDiskError
    }

    fn new_write_zero_error() -> Self {
        RamDiskError
    }
}

/// A block device backed by a shared byte vector, so that the contents outlive any one mount.
pub struct RamDisk {
    data: Rc<RefCell<Vec<u8>>>,
    fail_writes: Rc<Cell<bool>>,
    position: u64,
}

impl IoBase for RamDisk {
    type Error = RamDiskError;
}

impl Read for RamDisk {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let data = self.data.borrow();
        let position = self.position as usize;
        if position >= data.len() {
            return Ok(0);
        }

        let n = buf.len().min(data.len() - position);
        buf[..n].copy_from_slice(&data[position..position + n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl Write for RamDisk {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes.get() {
            return Err(RamDiskError);
        }

        let mut data = self.data.borrow_mut();
        let position = self.position as usize;
        if position >= data.len() {
            return Ok(0);
        }

        let n = buf.len().min(data.len() - position);
        data[position..position + n].copy_from_slice(&buf[..n]);
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Seek for RamDisk {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let length = self.data.borrow().len() as i64;
        let new_position = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::End(n) => length + n,
            SeekFrom::Current(n) => self.position as i64 + n,
        };

        if new_position < 0 {
            return Err(RamDiskError);
        }
        self.position = new_position as u64;
        Ok(self.position)
    }
}

/// A card slot holding a RAM disk. The disk and the write-failure switch are shared, so tests
/// can keep handles on them after the medium moves into a gateway.
pub struct TestMedium {
    pub data: Rc<RefCell<Vec<u8>>>,
    pub fail_writes: Rc<Cell<bool>>,
    pub present: bool,
    pub connections: usize,
}

impl TestMedium {
    pub const SIZE: usize = 1024 * 1024;

    /// A card with a freshly-formatted FAT volume.
    pub fn formatted() -> Self {
        let medium = Self::unformatted();
        let mut disk = medium.disk();
        fatfs::format_volume(&mut disk, FormatVolumeOptions::new()).unwrap();
        medium
    }

    /// A card full of zeroes, which won't mount.
    pub fn unformatted() -> Self {
        Self {
            data: Rc::new(RefCell::new(vec![0; Self::SIZE])),
            fail_writes: Rc::new(Cell::new(false)),
            present: true,
            connections: 0,
        }
    }

    /// An empty card slot.
    pub fn absent() -> Self {
        Self { present: false, ..Self::unformatted() }
    }

    fn disk(&self) -> RamDisk {
        RamDisk {
            data: self.data.clone(),
            fail_writes: self.fail_writes.clone(),
            position: 0,
        }
    }
}

impl StorageInterface for TestMedium {
    type Device = RamDisk;

    fn connect(&mut self) -> Option<RamDisk> {
        if !self.present {
            return None;
        }
        self.connections += 1;
        Some(self.disk())
    }

    fn card_type(&self) -> CardType {
        CardType::Sdhc
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DrawOp {
    Rect { x: i16, y: i16, w: u16, h: u16, colour: Colour, fill: ShapeFill },
    Cursor { x: i16, y: i16 },
    TextColour { foreground: Colour, background: Colour },
    FontSize(FontSize),
    Text(String),
}

/// A 240x135 display which records what it was asked to draw.
#[derive(Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DrawOp>,
}

impl RecordingDisplay {
    /// Every piece of text printed since the last `clear_ops`.
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Whether the whole screen was cleared since the last `clear_ops`.
    pub fn was_fully_cleared(&self) -> bool {
        self.ops.iter().any(|op| matches!(
            op,
            DrawOp::Rect { x: 0, y: 0, w: 240, h: 135, fill: ShapeFill::Filled, .. }
        ))
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl DisplayInterface for RecordingDisplay {
    fn width(&self) -> u16 { 240 }
    fn height(&self) -> u16 { 135 }

    fn draw_rect(&mut self, x: i16, y: i16, w: u16, h: u16, colour: Colour, fill: ShapeFill, _radius: u16) {
        self.ops.push(DrawOp::Rect { x, y, w, h, colour, fill });
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.ops.push(DrawOp::Cursor { x, y });
    }

    fn set_text_colour(&mut self, foreground: Colour, background: Colour) {
        self.ops.push(DrawOp::TextColour { foreground, background });
    }

    fn set_font_size(&mut self, size: FontSize) {
        self.ops.push(DrawOp::FontSize(size));
    }

    fn print(&mut self, s: &str) {
        self.ops.push(DrawOp::Text(s.to_string()));
    }
}

#[derive(Default)]
pub struct ScriptedButtons {
    pub events: VecDeque<ButtonEvent>,
}

impl ScriptedButtons {
    pub fn press(&mut self, key: RawKey) {
        self.events.push_back(ButtonEvent::Press(key));
        self.events.push_back(ButtonEvent::Release(key));
    }
}

impl ButtonsInterface for ScriptedButtons {
    fn poll_event(&mut self) -> Option<ButtonEvent> {
        self.events.pop_front()
    }
}

#[derive(Default)]
pub struct FakeRadio {
    pub networks: Vec<NetworkRecord>,
    pub connected: bool,
    pub scans: usize,
}

impl FakeRadio {
    /// A radio which will find `count` networks.
    pub fn with_networks(count: usize) -> Self {
        let networks = (0..count)
            .map(|i| NetworkRecord {
                ssid: alloc::format!("Network{}", i),
                bssid: [0x02, 0x00, 0x00, 0x00, 0x00, i as u8],
                rssi: -40 - i as i8,
                channel: (i % 13) as u8 + 1,
                encrypted: i % 2 == 0,
            })
            .collect();
        Self { networks, ..Self::default() }
    }
}

impl RadioInterface for FakeRadio {
    fn scan_networks(&mut self) -> Vec<NetworkRecord> {
        self.scans += 1;
        self.networks.clone()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[derive(Default)]
pub struct BufferConsole {
    pub lines: Vec<String>,
}

impl ConsoleInterface for BufferConsole {
    fn print(&mut self, s: &str) {
        self.lines.push(s.to_string());
    }
}

/// A board whose clock only moves when something waits on it.
pub struct TestFramework {
    pub display: RecordingDisplay,
    pub buttons: ScriptedButtons,
    pub radio: FakeRadio,
    pub console: BufferConsole,
    pub now: u64,
    pub free_memory: usize,
}

impl TestFramework {
    pub fn new(radio: FakeRadio) -> Self {
        Self {
            display: RecordingDisplay::default(),
            buttons: ScriptedButtons::default(),
            radio,
            console: BufferConsole::default(),
            now: 0,
            free_memory: 123 * 1024,
        }
    }
}

impl ApplicationFramework for TestFramework {
    type DisplayI = RecordingDisplay;
    type ButtonsI = ScriptedButtons;
    type RadioI = FakeRadio;
    type ConsoleI = BufferConsole;

    fn display(&self) -> &RecordingDisplay { &self.display }
    fn display_mut(&mut self) -> &mut RecordingDisplay { &mut self.display }

    fn buttons(&self) -> &ScriptedButtons { &self.buttons }
    fn buttons_mut(&mut self) -> &mut ScriptedButtons { &mut self.buttons }

    fn radio(&self) -> &FakeRadio { &self.radio }
    fn radio_mut(&mut self) -> &mut FakeRadio { &mut self.radio }

    fn console_mut(&mut self) -> &mut BufferConsole { &mut self.console }

    fn millis(&self) -> u64 {
        self.now
    }

    fn free_memory(&self) -> usize {
        self.free_memory
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now += ms as u64;
    }
}
