use alloc::{collections::VecDeque, format, string::String, vec, vec::Vec};
use log::warn;

use crate::{
    applications::ActionContext,
    filesystem::{Settings, StorageGateway},
    interface::{ApplicationFramework, ConsoleInterface, RadioInterface, StorageInterface},
    logging::{LogChannel, LogChannelConfig, LogLevel, Uptime},
    menu::{MenuStateMachine, Redraw},
};

mod input;
pub use input::*;

mod status;
pub use status::*;

mod ui;

/// Owns every piece of device state. Nothing lives in globals; the parts are lent to each other
/// for the duration of a call.
pub struct OperatingSystem<F: ApplicationFramework, S: StorageInterface> {
    pub framework: F,
    pub storage: StorageGateway<S>,
    pub logger: LogChannel,
    pub settings: Settings,
    pub menu: MenuStateMachine,

    pub virtual_input_queue: VecDeque<OSInput>,
}

impl<F: ApplicationFramework, S: StorageInterface> OperatingSystem<F, S> {
    /// How long each iteration of the control loop waits after handling input.
    pub const POLL_DELAY_MS: u32 = 10;

    pub fn new(framework: F, medium: S) -> Self {
        Self {
            framework,
            storage: StorageGateway::new(medium),
            logger: LogChannel::new(LogChannelConfig::default()),
            settings: Settings::new(),
            menu: MenuStateMachine::new(),

            virtual_input_queue: VecDeque::new(),
        }
    }

    /// Brings up storage, settings and logging, then draws the first screen. If there's no usable
    /// card, the device carries on without persistence.
    pub fn boot(&mut self) {
        self.framework.console_mut().print("UltimatumCardputerKey Starting...");

        if let Err(e) = self.action_context().bring_up_storage() {
            warn!("Continuing without storage: {}", e);
        }
        self.log_info("System ready");

        self.framework.console_mut().print("Initialization complete");
        self.draw_full();
    }

    /// One iteration of the control loop: handles at most one key press, then waits.
    pub fn tick(&mut self) {
        if let Some(input) = self.input() {
            self.dispatch(input);
        }
        self.framework.delay_ms(Self::POLL_DELAY_MS);
    }

    /// Boots, then runs the control loop forever.
    pub fn run(&mut self) -> ! {
        self.boot();
        loop {
            self.tick();
        }
    }

    /// Passes an input to the menu, and redraws whatever it changed.
    pub fn dispatch(&mut self, input: OSInput) -> Redraw {
        // Built field by field, since the menu is borrowed alongside it
        let mut context = ActionContext {
            framework: &mut self.framework,
            storage: &mut self.storage,
            logger: &mut self.logger,
            settings: &mut self.settings,
        };
        let redraw = self.menu.handle(input, &mut context);

        match redraw {
            Redraw::Full => self.draw_full(),
            Redraw::Items => self.draw_items(),
            Redraw::None => (),
        }

        redraw
    }

    /// Lends out the parts of the OS which menu actions work with.
    pub fn action_context(&mut self) -> ActionContext<'_, F, S> {
        ActionContext {
            framework: &mut self.framework,
            storage: &mut self.storage,
            logger: &mut self.logger,
            settings: &mut self.settings,
        }
    }

    pub fn uptime(&self) -> Uptime {
        Uptime::from_millis(self.framework.millis())
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        self.action_context().log(level, message);
    }

    pub fn log_info(&mut self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_warning(&mut self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn status_line(&self) -> StatusLine {
        status_line(
            self.storage.handle(),
            self.framework.radio().is_connected(),
            self.framework.free_memory(),
        )
    }

    /// The current screen and selection, for tests to assert on.
    pub fn test_info(&self) -> Vec<String> {
        vec![
            format!("{:?}", self.menu.screen()),
            format!("{}", self.menu.selected_index()),
        ]
    }
}
