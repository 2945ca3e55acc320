use alloc::{string::String, vec::Vec};
use log::debug;

use crate::operating_system::OSInput;

use super::{ActionId, MenuAction, MenuCursor, MenuNode, Screen, ScreenKind};

/// The text a leaf screen shows after an action has run.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Report {
    pub title: String,
    pub lines: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), lines: Vec::new() }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.push(line);
        self
    }
}

/// Carries out the actions bound to menu items. Lent to the state machine for one input.
pub trait ActionRunner {
    fn run(&mut self, action: ActionId) -> Report;
}

/// How much of the screen needs redrawing after an input.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Redraw {
    None,

    /// Only the selection moved; redraw the item list, including the highlight.
    Items,

    /// The screen changed.
    Full,
}

pub struct MenuStateMachine {
    cursor: MenuCursor,
    report: Option<Report>,
}

impl MenuStateMachine {
    pub fn new() -> Self {
        Self {
            cursor: MenuCursor::new(Screen::Main),
            report: None,
        }
    }

    pub fn cursor(&self) -> &MenuCursor {
        &self.cursor
    }

    pub fn screen(&self) -> Screen {
        self.cursor.screen
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.selected_index
    }

    pub fn node(&self) -> &'static MenuNode {
        self.cursor.screen.node()
    }

    /// The report being shown, if the current screen is a leaf.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Applies one input, running a menu action through `runner` if one was selected.
    pub fn handle(&mut self, input: OSInput, runner: &mut impl ActionRunner) -> Redraw {
        let node = self.node();

        match node.kind {
            // Leaves always have a parent
            ScreenKind::Leaf => match node.parent {
                Some(parent) => {
                    self.enter(parent);
                    Redraw::Full
                }
                None => Redraw::None,
            },

            ScreenKind::Navigable => match input {
                OSInput::Up => {
                    self.cursor.move_up();
                    Redraw::Items
                }
                OSInput::Down => {
                    self.cursor.move_down();
                    Redraw::Items
                }
                OSInput::Confirm => self.confirm(node, runner),
                OSInput::Back => match node.parent {
                    Some(parent) => {
                        self.enter(parent);
                        Redraw::Full
                    }
                    None => Redraw::None,
                },
                OSInput::Any => Redraw::None,
            },
        }
    }

    fn confirm(&mut self, node: &'static MenuNode, runner: &mut impl ActionRunner) -> Redraw {
        let item = &node.items[self.cursor.selected_index];

        match item.action {
            MenuAction::Enter(screen) => self.enter(screen),
            MenuAction::Run(action, report_screen) => {
                debug!("Running menu action {:?}", action);
                let report = runner.run(action);
                self.enter(report_screen);
                self.report = Some(report);
            }
        }

        Redraw::Full
    }

    fn enter(&mut self, screen: Screen) {
        debug!("Entering screen {:?}", screen);
        self.cursor = MenuCursor::new(screen);
        self.report = None;
    }
}

impl Default for MenuStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
