use alloc::string::String;
use az::SaturatingAs;

use crate::{interface::{ApplicationFramework, Colour, DisplayInterface, FontSize, ShapeFill, StorageInterface}, menu::{MenuCursor, ScreenKind}};

use super::OperatingSystem;

impl<F: ApplicationFramework, S: StorageInterface> OperatingSystem<F, S> {
    pub const STATUS_BAR_HEIGHT: u16 = 10;
    pub const TITLE_BAR_HEIGHT: u16 = 18;
    pub const ITEM_HEIGHT: u16 = 16;
    pub const BODY_LINE_HEIGHT: u16 = 10;
    pub const FOOTER_HEIGHT: u16 = 12;

    fn content_top() -> u16 {
        Self::STATUS_BAR_HEIGHT + Self::TITLE_BAR_HEIGHT + 2
    }

    /// Redraws the entire screen for the current menu state.
    pub fn draw_full(&mut self) {
        self.framework.display_mut().fill_screen(Colour::BLACK);
        self.ui_draw_status_bar();

        let node = self.menu.node();
        let title = match self.menu.report() {
            Some(report) => report.title.clone(),
            None => String::from(node.title),
        };
        self.ui_draw_title(&title);

        match node.kind {
            ScreenKind::Navigable => self.ui_draw_items(),
            ScreenKind::Leaf => self.ui_draw_report(),
        }

        self.ui_draw_footer();
    }

    /// Redraws just the item list, for when only the selection has changed.
    pub fn draw_items(&mut self) {
        let width = self.framework.display().width();
        let height = Self::ITEM_HEIGHT * MenuCursor::ITEMS_PER_PAGE as u16;
        self.framework.display_mut().clear_region(
            0, Self::content_top().saturating_as(), width, height, Colour::BLACK
        );
        self.ui_draw_items();
    }

    /// Draws the status line across the top of the screen.
    pub fn ui_draw_status_bar(&mut self) {
        let line = self.status_line();
        let display = self.framework.display_mut();
        let width = display.width();

        display.clear_region(0, 0, width, Self::STATUS_BAR_HEIGHT, Colour::GREY);
        display.set_font_size(FontSize::Default);
        display.set_text_colour(Colour::WHITE, Colour::GREY);
        display.print_at(2, 1, &line);
    }

    /// Draws a title bar below the status bar, with the text `s`.
    pub fn ui_draw_title(&mut self, s: &str) {
        let display = self.framework.display_mut();
        let width = display.width();

        display.clear_region(
            0, Self::STATUS_BAR_HEIGHT.saturating_as(), width, Self::TITLE_BAR_HEIGHT, Colour::ORANGE
        );
        display.set_font_size(FontSize::Large);
        display.set_text_colour(Colour::WHITE, Colour::ORANGE);
        display.print_at(4, (Self::STATUS_BAR_HEIGHT + 1).saturating_as(), s);
        display.set_font_size(FontSize::Default);
    }

    fn ui_draw_items(&mut self) {
        let cursor = *self.menu.cursor();
        let node = self.menu.node();
        let display = self.framework.display_mut();
        let width = display.width();
        let mut y = Self::content_top();

        display.set_font_size(FontSize::Default);

        let visible = node.items.iter()
            .enumerate()
            .skip(cursor.page_scroll_offset())
            .take(MenuCursor::ITEMS_PER_PAGE);
        for (i, item) in visible {
            let background = if i == cursor.selected_index {
                display.draw_rect(
                    2, y.saturating_as(), width - 2 * 2, Self::ITEM_HEIGHT,
                    Colour::BLUE, ShapeFill::Filled, 3
                );
                Colour::BLUE
            } else {
                Colour::BLACK
            };

            display.set_text_colour(Colour::WHITE, background);
            display.print_at(8, (y + (Self::ITEM_HEIGHT - 8) / 2).saturating_as(), item.label);

            y += Self::ITEM_HEIGHT;
        }

        // Draw scroll indicator, if not everything fits
        let count = node.items.len();
        if count > MenuCursor::ITEMS_PER_PAGE {
            let column_height = Self::ITEM_HEIGHT as usize * MenuCursor::ITEMS_PER_PAGE;
            let per_item = column_height / count;
            display.draw_rect(
                (width - 3).saturating_as(),
                (Self::content_top() as usize + per_item * cursor.page_scroll_offset()).saturating_as(),
                2, (per_item * MenuCursor::ITEMS_PER_PAGE).saturating_as(),
                Colour::DARK_BLUE, ShapeFill::Filled, 1,
            );
        }
    }

    fn ui_draw_report(&mut self) {
        let display = self.framework.display_mut();
        let (char_width, _) = FontSize::Default.cell_size();
        let max_chars = (display.width() / char_width) as usize;
        let body_height = display.height().saturating_sub(Self::content_top() + Self::FOOTER_HEIGHT);
        let max_lines = (body_height / Self::BODY_LINE_HEIGHT) as usize;

        display.set_font_size(FontSize::Default);
        display.set_text_colour(Colour::WHITE, Colour::BLACK);

        let Some(report) = self.menu.report() else { return };

        // If it doesn't all fit, keep the last row to say so
        let shown = if report.lines.len() > max_lines { max_lines.saturating_sub(1) } else { report.lines.len() };

        let mut y = Self::content_top();
        for line in report.lines.iter().take(shown) {
            let clipped = line.chars().take(max_chars).collect::<String>();
            display.print_at(2, y.saturating_as(), &clipped);
            y += Self::BODY_LINE_HEIGHT;
        }
        if shown < report.lines.len() {
            display.print_at(2, y.saturating_as(), "...");
        }
    }

    fn ui_draw_footer(&mut self) {
        let node = self.menu.node();
        let hint = match (node.kind, node.parent) {
            (ScreenKind::Leaf, _) => "Any key: back",
            (ScreenKind::Navigable, None) => ";/.: move  Enter: select",
            (ScreenKind::Navigable, Some(_)) => ";/.: move  Enter: select  `: back",
        };

        let display = self.framework.display_mut();
        let width = display.width();
        let y = display.height().saturating_sub(Self::FOOTER_HEIGHT);

        display.clear_region(0, y.saturating_as(), width, Self::FOOTER_HEIGHT, Colour::GREY);
        display.set_font_size(FontSize::Default);
        display.set_text_colour(Colour::WHITE, Colour::GREY);
        display.print_at(2, (y + 2).saturating_as(), hint);
    }
}
