use super::Screen;

/// The current screen and the item selected on it.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct MenuCursor {
    pub screen: Screen,
    pub selected_index: usize,
    page_scroll_offset: usize,
}

impl MenuCursor {
    pub const ITEMS_PER_PAGE: usize = 5;

    /// A cursor on the first item of `screen`.
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            selected_index: 0,
            page_scroll_offset: 0,
        }
    }

    /// Index of the first item visible on the page.
    pub fn page_scroll_offset(&self) -> usize {
        self.page_scroll_offset
    }

    fn item_count(&self) -> usize {
        self.screen.node().item_count()
    }

    pub fn move_up(&mut self) {
        let count = self.item_count();

        if self.selected_index == 0 {
            // Wrap
            self.selected_index = count - 1;

            if count > Self::ITEMS_PER_PAGE {
                self.page_scroll_offset = count - Self::ITEMS_PER_PAGE;
            } else {
                self.page_scroll_offset = 0;
            }
        } else {
            self.selected_index -= 1;

            // If scrolled off the screen, scroll up
            if self.selected_index < self.page_scroll_offset {
                self.page_scroll_offset -= 1;
            }
        }
    }

    pub fn move_down(&mut self) {
        self.selected_index += 1;

        // Wrap
        if self.selected_index == self.item_count() {
            self.selected_index = 0;
            self.page_scroll_offset = 0;
        }

        // If scrolled off the screen, scroll down
        if self.selected_index >= self.page_scroll_offset + Self::ITEMS_PER_PAGE {
            self.page_scroll_offset += 1;
        }
    }
}
