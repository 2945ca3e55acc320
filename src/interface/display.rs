#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Colour(pub u16);

impl Colour {
    pub const WHITE: Self = Self(0xFFFF);
    pub const BLACK: Self = Self(0x0000);
    pub const ORANGE: Self = Self(0xD340);
    pub const BLUE: Self = Self(0x0392);
    pub const DARK_BLUE: Self = Self(0x024B);
    pub const GREY: Self = Self(0x31A6);
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ShapeFill {
    Filled,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum FontSize {
    Default,
    Large,
}

impl FontSize {
    /// Width and height of one character cell in this size, in pixels. The display uses a
    /// fixed-width 6x8 font, scaled by an integer factor.
    pub fn cell_size(&self) -> (u16, u16) {
        match self {
            FontSize::Default => (6, 8),
            FontSize::Large => (12, 16),
        }
    }
}

/// An opaque drawing target. The core never touches pixel buffers, only these primitives.
pub trait DisplayInterface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    fn draw_rect(&mut self, x: i16, y: i16, w: u16, h: u16, c: Colour, fill: ShapeFill, radius: u16);

    fn set_cursor(&mut self, x: i16, y: i16);
    fn set_text_colour(&mut self, foreground: Colour, background: Colour);
    fn set_font_size(&mut self, size: FontSize);
    fn print(&mut self, s: &str);

    // Helper methods
    fn clear_region(&mut self, x: i16, y: i16, w: u16, h: u16, c: Colour) {
        self.draw_rect(x, y, w, h, c, ShapeFill::Filled, 0);
    }

    fn fill_screen(&mut self, c: Colour) {
        let (w, h) = (self.width(), self.height());
        self.clear_region(0, 0, w, h, c);
    }

    fn print_at(&mut self, x: i16, y: i16, s: &str) {
        self.set_cursor(x, y);
        self.print(s);
    }
}
