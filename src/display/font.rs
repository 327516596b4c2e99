/*
 *  display/font.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Board fonts: scaled ISO-8859-1 mono fonts on an alphabetic baseline
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::{
    mono_font::{
        iso_8859_1::{FONT_10X20, FONT_8X13, FONT_9X15},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::Rectangle,
    text::{renderer::TextRenderer, Baseline, Text},
};

/// Font identifiers used by draw commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontId {
    /// Clock lines
    Small,
    /// Header, labels, summaries, ticker
    Medium,
    /// Temperature values
    Large,
}

/// A mono font drawn at an integer pixel scale
#[derive(Debug, Clone, Copy)]
pub struct BoardFont {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
}

impl BoardFont {
    pub const fn new(font: &'static MonoFont<'static>, scale: u32) -> Self {
        Self { font, scale }
    }

    /// Advance width of the widest line, in surface pixels
    pub fn measure(&self, text: &str) -> u32 {
        let style = MonoTextStyle::new(self.font, Rgb888::WHITE);
        text.split('\n')
            .map(|line| {
                let m = style.measure_string(line, Point::zero(), Baseline::Alphabetic);
                m.next_position.x.max(0) as u32 * self.scale
            })
            .max()
            .unwrap_or(0)
    }

    /// Line pitch in surface pixels
    pub fn line_height(&self) -> u32 {
        self.font.character_size.height * self.scale
    }

    /// Draw `text` with its first baseline at `origin`; `\n` starts a new line at the same x.
    pub fn draw<D>(&self, target: &mut D, text: &str, origin: Point, color: Rgb888) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let style = MonoTextStyle::new(self.font, color);
        let mut scaled = ScaledTarget { inner: target, origin, scale: self.scale };
        Text::with_baseline(text, Point::zero(), style, Baseline::Alphabetic).draw(&mut scaled)?;
        Ok(())
    }
}

/// Fonts available to a surface, keyed by [`FontId`]
#[derive(Debug, Clone, Copy)]
pub struct FontBook {
    small: BoardFont,
    medium: BoardFont,
    large: BoardFont,
}

impl FontBook {
    pub const fn new(small: BoardFont, medium: BoardFont, large: BoardFont) -> Self {
        Self { small, medium, large }
    }

    pub fn get(&self, id: FontId) -> &BoardFont {
        match id {
            FontId::Small => &self.small,
            FontId::Medium => &self.medium,
            FontId::Large => &self.large,
        }
    }

    pub fn measure(&self, id: FontId, text: &str) -> u32 {
        self.get(id).measure(text)
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new(
            BoardFont::new(&FONT_8X13, 2),
            BoardFont::new(&FONT_9X15, 2),
            BoardFont::new(&FONT_10X20, 2),
        )
    }
}

/// Blows each glyph-space pixel up into a `scale` x `scale` block anchored at `origin`.
struct ScaledTarget<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D: DrawTarget> OriginDimensions for ScaledTarget<'_, D> {
    fn size(&self) -> Size {
        let outer = self.inner.bounding_box().size;
        Size::new(outer.width / self.scale.max(1), outer.height / self.scale.max(1))
    }
}

impl<D: DrawTarget> DrawTarget for ScaledTarget<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let s = self.scale as i32;
        let block = Size::new(self.scale, self.scale);
        for Pixel(p, c) in pixels {
            let top_left = self.origin + Point::new(p.x * s, p.y * s);
            self.inner.fill_solid(&Rectangle::new(top_left, block), c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_is_advance_times_scale() {
        let book = FontBook::default();
        assert_eq!(book.measure(FontId::Small, "ab"), 2 * 8 * 2);
        assert_eq!(book.measure(FontId::Medium, "Rain"), 4 * 9 * 2);
        assert_eq!(book.measure(FontId::Large, "65"), 2 * 10 * 2);
    }

    #[test]
    fn test_measure_multiline_uses_widest_line() {
        let book = FontBook::default();
        assert_eq!(
            book.measure(FontId::Medium, "Partly\nCloudy"),
            book.measure(FontId::Medium, "Cloudy")
        );
        assert_eq!(book.measure(FontId::Medium, "a\nabc\nab"), 3 * 18);
    }

    #[test]
    fn test_measure_empty() {
        assert_eq!(FontBook::default().measure(FontId::Large, ""), 0);
    }

    #[test]
    fn test_degree_sign_has_a_glyph_width() {
        let book = FontBook::default();
        assert_eq!(book.measure(FontId::Medium, "75°F"), 4 * 18);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(FontBook::default().get(FontId::Medium).line_height(), 30);
    }
}
