/*
 *  display/color.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Flat RGBA colors and the board palette
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

use embedded_graphics::pixelcolor::Rgb888;

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Convert for embedded-graphics text rendering (alpha is dropped)
    pub fn to_rgb888(&self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    /// Convert for tiny-skia paint
    pub fn to_skia(&self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Premultiplied pixel as stored in a pixmap
    pub fn to_premultiplied(&self) -> tiny_skia::PremultipliedColorU8 {
        tiny_skia::ColorU8::from_rgba(self.r, self.g, self.b, self.a).premultiply()
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Palette::PRIMARY
    }
}

/// Board palette, the classic weather-channel set
pub struct Palette;

impl Palette {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const BLUE: Rgba = Rgba::rgb(8, 15, 255);
    pub const LIGHT_BLUE: Rgba = Rgba::rgb(121, 112, 255);
    pub const DARK_BLUE: Rgba = Rgba::rgb(41, 25, 92);
    pub const ORANGE: Rgba = Rgba::rgb(194, 108, 2);
    pub const RED: Rgba = Rgba::rgb(198, 19, 2);
    pub const TEAL: Rgba = Rgba::rgb(47, 65, 120);
    pub const TEAL_ALSO: Rgba = Rgba::rgb(172, 177, 237);
    pub const YELLOW: Rgba = Rgba::rgb(205, 185, 0);

    /// Default fill for text and shapes
    pub const PRIMARY: Rgba = Self::WHITE;
    /// Drop shadow under every text run
    pub const SHADOW: Rgba = Self::BLACK;
    /// Footer band while an alert is active
    pub const ALERT: Rgba = Self::RED;
    /// Footer band otherwise
    pub const NEUTRAL: Rgba = Self::TEAL;
    /// Day names, "Extended Forecast", "Hi"
    pub const ACCENT: Rgba = Self::YELLOW;
    /// "Lo"
    pub const LO_LABEL: Rgba = Self::TEAL_ALSO;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_default_is_primary_white() {
        assert_eq!(Rgba::default(), Palette::WHITE);
    }

    #[test]
    fn test_rgb888_conversion() {
        let c = Palette::ORANGE.to_rgb888();
        assert_eq!((c.r(), c.g(), c.b()), (194, 108, 2));
    }

    #[test]
    fn test_opaque_premultiply_is_identity() {
        let p = Palette::TEAL.to_premultiplied();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (47, 65, 120, 255));
    }

    #[test]
    fn test_alert_and_neutral_differ() {
        assert_ne!(Palette::ALERT, Palette::NEUTRAL);
    }
}
