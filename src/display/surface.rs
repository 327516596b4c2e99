/*
 *  display/surface.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  RGBA raster surface backed by a tiny-skia pixmap
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tiny_skia::{Paint, Pixmap, PixmapPaint, Rect, Transform};

use crate::display::color::Rgba;
use crate::display::error::RenderError;
use crate::display::font::{FontBook, FontId};
use crate::display::icon::Icon;
use crate::display::traits::Canvas;

/// A fixed-size RGBA raster. Cloning copies the pixels.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
    fonts: FontBook,
}

impl Surface {
    /// Transparent-black surface of `width` x `height`
    pub fn new(width: u32, height: u32, fonts: FontBook) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::SurfaceAllocation { width, height })?;
        Ok(Self { pixmap, fonts })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Straight RGBA at (x, y), None if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgba::new(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Raw premultiplied bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Demultiplied copy for the encoder
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            let (w, h) = (self.width() as usize, self.height() as usize);
            if x < w && y < h {
                return Some(y * w + x);
            }
        }
        None
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

// text goes through embedded-graphics, painted opaque
impl DrawTarget for Surface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.pixmap.pixels_mut()[i] = Rgba::rgb(c.r(), c.g(), c.b()).to_premultiplied();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let px = Rgba::rgb(color.r(), color.g(), color.b()).to_premultiplied();
        let clipped = area.intersection(&self.bounding_box());
        if clipped.size.width == 0 || clipped.size.height == 0 {
            return Ok(());
        }
        let w = self.width() as usize;
        let x0 = clipped.top_left.x as usize;
        let cols = clipped.size.width as usize;
        let pixels = self.pixmap.pixels_mut();
        for row in 0..clipped.size.height as usize {
            let base = (clipped.top_left.y as usize + row) * w + x0;
            pixels[base..base + cols].fill(px);
        }
        Ok(())
    }
}

impl Canvas for Surface {
    fn measure_text(&self, font: FontId, text: &str) -> u32 {
        self.fonts.measure(font, text)
    }

    fn draw_text(&mut self, font: FontId, text: &str, origin: Point, color: Rgba) -> Result<(), RenderError> {
        let face = *self.fonts.get(font);
        match face.draw(self, text, origin, color.to_rgb888()) {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgba) -> Result<(), RenderError> {
        // zero-area rectangles paint nothing
        let Some(r) = Rect::from_xywh(
            rect.top_left.x as f32,
            rect.top_left.y as f32,
            rect.size.width as f32,
            rect.size.height as f32,
        ) else {
            return Ok(());
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = false;
        self.pixmap.fill_rect(r, &paint, Transform::identity(), None);
        Ok(())
    }

    fn draw_image(&mut self, image: &Icon, origin: Point) -> Result<(), RenderError> {
        self.pixmap.draw_pixmap(
            origin.x,
            origin.y,
            image.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }
}
