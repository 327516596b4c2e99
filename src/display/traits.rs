/*
 *  display/traits.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Paint target abstraction for the draw-command interpreter
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

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::color::Rgba;
use crate::display::error::RenderError;
use crate::display::font::FontId;
use crate::display::icon::Icon;

/// Minimal paint target - everything the interpreter needs from a raster
///
/// The interpreter only ever measures and paints through this trait, so it can run
/// against a real [`Surface`](crate::display::surface::Surface) or a recording
/// stand-in in tests.
pub trait Canvas {
    /// Rendered advance width of `text` in `font`, widest line for multi-line text
    fn measure_text(&self, font: FontId, text: &str) -> u32;

    /// Paint `text` with its first baseline starting at `origin`
    fn draw_text(&mut self, font: FontId, text: &str, origin: Point, color: Rgba) -> Result<(), RenderError>;

    /// Fill `rect` with a flat color
    fn fill_rect(&mut self, rect: Rectangle, color: Rgba) -> Result<(), RenderError>;

    /// Composite `image` with its top-left corner at `origin`
    fn draw_image(&mut self, image: &Icon, origin: Point) -> Result<(), RenderError>;
}
