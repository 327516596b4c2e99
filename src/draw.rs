/*
 *  draw.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Draw commands and the cursor-driven interpreter that paints them
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

//! A board is painted from an ordered list of [`DrawCommand`]s.
//!
//! Every command first moves the cursor (absolute or relative to the previous cursor),
//! then paints each of its payloads at the resolved cursor. Text is always painted
//! twice: a drop shadow offset by [`SHADOW_OFFSET`] and the fill on top.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::display::color::{Palette, Rgba};
use crate::display::error::RenderError;
use crate::display::font::FontId;
use crate::display::icon::Icon;
use crate::display::traits::Canvas;

/// Drop shadow offset, down and right
pub const SHADOW_OFFSET: Point = Point::new(2, 2);

/// Horizontal alignment of text and images relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// Left edge of content `width` wide anchored at `x`
    pub fn origin_x(self, x: i32, width: u32) -> i32 {
        let w = width as i32;
        match self {
            HAlign::Left => x,
            HAlign::Center => x - w / 2,
            HAlign::Right => x - w,
        }
    }
}

/// How a command moves the cursor before painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Absolute(Point),
    Relative(Point),
}

impl CursorMove {
    /// Resolve against the running cursor
    pub fn apply(self, cursor: Point) -> Point {
        match self {
            CursorMove::Absolute(p) => p,
            CursorMove::Relative(d) => cursor + d,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    /// No font, no text
    pub font: Option<FontId>,
    pub text: String,
    pub color: Rgba,
    pub align: HAlign,
}

/// Shape kinds; anything but a rectangle is carried through and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Unsupported(String),
}

impl ShapeKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "rectangle" | "rect" => ShapeKind::Rectangle,
            other => ShapeKind::Unsupported(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraw {
    pub kind: ShapeKind,
    pub size: Size,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct ImageDraw {
    pub image: Icon,
    pub align: HAlign,
}

/// One paintable payload of a command
#[derive(Debug, Clone)]
pub enum Paint {
    Text(TextDraw),
    Shape(ShapeDraw),
    Image(ImageDraw),
}

/// A cursor move followed by zero or more payloads painted at the new cursor
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub cursor: CursorMove,
    pub paints: Vec<Paint>,
}

impl DrawCommand {
    /// Cursor := (x, y)
    pub fn at(x: i32, y: i32) -> Self {
        Self { cursor: CursorMove::Absolute(Point::new(x, y)), paints: Vec::new() }
    }

    /// Cursor += (dx, dy)
    pub fn rel(dx: i32, dy: i32) -> Self {
        Self { cursor: CursorMove::Relative(Point::new(dx, dy)), paints: Vec::new() }
    }

    pub fn text(self, font: FontId, text: impl Into<String>) -> Self {
        self.text_styled(Some(font), text, Palette::PRIMARY, HAlign::Left)
    }

    pub fn text_styled(mut self, font: Option<FontId>, text: impl Into<String>, color: Rgba, align: HAlign) -> Self {
        self.paints.push(Paint::Text(TextDraw { font, text: text.into(), color, align }));
        self
    }

    pub fn rect(mut self, width: u32, height: u32, color: Rgba) -> Self {
        self.paints.push(Paint::Shape(ShapeDraw {
            kind: ShapeKind::Rectangle,
            size: Size::new(width, height),
            color,
        }));
        self
    }

    pub fn shape(mut self, kind: ShapeKind, size: Size, color: Rgba) -> Self {
        self.paints.push(Paint::Shape(ShapeDraw { kind, size, color }));
        self
    }

    pub fn image(mut self, image: Icon, align: HAlign) -> Self {
        self.paints.push(Paint::Image(ImageDraw { image, align }));
        self
    }
}

/// Run `commands` in order against `canvas`, starting the cursor at (0, 0).
///
/// Returns the final cursor. Stops at the first paint failure.
pub fn execute<C: Canvas + ?Sized>(canvas: &mut C, commands: &[DrawCommand]) -> Result<Point, RenderError> {
    commands.iter().try_fold(Point::zero(), |cursor, cmd| step(canvas, cursor, cmd))
}

/// Apply one command: move first, then paint every payload at the new cursor.
pub fn step<C: Canvas + ?Sized>(canvas: &mut C, cursor: Point, cmd: &DrawCommand) -> Result<Point, RenderError> {
    let at = cmd.cursor.apply(cursor);
    for paint in &cmd.paints {
        match paint {
            Paint::Text(t) => draw_text(canvas, at, t)?,
            Paint::Shape(s) => draw_shape(canvas, at, s)?,
            Paint::Image(i) => {
                let x = i.align.origin_x(at.x, i.image.width());
                canvas.draw_image(&i.image, Point::new(x, at.y))?;
            }
        }
    }
    Ok(at)
}

fn draw_text<C: Canvas + ?Sized>(canvas: &mut C, at: Point, t: &TextDraw) -> Result<(), RenderError> {
    let Some(font) = t.font else {
        trace!("text {:?} has no font, skipped", t.text);
        return Ok(());
    };
    let width = canvas.measure_text(font, &t.text);
    let origin = Point::new(t.align.origin_x(at.x, width), at.y);
    canvas.draw_text(font, &t.text, origin + SHADOW_OFFSET, Palette::SHADOW)?;
    canvas.draw_text(font, &t.text, origin, t.color)
}

fn draw_shape<C: Canvas + ?Sized>(canvas: &mut C, at: Point, s: &ShapeDraw) -> Result<(), RenderError> {
    match &s.kind {
        ShapeKind::Rectangle => canvas.fill_rect(Rectangle::new(at, s.size), s.color),
        ShapeKind::Unsupported(name) => {
            trace!("shape {name:?} not supported, skipped");
            Ok(())
        }
    }
}
