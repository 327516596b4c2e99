/*
 *  display/recorder.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording canvas for testing without pixels
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

use std::sync::{Arc, Mutex};

use crate::display::color::Rgba;
use crate::display::error::RenderError;
use crate::display::font::FontId;
use crate::display::icon::Icon;
use crate::display::traits::Canvas;

/// One recorded paint call
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text { font: FontId, text: String, origin: Point, color: Rgba },
    Rect { rect: Rectangle, color: Rgba },
    Image { origin: Point, width: u32 },
}

/// Counters shared by a recorder and all of its clones
#[derive(Debug, Default)]
pub struct RecorderStats {
    pub text_calls: usize,
    pub rect_calls: usize,
    pub image_calls: usize,
}

/// Canvas that records paint calls instead of rasterising them
///
/// This is useful for:
/// - Unit tests of the interpreter and layout
/// - Checking how often the sequencer paints the static layer
///
/// Text is measured as `char_width` per character of the widest line.
/// Cloning copies the recorded ops (like a surface copies pixels) but shares
/// [`RecorderStats`], so totals across all frames stay observable.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    char_width: u32,
    ops: Vec<Op>,
    fail_images: bool,
    stats: Arc<Mutex<RecorderStats>>,
}

impl RecordingCanvas {
    pub fn new(char_width: u32) -> Self {
        Self {
            char_width,
            ops: Vec::new(),
            fail_images: false,
            stats: Arc::new(Mutex::new(RecorderStats::default())),
        }
    }

    /// Snapshot of ops recorded on this canvas
    pub fn ops(&self) -> Vec<Op> {
        self.ops.clone()
    }

    /// Text runs recorded, fill passes only (shadow passes dropped)
    pub fn fill_texts(&self) -> Vec<(String, Point, Rgba)> {
        let mut out = Vec::new();
        let mut shadow = true;
        for op in &self.ops {
            if let Op::Text { text, origin, color, .. } = op {
                if !shadow {
                    out.push((text.clone(), *origin, *color));
                }
                shadow = !shadow;
            }
        }
        out
    }

    /// Run `f` against the shared counters
    pub fn with_stats<R>(&self, f: impl FnOnce(&RecorderStats) -> R) -> R {
        match self.stats.lock() {
            Ok(stats) => f(&stats),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Make every `draw_image` fail
    pub fn simulate_image_failure(&mut self, fail: bool) {
        self.fail_images = fail;
    }

    fn bump(&self, f: impl FnOnce(&mut RecorderStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn measure_text(&self, _font: FontId, text: &str) -> u32 {
        text.split('\n').map(|l| l.chars().count() as u32).max().unwrap_or(0) * self.char_width
    }

    fn draw_text(&mut self, font: FontId, text: &str, origin: Point, color: Rgba) -> Result<(), RenderError> {
        self.bump(|s| s.text_calls += 1);
        self.ops.push(Op::Text { font, text: text.to_string(), origin, color });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgba) -> Result<(), RenderError> {
        self.bump(|s| s.rect_calls += 1);
        self.ops.push(Op::Rect { rect, color });
        Ok(())
    }

    fn draw_image(&mut self, image: &Icon, origin: Point) -> Result<(), RenderError> {
        if self.fail_images {
            return Err(RenderError::ImageDraw(format!("simulated failure for {image:?}")));
        }
        self.bump(|s| s.image_calls += 1);
        self.ops.push(Op::Image { origin, width: image.width() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::Palette;

    #[test]
    fn test_measure_widest_line() {
        let c = RecordingCanvas::new(10);
        assert_eq!(c.measure_text(FontId::Medium, "Partly\nCloudy!"), 70);
        assert_eq!(c.measure_text(FontId::Medium, ""), 0);
    }

    #[test]
    fn test_clones_copy_ops_share_stats() {
        let mut a = RecordingCanvas::new(10);
        a.fill_rect(Rectangle::new(Point::zero(), Size::new(1, 1)), Palette::RED).unwrap();
        let mut b = a.clone();
        b.fill_rect(Rectangle::new(Point::zero(), Size::new(2, 2)), Palette::RED).unwrap();
        assert_eq!(a.ops().len(), 1);
        assert_eq!(b.ops().len(), 2);
        assert_eq!(a.with_stats(|s| s.rect_calls), 2);
    }

    #[test]
    fn test_fill_texts_drops_shadows() {
        let mut c = RecordingCanvas::new(10);
        c.draw_text(FontId::Small, "x", Point::new(2, 2), Palette::SHADOW).unwrap();
        c.draw_text(FontId::Small, "x", Point::zero(), Palette::WHITE).unwrap();
        assert_eq!(c.fill_texts(), vec![("x".to_string(), Point::zero(), Palette::WHITE)]);
    }
}
