/*
 *  svgimage.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  SVG icon rasterisation
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

//! Renders SVG icons to RGBA pixmaps.
//!
//! This module uses `usvg` (through resvg's re-export) for parsing and `resvg` for rendering.

use resvg::{
    render,
    usvg::{Options as ResvgUsvgOptions, Transform, Tree as ResvgTree},
};
use tiny_skia::Pixmap;
use log::debug;
use thiserror::Error;

/// Errors from SVG rendering.
#[derive(Debug, Error)]
pub enum SvgImageError {
    /// Error parsing the SVG data.
    #[error("SVG parse error: {0}")]
    SvgParseError(String),
    /// Error creating a pixmap for rendering.
    #[error("Pixmap creation error: {0}")]
    PixmapCreationError(String),
}

/// Parsed SVG, ready to rasterise at any size
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: ResvgTree,
}

impl SvgImageRenderer {
    pub fn new(svg_data: &[u8]) -> Result<Self, SvgImageError> {
        let usvg_options = ResvgUsvgOptions::default();
        let tree = ResvgTree::from_data(svg_data, &usvg_options)
            .map_err(|e| SvgImageError::SvgParseError(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(Self { tree })
    }

    /// Intrinsic size, rounded up to whole pixels
    pub fn size(&self) -> (u32, u32) {
        let s = self.tree.size();
        (s.width().ceil() as u32, s.height().ceil() as u32)
    }

    /// Render scaled to `width` x `height`
    pub fn render(&self, width: u32, height: u32) -> Result<Pixmap, SvgImageError> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SvgImageError::PixmapCreationError(format!("{width}x{height}")))?;

        let svg_size = self.tree.size();
        let transform = Transform::from_scale(
            width as f32 / svg_size.width(),
            height as f32 / svg_size.height(),
        );
        render(&self.tree, transform, &mut pixmap.as_mut());

        debug!("SVG rendered at {width}x{height}");
        Ok(pixmap)
    }

    /// Render at intrinsic size
    pub fn render_native(&self) -> Result<Pixmap, SvgImageError> {
        let (w, h) = self.size();
        self.render(w, h)
    }
}
