/*
 *  display/error.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the render path
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

use thiserror::Error;

/// Unified error type for drawing, sequencing and encoding
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface allocation failed (zero or oversized dimensions)
    #[error("Surface allocation failed: {width}x{height}")]
    SurfaceAllocation { width: u32, height: u32 },

    /// An image payload could not be composited
    #[error("Image draw failed: {0}")]
    ImageDraw(String),

    /// Frame dimensions disagree with the sink configuration
    #[error("Frame size mismatch: expected {expected:?}, got {actual:?}")]
    FrameSizeMismatch { expected: (u32, u32), actual: (u32, u32) },

    /// Sink used out of order (push before begin, push after end, ...)
    #[error("Frame sink error: {0}")]
    Sink(String),

    /// Encoder failure
    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),
}

impl RenderError {
    pub fn sink(msg: impl Into<String>) -> Self {
        RenderError::Sink(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = RenderError::SurfaceAllocation { width: 0, height: 575 };
        assert_eq!(e.to_string(), "Surface allocation failed: 0x575");
        assert!(RenderError::sink("late push").to_string().starts_with("Frame sink error:"));
    }

    #[test]
    fn test_size_mismatch_message() {
        let e = RenderError::FrameSizeMismatch { expected: (975, 575), actual: (10, 10) };
        assert!(e.to_string().contains("(975, 575)"));
    }
}
