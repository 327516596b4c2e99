/*
 *  display/mod.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - raster surface, fonts, palette and board geometry
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod color;

// Paint resources
pub mod font;
pub mod icon;

// Layout system for the board
pub mod layout;

// Targets: real pixels, and a recorder for tests
pub mod surface;
pub mod recorder;

// Re-exports for convenience
pub use traits::Canvas;
pub use error::RenderError;
pub use color::{Palette, Rgba};
pub use font::{BoardFont, FontBook, FontId};
pub use icon::Icon;
pub use layout::BoardLayout;
pub use surface::Surface;
pub use recorder::RecordingCanvas;
