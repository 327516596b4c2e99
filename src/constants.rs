/*
 *  constants.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Board-wide constants
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

//! This module contains global constants used across the board and the encoder.

/// The total width of the board in pixels.
pub const BOARD_WIDTH: u32 = 975;
/// The total height of the board in pixels.
pub const BOARD_HEIGHT: u32 = 575;

/// Frames in every icon animation, and so frames in every board.
pub const ICON_FRAMES: usize = 6;

/// Maximum number of day-cards the board has room for.
pub const MAX_DAY_CARDS: usize = 4;

/// Default per-frame delay in milliseconds.
pub const DEFAULT_FRAME_DELAY_MS: u16 = 100;
/// Shortest and longest frame delays accepted from configuration.
pub const MIN_FRAME_DELAY_MS: u16 = 20;
pub const MAX_FRAME_DELAY_MS: u16 = 1000;

/// Clock and date formats (chrono strftime).
pub const CLOCK_FORMAT: &str = "%-I:%M:%S %p";
pub const DATE_FORMAT: &str = "%a %b %-d";
/// Day-card heading, upper-cased after formatting.
pub const WEEKDAY_FORMAT: &str = "%a";
