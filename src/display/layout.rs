/*
 *  display/layout.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Board geometry: where every region of the weather board sits
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

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};

/// Layout configuration for the weather board
///
/// Positions are surface pixels. Offsets are relative moves applied to the
/// drawing cursor, in the order the composer emits them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    /// Board width in pixels
    pub width: u32,

    /// Board height in pixels
    pub height: u32,

    /// Address and subtitle
    pub header: HeaderLayout,

    /// Time and date, top right
    pub clock: ClockLayout,

    /// Ticker band along the bottom
    pub footer: FooterLayout,

    /// Forecast day-cards
    pub day_card: DayCardLayout,
}

/// Address header configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    /// Address baseline start
    pub origin: Point,

    /// Width the address is truncated to, stopping short of the clock
    pub max_width: u32,

    /// Move from the address to the "Extended Forecast" line
    pub subtitle_offset: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockLayout {
    pub origin: Point,
    pub date_offset: Point,
}

/// Footer band and ticker text
#[derive(Debug, Clone, PartialEq)]
pub struct FooterLayout {
    /// Top-left of the colored band
    pub origin: Point,

    /// Band size, full board width
    pub size: Size,

    /// Ticker first baseline
    pub ticker: Point,
}

/// Day-card layout
///
/// Card `d` is anchored at `(first_x + pitch * d, top)`; everything else in the
/// card is a relative move from the previous element.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCardLayout {
    pub first_x: i32,
    pub top: i32,
    pub pitch: i32,

    /// Anchor to weekday label (card centre line)
    pub label_offset: Point,

    /// Weekday label to icon top
    pub icon_offset: Point,

    /// Icon top to summary baseline
    pub summary_offset: Point,

    /// Summary to the "Lo" label
    pub lo_offset: Point,

    /// Label to its temperature value, used for both Lo and Hi
    pub value_offset: Point,

    /// Lo value to the "Hi" label, back up to the label band
    pub hi_offset: Point,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            header: HeaderLayout {
                origin: Point::new(150, 34),
                max_width: 530,
                subtitle_offset: Point::new(0, 36),
            },
            clock: ClockLayout {
                origin: Point::new(695, 45),
                date_offset: Point::new(0, 25),
            },
            footer: FooterLayout {
                origin: Point::new(0, 479),
                size: Size::new(BOARD_WIDTH, 96),
                ticker: Point::new(5, 510),
            },
            day_card: DayCardLayout {
                first_x: 15,
                top: 90,
                pitch: 244,
                label_offset: Point::new(100, 40),
                icon_offset: Point::new(0, 15),
                summary_offset: Point::new(0, 165),
                lo_offset: Point::new(-50, 90),
                value_offset: Point::new(0, 45),
                hi_offset: Point::new(100, -45),
            },
        }
    }
}

impl DayCardLayout {
    /// Top-left anchor of card `index`
    pub fn anchor(&self, index: usize) -> Point {
        Point::new(self.first_x + self.pitch * index as i32, self.top)
    }
}
