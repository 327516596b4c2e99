/*
 *  board.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Board composer: turns a weather report into draw commands
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

use log::debug;

use crate::assets::AssetRegistry;
use crate::constants::{CLOCK_FORMAT, DATE_FORMAT, WEEKDAY_FORMAT};
use crate::display::color::Palette;
use crate::display::font::{FontBook, FontId};
use crate::display::layout::BoardLayout;
use crate::draw::{DrawCommand, HAlign};
use crate::weather::WeatherReport;

const SUBTITLE: &str = "Extended Forecast";

/// Builds the static layer and per-frame day-card command lists for one board.
#[derive(Debug, Clone)]
pub struct Composer<'a> {
    registry: &'a AssetRegistry,
    layout: BoardLayout,
    classic: bool,
}

impl<'a> Composer<'a> {
    pub fn new(registry: &'a AssetRegistry, classic: bool) -> Self {
        Self { registry, layout: BoardLayout::default(), classic }
    }

    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Background, header, clock and footer ticker.
    pub fn static_commands(&self, report: &WeatherReport) -> Vec<DrawCommand> {
        let l = &self.layout;
        let address = if self.classic {
            report.address.clone()
        } else {
            fit_address(self.registry.fonts(), FontId::Medium, &report.address, l.header.max_width)
        };
        let footer_color = if report.alert.is_some() { Palette::ALERT } else { Palette::NEUTRAL };
        let sub = l.header.subtitle_offset;
        let date = l.clock.date_offset;

        vec![
            DrawCommand::at(0, 0).image(self.registry.background().clone(), HAlign::Left),
            DrawCommand::at(l.header.origin.x, l.header.origin.y).text(FontId::Medium, address),
            DrawCommand::rel(sub.x, sub.y).text_styled(Some(FontId::Medium), SUBTITLE, Palette::ACCENT, HAlign::Left),
            DrawCommand::at(l.clock.origin.x, l.clock.origin.y)
                .text(FontId::Small, report.captured_at.format(CLOCK_FORMAT).to_string()),
            DrawCommand::rel(date.x, date.y).text(FontId::Small, report.captured_at.format(DATE_FORMAT).to_string()),
            DrawCommand::at(l.footer.origin.x, l.footer.origin.y).rect(
                l.footer.size.width,
                l.footer.size.height,
                footer_color,
            ),
            DrawCommand::at(l.footer.ticker.x, l.footer.ticker.y).text(FontId::Medium, ticker_text(report, self.classic)),
        ]
    }

    /// Card `day` of the report showing icon frame `frame`; empty past the end of the forecast.
    pub fn day_commands(&self, report: &WeatherReport, day: usize, frame: usize) -> Vec<DrawCommand> {
        let Some(forecast) = report.forecast.get(day) else {
            return Vec::new();
        };
        let c = &self.layout.day_card;
        let anchor = c.anchor(day);
        let icons = self.registry.resolve_icon(&forecast.condition);
        let icon = icons[frame % icons.len()].clone();
        let weekday = forecast.date.format(WEEKDAY_FORMAT).to_string().to_uppercase();

        vec![
            DrawCommand::at(anchor.x, anchor.y),
            DrawCommand::rel(c.label_offset.x, c.label_offset.y)
                .text_styled(Some(FontId::Medium), weekday, Palette::ACCENT, HAlign::Center),
            DrawCommand::rel(c.icon_offset.x, c.icon_offset.y).image(icon, HAlign::Center),
            DrawCommand::rel(c.summary_offset.x, c.summary_offset.y).text_styled(
                Some(FontId::Medium),
                forecast.summary.clone(),
                Palette::PRIMARY,
                HAlign::Center,
            ),
            DrawCommand::rel(c.lo_offset.x, c.lo_offset.y)
                .text_styled(Some(FontId::Medium), "Lo", Palette::LO_LABEL, HAlign::Center),
            DrawCommand::rel(c.value_offset.x, c.value_offset.y)
                .text_styled(Some(FontId::Large), forecast.lo.to_string(), Palette::PRIMARY, HAlign::Center),
            DrawCommand::rel(c.hi_offset.x, c.hi_offset.y)
                .text_styled(Some(FontId::Medium), "Hi", Palette::ACCENT, HAlign::Center),
            DrawCommand::rel(c.value_offset.x, c.value_offset.y)
                .text_styled(Some(FontId::Large), forecast.hi.to_string(), Palette::PRIMARY, HAlign::Center),
        ]
    }
}

/// Footer ticker: alert on its own line, then current conditions.
pub fn ticker_text(report: &WeatherReport, classic: bool) -> String {
    let mut text = String::new();
    if let Some(alert) = &report.alert {
        text.push_str(alert);
        text.push('\n');
    }
    let unit = report.unit;
    text.push_str(&format!("Temp: {}°{unit}   Feels Like: {}°{unit}", report.temperature, report.feels_like));
    if !classic {
        if let Some(humidity) = report.humidity {
            text.push_str(&format!("   Humidity: {humidity}%"));
        }
    }
    text
}

/// Shorten `address` until it fits `max_width` in `font`.
///
/// Cuts at the last comma while one remains, then drops trailing characters.
/// The result is always a prefix of `address`; empty only if nothing fits.
pub fn fit_address(fonts: &FontBook, font: FontId, address: &str, max_width: u32) -> String {
    let mut text = address.to_string();
    while !text.is_empty() && fonts.measure(font, &text) > max_width {
        match text.rfind(',') {
            Some(cut) => text.truncate(cut),
            None => {
                text.pop();
            }
        }
    }
    if text.len() != address.len() {
        debug!("Address {address:?} truncated to {text:?}");
    }
    text
}
