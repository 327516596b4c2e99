/*
 *  sequencer.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame sequencer: one static layer, six animated overlays
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

//! The static layer (background, header, clock, ticker) is painted once. Each animation
//! frame starts from a copy of it and overlays the day-cards with that frame's icons.

use log::debug;

use crate::BoardOptions;
use crate::assets::AssetRegistry;
use crate::board::Composer;
use crate::constants::{ICON_FRAMES, MAX_DAY_CARDS};
use crate::display::error::RenderError;
use crate::display::surface::Surface;
use crate::display::traits::Canvas;
use crate::draw::execute;
use crate::func_timer::FunctionTimer;
use crate::weather::WeatherReport;

/// Day-cards actually drawn for `report` under `options`
pub fn card_count(report: &WeatherReport, options: &BoardOptions) -> usize {
    report.forecast.len().min(options.days).min(MAX_DAY_CARDS)
}

/// Paint the static layer onto `base`, then build [`ICON_FRAMES`] copies with day overlays.
///
/// `base` must be blank; each returned canvas is an independent copy.
pub fn render_frames<C: Canvas + Clone>(
    mut base: C,
    composer: &Composer<'_>,
    report: &WeatherReport,
    cards: usize,
) -> Result<Vec<C>, RenderError> {
    execute(&mut base, &composer.static_commands(report))?;

    let mut frames = Vec::with_capacity(ICON_FRAMES);
    for frame in 0..ICON_FRAMES {
        let mut canvas = base.clone();
        for day in 0..cards {
            execute(&mut canvas, &composer.day_commands(report, day, frame))?;
        }
        debug!("Frame {frame} composed with {cards} day-cards");
        frames.push(canvas);
    }
    Ok(frames)
}

/// Render the full animation onto board-sized surfaces.
pub fn render_animation(
    registry: &AssetRegistry,
    report: &WeatherReport,
    options: &BoardOptions,
) -> Result<Vec<Surface>, RenderError> {
    let _timer = FunctionTimer::new("render_animation");
    let composer = Composer::new(registry, options.classic);
    let layout = composer.layout();
    let base = Surface::new(layout.width, layout.height, *registry.fonts())?;
    render_frames(base, &composer, report, card_count(report, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{still_sequence, DEFAULT_CONDITION};
    use crate::display::color::Palette;
    use crate::display::icon::Icon;
    use crate::display::recorder::{Op, RecordingCanvas};
    use crate::weather::{DayForecast, TempUnit};
    use chrono::{DateTime, NaiveDate};
    use std::collections::HashMap;

    fn registry() -> AssetRegistry {
        let mut icons = HashMap::new();
        icons.insert(
            DEFAULT_CONDITION.to_string(),
            std::array::from_fn(|i| Icon::solid(10 + i as u32, 10, Palette::YELLOW).unwrap()),
        );
        icons.insert("rain".to_string(), still_sequence(Icon::solid(40, 40, Palette::BLUE).unwrap()));
        AssetRegistry::from_parts(Icon::solid(975, 575, Palette::DARK_BLUE).unwrap(), icons).unwrap()
    }

    fn report(days: usize) -> WeatherReport {
        let conditions = ["rain", "partly-cloudy-day", "cloudy", "rain"];
        WeatherReport {
            address: "Lake Hopatcong 07849, NJ".into(),
            unit: TempUnit::F,
            temperature: 75,
            feels_like: 76,
            humidity: Some(60),
            alert: None,
            captured_at: DateTime::parse_from_rfc3339("2019-07-31T10:00:00-04:00").unwrap(),
            forecast: (0..days)
                .map(|d| {
                    let date = NaiveDate::from_ymd_opt(2019, 7, 31).unwrap() + chrono::Days::new(d as u64);
                    DayForecast::new(date, conditions[d % 4], 64, 80)
                })
                .collect(),
        }
    }

    #[test]
    fn test_always_six_frames() {
        let reg = registry();
        let composer = Composer::new(&reg, false);
        for days in 0..=4 {
            let frames = render_frames(RecordingCanvas::new(10), &composer, &report(days), days).unwrap();
            assert_eq!(frames.len(), ICON_FRAMES, "{days} days");
        }
    }

    #[test]
    fn test_static_layer_painted_once() {
        let reg = registry();
        let composer = Composer::new(&reg, false);
        let base = RecordingCanvas::new(10);
        let frames = render_frames(base.clone(), &composer, &report(4), 4).unwrap();
        // one background, one footer band
        assert_eq!(base.with_stats(|s| s.rect_calls), 1);
        // background once, plus one icon per card per frame
        assert_eq!(base.with_stats(|s| s.image_calls), 1 + 4 * ICON_FRAMES);
        for f in &frames {
            let rects = f.ops().iter().filter(|op| matches!(op, Op::Rect { .. })).count();
            assert_eq!(rects, 1);
        }
    }

    #[test]
    fn test_frames_vary_only_in_icons() {
        let reg = registry();
        let composer = Composer::new(&reg, false);
        let frames = render_frames(RecordingCanvas::new(10), &composer, &report(2), 2).unwrap();
        let widths = |c: &RecordingCanvas| -> Vec<u32> {
            c.ops()
                .iter()
                .filter_map(|op| match op {
                    Op::Image { width, .. } => Some(*width),
                    _ => None,
                })
                .collect()
        };
        // day 1 is partly-cloudy-day, not registered, so it animates through the default frames
        assert_eq!(widths(&frames[0]), vec![975, 40, 10]);
        assert_eq!(widths(&frames[5]), vec![975, 40, 15]);
        assert_eq!(frames[0].fill_texts(), frames[3].fill_texts());
    }

    #[test]
    fn test_card_count_caps() {
        let mut opts = BoardOptions::default();
        assert_eq!(card_count(&report(6), &opts), 4);
        opts.days = 2;
        assert_eq!(card_count(&report(4), &opts), 2);
        assert_eq!(card_count(&report(1), &opts), 1);
    }

    #[test]
    fn test_long_forecast_draws_four_cards() {
        let reg = registry();
        let composer = Composer::new(&reg, false);
        let long = report(5);
        let base = RecordingCanvas::new(10);
        let cards = card_count(&long, &BoardOptions::default());
        render_frames(base.clone(), &composer, &long, cards).unwrap();
        assert_eq!(base.with_stats(|s| s.image_calls), 1 + 4 * ICON_FRAMES);
    }

    #[test]
    fn test_surface_frames_are_deterministic() {
        let reg = registry();
        let opts = BoardOptions::default();
        let a = render_animation(&reg, &report(4), &opts).unwrap();
        let b = render_animation(&reg, &report(4), &opts).unwrap();
        assert_eq!(a.len(), ICON_FRAMES);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.as_bytes(), y.as_bytes());
        }
        assert_eq!((a[0].width(), a[0].height()), (975, 575));
    }

    #[test]
    fn test_surface_footer_color() {
        let reg = registry();
        let opts = BoardOptions::default();
        let frames = render_animation(&reg, &report(4), &opts).unwrap();
        assert_eq!(frames[0].pixel(970, 570), Some(Palette::NEUTRAL));

        let mut alert = report(4);
        alert.alert = Some("Severe Thunderstorm Watch".into());
        let frames = render_animation(&reg, &alert, &opts).unwrap();
        assert_eq!(frames[5].pixel(970, 570), Some(Palette::ALERT));
    }
}
