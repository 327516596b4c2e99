/*
 *  lib.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Animated retro weather board renderer
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

//! RetroCast paints a weather-channel style forecast board and encodes it as a looping GIF.
//!
//! The pipeline is report → [`board::Composer`] (draw commands) → [`draw::execute`]
//! (pixels) → [`sequencer`] (six frames sharing one static layer) → [`encode`] (GIF bytes).

use log::info;
use thiserror::Error;

pub mod assets;
pub mod board;
pub mod config;
pub mod constants;
pub mod display;
pub mod draw;
pub mod encode;
pub mod func_timer;
pub mod geoloc;
pub mod sequencer;
pub mod svgimage;
pub mod weather;

pub use assets::{AssetError, AssetRegistry};
pub use display::RenderError;
pub use weather::{DayForecast, TempUnit, WeatherApiError, WeatherClient, WeatherReport};

use crate::constants::{DEFAULT_FRAME_DELAY_MS, MAX_DAY_CARDS};

/// Per-render knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    /// Day-cards to draw, at most four
    pub days: usize,
    pub frame_delay_ms: u16,
    /// GIF loop count, 0 loops forever
    pub repeat: u16,
    /// Minimal board: no address truncation, no humidity
    pub classic: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            days: MAX_DAY_CARDS,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            repeat: 0,
            classic: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Weather(#[from] WeatherApiError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Render a ready-made report to GIF bytes.
///
/// Draws at most `options.days` day-cards and never more than four; forecast days
/// beyond that are ignored.
pub fn render(registry: &AssetRegistry, report: &WeatherReport, options: &BoardOptions) -> Result<Vec<u8>, RenderError> {
    let frames = sequencer::render_animation(registry, report, options)?;
    let bytes = encode::encode_gif(&frames, options.frame_delay_ms, options.repeat)?;
    info!("Board rendered for {}: {} frames, {} bytes", report.address, frames.len(), bytes.len());
    Ok(bytes)
}

/// Fetch the forecast for `location` and render it, in Fahrenheit.
///
/// An empty `location` uses IP geolocation.
pub async fn get_weather(
    location: &str,
    api_key: &str,
    registry: &AssetRegistry,
    options: &BoardOptions,
) -> Result<Vec<u8>, BoardError> {
    let client = WeatherClient::new(api_key, TempUnit::F)?;
    get_weather_with(&client, location, registry, options).await
}

/// As [`get_weather`], with a caller-configured client (units, base URL).
pub async fn get_weather_with(
    client: &WeatherClient,
    location: &str,
    registry: &AssetRegistry,
    options: &BoardOptions,
) -> Result<Vec<u8>, BoardError> {
    let report = client.fetch_report(location, options.days).await?;
    Ok(render(registry, &report, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_wraps_sources() {
        let e: BoardError = RenderError::sink("boom").into();
        assert_eq!(e.to_string(), "Frame sink error: boom");
        let e: BoardError = AssetError::MissingDefault("clear-day".into()).into();
        assert!(matches!(e, BoardError::Asset(_)));
    }

    #[tokio::test]
    async fn test_get_weather_requires_key() {
        let registry = AssetRegistry::from_parts(
            display::Icon::solid(1, 1, display::Palette::BLACK).unwrap(),
            [(assets::DEFAULT_CONDITION.to_string(), assets::still_sequence(display::Icon::solid(1, 1, display::Palette::WHITE).unwrap()))]
                .into_iter()
                .collect(),
        )
        .unwrap();
        let result = get_weather("07849", "  ", &registry, &BoardOptions::default()).await;
        assert!(matches!(result, Err(BoardError::Weather(WeatherApiError::ApiKeyError(_)))));
    }
}
