/*
 *  assets.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Asset registry: fonts, background art and per-condition icon frames
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

use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::ICON_FRAMES;
use crate::display::font::FontBook;
use crate::display::icon::Icon;
use crate::svgimage::{SvgImageError, SvgImageRenderer};

/// Condition used when a forecast names one we have no icons for
pub const DEFAULT_CONDITION: &str = "clear-day";

/// Conditions the board ships icons for
pub const KNOWN_CONDITIONS: [&str; 10] = [
    "clear-day",
    "clear-night",
    "cloudy",
    "fog",
    "partly-cloudy-day",
    "partly-cloudy-night",
    "rain",
    "sleet",
    "snow",
    "wind",
];

/// One condition's animation, always [`ICON_FRAMES`] long
pub type IconSequence = [Icon; ICON_FRAMES];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Image decode error on {path}: {source}")]
    Decode { path: PathBuf, source: image::ImageError },
    #[error("SVG error on {path}: {source}")]
    Svg { path: PathBuf, source: SvgImageError },
    #[error("Condition {0:?} has no frame 0")]
    MissingFrame(String),
    #[error("Default condition {0:?} is not registered")]
    MissingDefault(String),
}

/// Process-wide, read-only art and fonts
///
/// Built once at startup; every render borrows it.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    fonts: FontBook,
    background: Icon,
    icons: HashMap<String, IconSequence>,
    fallback: IconSequence,
}

impl AssetRegistry {
    /// Load `background.png` and every known condition from `dir`.
    ///
    /// Frame 0 of each condition is required; later frames that are missing repeat the
    /// previous one, so still icons become six identical frames.
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        info!("Loading assets from {}", dir.display());
        let background = load_image(&dir.join("background.png"))?;

        let mut icons = HashMap::new();
        for condition in KNOWN_CONDITIONS {
            let seq = load_sequence(&dir.join(condition), condition)?;
            icons.insert(condition.to_string(), seq);
        }
        let registry = Self::from_parts(background, icons)?;
        info!("Assets ready: {} conditions", registry.icons.len());
        Ok(registry)
    }

    /// Assemble a registry from already decoded images.
    pub fn from_parts(background: Icon, icons: HashMap<String, IconSequence>) -> Result<Self, AssetError> {
        let fallback = icons
            .get(DEFAULT_CONDITION)
            .cloned()
            .ok_or_else(|| AssetError::MissingDefault(DEFAULT_CONDITION.to_string()))?;
        Ok(Self { fonts: FontBook::default(), background, icons, fallback })
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn background(&self) -> &Icon {
        &self.background
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.icons.contains_key(condition)
    }

    /// Icon frames for `condition`, or the default condition's frames if unknown.
    pub fn resolve_icon(&self, condition: &str) -> &IconSequence {
        self.icons.get(condition).unwrap_or(&self.fallback)
    }
}

/// Repeat a single still image across every frame slot
pub fn still_sequence(icon: Icon) -> IconSequence {
    std::array::from_fn(|_| icon.clone())
}

fn load_sequence(dir: &Path, condition: &str) -> Result<IconSequence, AssetError> {
    let first = find_frame(dir, 0).ok_or_else(|| AssetError::MissingFrame(condition.to_string()))?;
    let mut frames: Vec<Icon> = vec![load_image(&first)?];
    for i in 1..ICON_FRAMES {
        let frame = match find_frame(dir, i) {
            Some(path) => load_image(&path)?,
            None => {
                debug!("{condition}: frame {i} missing, repeating frame {}", i - 1);
                frames[i - 1].clone()
            }
        };
        frames.push(frame);
    }
    debug!("{condition}: {} frames", frames.len());
    frames
        .try_into()
        .map_err(|_| AssetError::MissingFrame(condition.to_string()))
}

fn find_frame(dir: &Path, index: usize) -> Option<PathBuf> {
    ["png", "svg"]
        .iter()
        .map(|ext| dir.join(format!("{index}.{ext}")))
        .find(|p| p.is_file())
}

fn load_image(path: &Path) -> Result<Icon, AssetError> {
    let bytes = fs::read(path).map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg")) {
        let pixmap = SvgImageRenderer::new(&bytes)
            .and_then(|svg| svg.render_native())
            .map_err(|source| AssetError::Svg { path: path.to_path_buf(), source })?;
        Ok(Icon::from_pixmap(pixmap))
    } else {
        Icon::decode(&bytes).map_err(|source| AssetError::Decode { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::Rgba;

    fn solid(c: u8) -> Icon {
        Icon::solid(4, 4, Rgba::rgb(c, c, c)).unwrap()
    }

    fn registry() -> AssetRegistry {
        let mut icons = HashMap::new();
        icons.insert(DEFAULT_CONDITION.to_string(), std::array::from_fn(|i| solid(i as u8)));
        icons.insert("rain".to_string(), still_sequence(solid(200)));
        AssetRegistry::from_parts(solid(9), icons).unwrap()
    }

    #[test]
    fn test_resolve_known_condition() {
        let r = registry();
        let rain = r.resolve_icon("rain");
        assert!(rain[0].same_as(&rain[5]));
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        let r = registry();
        let fallback = r.resolve_icon("not-a-real-condition");
        let default = r.resolve_icon(DEFAULT_CONDITION);
        for f in 0..ICON_FRAMES {
            assert!(fallback[f].same_as(&default[f]));
        }
        assert!(!r.has_condition("not-a-real-condition"));
    }

    #[test]
    fn test_from_parts_requires_default() {
        let mut icons = HashMap::new();
        icons.insert("rain".to_string(), still_sequence(solid(1)));
        assert!(matches!(
            AssetRegistry::from_parts(solid(0), icons),
            Err(AssetError::MissingDefault(_))
        ));
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = std::env::temp_dir().join("retrocast-assets-definitely-missing");
        assert!(matches!(AssetRegistry::load(&dir), Err(AssetError::Io { .. })));
    }

    #[test]
    fn test_missing_frames_repeat_previous() {
        let dir = std::env::temp_dir().join(format!("retrocast-assets-{}-repeat", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for (f, shade) in [(0, 10u8), (2, 90u8)] {
            image::RgbaImage::from_pixel(3, 3, image::Rgba([shade, shade, shade, 255]))
                .save(dir.join(format!("{f}.png")))
                .unwrap();
        }
        let seq = load_sequence(&dir, "rain").unwrap();
        assert!(seq[1].same_as(&seq[0]));
        assert!(!seq[2].same_as(&seq[1]));
        assert!((3..ICON_FRAMES).all(|f| seq[f].same_as(&seq[2])));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_sequence_without_first_frame() {
        let dir = std::env::temp_dir().join(format!("retrocast-assets-{}-empty", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert!(matches!(load_sequence(&dir, "fog"), Err(AssetError::MissingFrame(c)) if c == "fog"));
        let _ = fs::remove_dir_all(dir);
    }
}
