/*
 *  display/icon.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Shared, already-decoded image handles
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

use std::fmt;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::display::color::Rgba;

/// Immutable, cheaply clonable image (premultiplied RGBA)
#[derive(Clone)]
pub struct Icon {
    pixmap: Arc<Pixmap>,
}

impl Icon {
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap: Arc::new(pixmap) }
    }

    /// Decode PNG (or any format the `image` crate was built with)
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::DimensionError,
            ))
        })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = Rgba::new(r, g, b, a).to_premultiplied();
        }
        Ok(Self::from_pixmap(pixmap))
    }

    /// Flat block of color, handy for fixtures and placeholders in tests
    pub fn solid(width: u32, height: u32, color: Rgba) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(color.to_skia());
        Some(Self::from_pixmap(pixmap))
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// True when both handles point at the same decoded image
    pub fn same_as(&self, other: &Icon) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icon({}x{})", self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png_premultiplies() {
        let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let icon = Icon::decode(&buf).unwrap();
        assert_eq!((icon.width(), icon.height()), (1, 1));
        let p = icon.pixmap().pixels()[0];
        assert_eq!(p.alpha(), 128);
        assert!(p.red() <= 100 && p.red() >= 49);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(Icon::decode(b"not a png").is_err());
    }

    #[test]
    fn test_solid_and_identity() {
        let a = Icon::solid(4, 3, Rgba::rgb(1, 2, 3)).unwrap();
        let b = a.clone();
        let c = Icon::solid(4, 3, Rgba::rgb(1, 2, 3)).unwrap();
        assert_eq!((a.width(), a.height()), (4, 3));
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert!(Icon::solid(0, 3, Rgba::rgb(0, 0, 0)).is_none());
    }
}
