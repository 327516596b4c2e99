/*
 *  encode.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame sinks: animated GIF output and an in-memory capture
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

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use log::{debug, info};

use crate::display::error::RenderError;
use crate::display::surface::Surface;

/// Configuration handed to a [`FrameSink`] before any frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Delay after each frame.
    pub delay_ms: u16,
    /// Loop count, 0 loops forever.
    pub repeat: u16,
}

/// Consumer of composed frames.
///
/// Ordering contract: `begin` once, `push_frame` with strictly increasing indices, `end` once.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> Result<(), RenderError>;
    fn push_frame(&mut self, index: usize, frame: &Surface) -> Result<(), RenderError>;
    fn end(&mut self) -> Result<(), RenderError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    #[default]
    Idle,
    Open,
    Done,
}

/// Tracks the begin/push/end contract for both sinks
#[derive(Debug, Default)]
struct Sequence {
    state: SinkState,
    cfg: Option<SinkConfig>,
    last: Option<usize>,
}

impl Sequence {
    fn begin(&mut self, cfg: SinkConfig) -> Result<(), RenderError> {
        if self.state == SinkState::Open {
            return Err(RenderError::sink("begin called twice"));
        }
        self.state = SinkState::Open;
        self.cfg = Some(cfg);
        self.last = None;
        Ok(())
    }

    fn push(&mut self, index: usize, frame: &Surface) -> Result<(), RenderError> {
        let cfg = match (self.state, self.cfg) {
            (SinkState::Open, Some(cfg)) => cfg,
            (SinkState::Done, _) => return Err(RenderError::sink("frame pushed after end")),
            _ => return Err(RenderError::sink("frame pushed before begin")),
        };
        if self.last.is_some_and(|last| index <= last) {
            return Err(RenderError::sink(format!("frame index {index} out of order")));
        }
        if (frame.width(), frame.height()) != (cfg.width, cfg.height) {
            return Err(RenderError::FrameSizeMismatch {
                expected: (cfg.width, cfg.height),
                actual: (frame.width(), frame.height()),
            });
        }
        self.last = Some(index);
        Ok(())
    }

    fn end(&mut self) -> Result<SinkConfig, RenderError> {
        match (self.state, self.cfg) {
            (SinkState::Open, Some(cfg)) => {
                self.state = SinkState::Done;
                Ok(cfg)
            }
            _ => Err(RenderError::sink("end without begin")),
        }
    }
}

/// Animated GIF sink; frames are buffered and encoded on `end`.
#[derive(Default)]
pub struct GifSink {
    seq: Sequence,
    frames: Vec<Frame>,
    bytes: Vec<u8>,
}

impl GifSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded payload, empty until `end` succeeds
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> Result<(), RenderError> {
        self.seq.begin(cfg)?;
        self.frames.clear();
        self.bytes.clear();
        debug!("GIF sink open: {}x{} @ {}ms", cfg.width, cfg.height, cfg.delay_ms);
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &Surface) -> Result<(), RenderError> {
        self.seq.push(index, frame)?;
        let delay_ms = self.seq.cfg.map_or(0, |c| c.delay_ms);
        let delay = Delay::from_numer_denom_ms(u32::from(delay_ms), 1);
        self.frames.push(Frame::from_parts(frame.to_rgba_image(), 0, 0, delay));
        Ok(())
    }

    fn end(&mut self) -> Result<(), RenderError> {
        let cfg = self.seq.end()?;
        let repeat = match cfg.repeat {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        };
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut out, 10);
            encoder.set_repeat(repeat)?;
            encoder.encode_frames(self.frames.drain(..))?;
        }
        info!("GIF encoded: {} bytes", out.len());
        self.bytes = out;
        Ok(())
    }
}

/// Keeps demultiplied copies of every frame for tests and demos
#[derive(Debug, Default)]
pub struct InMemorySink {
    seq: Sequence,
    frames: Vec<(usize, RgbaImage)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.seq.cfg
    }

    pub fn frames(&self) -> &[(usize, RgbaImage)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.seq.state == SinkState::Done
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> Result<(), RenderError> {
        self.seq.begin(cfg)?;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &Surface) -> Result<(), RenderError> {
        self.seq.push(index, frame)?;
        self.frames.push((index, frame.to_rgba_image()));
        Ok(())
    }

    fn end(&mut self) -> Result<(), RenderError> {
        self.seq.end().map(|_| ())
    }
}

/// Drive `sink` through a whole animation.
pub fn write_frames<S: FrameSink + ?Sized>(sink: &mut S, frames: &[Surface], delay_ms: u16, repeat: u16) -> Result<(), RenderError> {
    let Some(first) = frames.first() else {
        return Err(RenderError::sink("no frames to encode"));
    };
    sink.begin(SinkConfig { width: first.width(), height: first.height(), delay_ms, repeat })?;
    for (index, frame) in frames.iter().enumerate() {
        sink.push_frame(index, frame)?;
    }
    sink.end()
}

/// Encode `frames` as an animated GIF payload.
pub fn encode_gif(frames: &[Surface], delay_ms: u16, repeat: u16) -> Result<Vec<u8>, RenderError> {
    let mut sink = GifSink::new();
    write_frames(&mut sink, frames, delay_ms, repeat)?;
    Ok(sink.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::font::FontBook;
    use crate::display::traits::Canvas;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use std::io::Cursor;

    fn frame(shade: u8) -> Surface {
        let mut s = Surface::new(8, 6, FontBook::default()).unwrap();
        let color = crate::display::color::Rgba::rgb(shade, 0, 0);
        s.fill_rect(Rectangle::new(Point::zero(), Size::new(8, 6)), color).unwrap();
        s
    }

    fn cfg() -> SinkConfig {
        SinkConfig { width: 8, height: 6, delay_ms: 100, repeat: 0 }
    }

    #[test]
    fn test_gif_round_trip_frame_count() {
        let frames: Vec<Surface> = (0..6).map(|i| frame(i * 40)).collect();
        let bytes = encode_gif(&frames, 100, 0).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");

        let decoded = GifDecoder::new(Cursor::new(bytes)).unwrap().into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 6);
        assert_eq!(decoded[0].buffer().dimensions(), (8, 6));
        let (n, d) = decoded[0].delay().numer_denom_ms();
        assert_eq!(n / d, 100);
    }

    #[test]
    fn test_gif_loop_count() {
        let frames: Vec<Surface> = (0..2).map(|i| frame(i * 90)).collect();
        let loop_field = |repeat: u16| {
            let bytes = encode_gif(&frames, 100, repeat).unwrap();
            let tag = b"NETSCAPE2.0";
            let at = bytes.windows(tag.len()).position(|w| w == tag).unwrap() + tag.len();
            bytes[at..at + 4].to_vec()
        };
        // sub-block size 3, id 1, then little-endian loop count; 0 loops forever
        assert_eq!(loop_field(0), vec![3, 1, 0, 0]);
        assert_eq!(loop_field(3), vec![3, 1, 3, 0]);
    }

    #[test]
    fn test_push_before_begin_fails() {
        let mut sink = GifSink::new();
        assert!(matches!(sink.push_frame(0, &frame(0)), Err(RenderError::Sink(_))));
        assert!(matches!(sink.end(), Err(RenderError::Sink(_))));
    }

    #[test]
    fn test_push_after_end_fails() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(0, &frame(1)).unwrap();
        sink.end().unwrap();
        assert!(sink.is_finished());
        assert!(matches!(sink.push_frame(1, &frame(1)), Err(RenderError::Sink(_))));
    }

    #[test]
    fn test_indices_must_increase() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(3, &frame(1)).unwrap();
        assert!(matches!(sink.push_frame(3, &frame(1)), Err(RenderError::Sink(_))));
    }

    #[test]
    fn test_size_mismatch() {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig { width: 9, ..cfg() }).unwrap();
        assert!(matches!(sink.push_frame(0, &frame(1)), Err(RenderError::FrameSizeMismatch { .. })));
    }

    #[test]
    fn test_in_memory_keeps_pixels() {
        let frames: Vec<Surface> = (0..2).map(|i| frame(100 + i)).collect();
        let mut sink = InMemorySink::new();
        write_frames(&mut sink, &frames, 120, 3).unwrap();
        assert_eq!(sink.config(), Some(SinkConfig { width: 8, height: 6, delay_ms: 120, repeat: 3 }));
        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.frames()[1].1.get_pixel(0, 0).0, [101, 0, 0, 255]);
    }

    #[test]
    fn test_empty_animation_is_an_error() {
        assert!(matches!(encode_gif(&[], 100, 0), Err(RenderError::Sink(_))));
    }
}
