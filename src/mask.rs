//! Per-word mask cache and the single shared sampling surface.
//!
//! Masks are decoded into plain RGBA8 buffers by the web layer. `activate`
//! overwrites the shared surface in full; any sample taken afterwards reads the
//! newly activated mask. Activation and sampling for one click never interleave
//! with another activation because everything runs on the UI thread.

use std::collections::HashMap;

use crate::error::GameError;

/// Channel index sampled for hit tests (red).
pub const HIT_CHANNEL: usize = 0;

/// Decoded RGBA8 raster, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl MaskImage {
    /// Wrap an RGBA8 buffer. Returns `None` when the buffer length does not match.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, rgba })
    }

    /// Build a mask from a predicate: `true` pixels are opaque white, the rest transparent.
    pub fn from_fn(width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) -> Self {
        let mut rgba = vec![0u8; width as usize * height as usize * 4];
        for y in 0..height {
            for x in 0..width {
                if inside(x, y) {
                    let i = (y as usize * width as usize + x as usize) * 4;
                    rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        Self { width, height, rgba }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Load state of one word's mask. Words never requested have no slot at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaskSlot {
    Loading,
    Ready(MaskImage),
    Failed(String),
}

/// Handle for an in-flight load; hand it back to [`MaskStore::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingMask {
    pub word: String,
    pub url: String,
}

/// Canvas-sized RGBA buffer that holds exactly one activated mask at a time.
#[derive(Debug)]
struct Surface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Surface {
    fn new(width: u32, height: u32) -> Self {
        Self { width, height, rgba: vec![0; width as usize * height as usize * 4] }
    }

    fn clear(&mut self) {
        self.rgba.fill(0);
    }

    /// Draw `img` at the origin, clipped to the surface.
    fn blit(&mut self, img: &MaskImage) {
        let cols = self.width.min(img.width) as usize * 4;
        let rows = self.height.min(img.height) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = img.width as usize * 4;
        for row in 0..rows {
            let d = row * dst_stride;
            let s = row * src_stride;
            self.rgba[d..d + cols].copy_from_slice(&img.rgba[s..s + cols]);
        }
    }

    /// Pixel cell containing `(x, y)`, or `None` off the surface.
    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (xf, yf) = (x.floor(), y.floor());
        if xf < 0.0 || yf < 0.0 || xf >= self.width as f64 || yf >= self.height as f64 {
            return None;
        }
        Some((xf as usize, yf as usize))
    }

    fn channel_at(&self, x: f64, y: f64, channel: usize) -> u8 {
        match self.cell(x, y) {
            Some((col, row)) => self.rgba[(row * self.width as usize + col) * 4 + channel],
            None => 0,
        }
    }
}

pub struct MaskStore {
    slots: HashMap<String, MaskSlot>,
    surface: Surface,
    active: Option<String>,
}

impl MaskStore {
    /// Create a store whose sampling surface matches the display canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { slots: HashMap::new(), surface: Surface::new(width, height), active: None }
    }

    /// Mark `word` as loading and return a ticket for the async loader.
    /// Returns `None` when the mask is already loading or loaded.
    pub fn request_load(&mut self, word: &str, url: &str) -> Option<PendingMask> {
        match self.slots.get(word) {
            Some(MaskSlot::Loading) | Some(MaskSlot::Ready(_)) => None,
            _ => {
                self.slots.insert(word.to_string(), MaskSlot::Loading);
                Some(PendingMask { word: word.to_string(), url: url.to_string() })
            }
        }
    }

    /// Record the outcome of a load started by [`request_load`](Self::request_load).
    pub fn complete(&mut self, pending: PendingMask, result: Result<MaskImage, GameError>) {
        match result {
            Ok(img) => {
                log::debug!("Loaded mask: {} ({}x{})", pending.word, img.width, img.height);
                self.slots.insert(pending.word, MaskSlot::Ready(img));
            }
            Err(err) => {
                log::error!("Failed to load image {} from {}: {}", pending.word, pending.url, err);
                self.slots.insert(pending.word, MaskSlot::Failed(err.to_string()));
            }
        }
    }

    pub fn is_ready(&self, word: &str) -> bool {
        matches!(self.slots.get(word), Some(MaskSlot::Ready(_)))
    }

    pub fn state(&self, word: &str) -> Option<&MaskSlot> {
        self.slots.get(word)
    }

    /// Copy `word`'s mask into the shared surface, replacing whatever was there.
    /// The surface is left untouched on failure.
    pub fn activate(&mut self, word: &str) -> Result<(), GameError> {
        let Some(MaskSlot::Ready(img)) = self.slots.get(word) else {
            return Err(GameError::MaskNotReady(word.to_string()));
        };
        self.surface.clear();
        self.surface.blit(img);
        self.active = Some(word.to_string());
        Ok(())
    }

    /// Word whose mask currently occupies the sampling surface.
    pub fn active_word(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Hit channel of the active surface at `(x, y)`; 0 outside the canvas.
    pub fn sample_alpha(&self, x: f64, y: f64) -> u8 {
        self.surface.channel_at(x, y, HIT_CHANNEL)
    }

    /// Whether `(x, y)` falls on a pixel of the sampling surface.
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        self.surface.cell(x, y).is_some()
    }
}
