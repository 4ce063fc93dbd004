//! Rendered frames and the layer compositor.

use crate::palette::{Palette, Rgb, resolve};
use crate::status::Status;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH, ScanlineBuffer};

/// Merge the sprite and background layers of one line into `out`.
///
/// Sprite colour wins where one is present, then the background, and the
/// backdrop shows through everything transparent.
pub fn compose_line(
    background: &ScanlineBuffer,
    sprites: &ScanlineBuffer,
    backdrop: u8,
    out: &mut ScanlineBuffer,
) {
    for ((pixel, &bg), &spr) in out.iter_mut().zip(background).zip(sprites) {
        *pixel = resolve(spr, resolve(bg, backdrop & 0x0F));
    }
}

/// A complete 256x192 picture plus the status flags raised drawing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    indices: Vec<u8>,
    pixels: Vec<Rgb>,
    status: Status,
}

impl Frame {
    pub const WIDTH: usize = SCREEN_WIDTH;
    pub const HEIGHT: usize = SCREEN_HEIGHT;

    /// Build a frame from a full plane of resolved colour indices.
    pub(crate) fn from_indices(indices: Vec<u8>, palette: &Palette, status: Status) -> Self {
        debug_assert_eq!(indices.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        let pixels = indices.iter().map(|&index| palette.rgb(index)).collect();
        Self {
            indices,
            pixels,
            status,
        }
    }

    /// Colour indices, row-major.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// RGB pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < SCREEN_WIDTH && y < SCREEN_HEIGHT).then(|| self.pixels[y * SCREEN_WIDTH + x])
    }

    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> Option<u8> {
        (x < SCREEN_WIDTH && y < SCREEN_HEIGHT).then(|| self.indices[y * SCREEN_WIDTH + x])
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Packed `R, G, B` bytes, 3 per pixel.
    #[must_use]
    pub fn to_rgb24(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    /// Opaque ARGB32 words, one per pixel.
    #[must_use]
    pub fn to_argb32(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.to_argb32()).collect()
    }
}
