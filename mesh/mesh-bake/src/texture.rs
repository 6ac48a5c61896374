//! 2D texture packing and color encodings for baked grids.
//!
//! These are pure buffer transforms; writing image files is left to the
//! caller.
//!
//! A grid of resolution `r` is packed into a single `r² × r` image by laying
//! its z-slices side by side: texel `(u, v)` holds voxel
//! `(u mod r, v, ⌊u / r⌋)`.

// Color channels are clamped to [0, 255] before casting.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{BakeError, BakeResult};
use crate::grid::SdfGrid;

/// Bytes per RGBA texel.
const TEXEL_BYTES: usize = 4;

/// A single-channel float image holding a tiled grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TiledImage {
    /// Image width in texels (`resolution²`).
    pub width: usize,
    /// Image height in texels (`resolution`).
    pub height: usize,
    /// Texel values, row-major (`v · width + u`).
    pub data: Vec<f32>,
}

impl SdfGrid {
    /// Pack the grid into a tiled 2D image.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_bake::SdfGrid;
    ///
    /// let values: Vec<f32> = (0..8).map(|i| i as f32).collect();
    /// let grid = SdfGrid::from_values(2, values).unwrap();
    /// let image = grid.to_tiled();
    ///
    /// assert_eq!((image.width, image.height), (4, 2));
    /// // Texel (u = 2, v = 0) is voxel (0, 0, 1)
    /// assert_eq!(image.data[2], grid.get(0, 0, 1).unwrap());
    /// ```
    #[must_use]
    pub fn to_tiled(&self) -> TiledImage {
        let r = self.resolution();
        let width = r * r;
        let mut data = vec![0.0; width * r];

        for (v, row) in data.chunks_exact_mut(width).enumerate() {
            for (u, texel) in row.iter_mut().enumerate() {
                *texel = self.values()[self.index(u % r, v, u / r)];
            }
        }

        TiledImage {
            width,
            height: r,
            data,
        }
    }

    /// Unpack a tiled 2D image into a grid.
    ///
    /// # Errors
    ///
    /// [`BakeError::InvalidTexture`] if the image is not `r² × r`, its texel
    /// count overflows, or the data length does not match its dimensions.
    pub fn from_tiled(image: &TiledImage) -> BakeResult<Self> {
        let r = image.height;
        if r == 0 || r.checked_mul(r) != Some(image.width) {
            return Err(BakeError::invalid_texture(format!(
                "tiled image must be r² × r, got {} × {}",
                image.width, image.height
            )));
        }
        let texels = image.width.checked_mul(image.height).ok_or_else(|| {
            BakeError::invalid_texture(format!(
                "tiled image {} × {} is too large",
                image.width, image.height
            ))
        })?;
        if image.data.len() != texels {
            return Err(BakeError::invalid_texture(format!(
                "expected {texels} texels, got {}",
                image.data.len()
            )));
        }

        let mut values = vec![0.0; texels];
        for (v, row) in image.data.chunks_exact(image.width).enumerate() {
            for (u, &texel) in row.iter().enumerate() {
                values[u % r + v * r + (u / r) * r * r] = texel;
            }
        }

        Self::from_values(r, values)
    }
}

/// Encode signed distances as 8-bit RGBA for visual inspection.
///
/// Red holds the magnitude, green is 255 for negative (inside) values and 0
/// otherwise. Magnitudes are scaled by 255, rounded and clamped, so only the
/// range `[-1, 1]` survives at a resolution of `1/255`.
///
/// # Example
///
/// ```
/// use mesh_bake::encode_debug_rgba;
///
/// let rgba = encode_debug_rgba(&[-0.5, 0.25]);
/// assert_eq!(rgba, vec![128, 255, 0, 255, 64, 0, 0, 255]);
/// ```
#[must_use]
pub fn encode_debug_rgba(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&value| {
            let red = (value.abs() * 255.0).round().clamp(0.0, 255.0) as u8;
            let green = if value < 0.0 { 255 } else { 0 };
            [red, green, 0, 255]
        })
        .collect()
}

/// Decode the output of [`encode_debug_rgba`].
///
/// # Errors
///
/// [`BakeError::InvalidTexture`] if the length is not a multiple of 4.
pub fn decode_debug_rgba(rgba: &[u8]) -> BakeResult<Vec<f32>> {
    check_texels(rgba)?;
    Ok(rgba
        .chunks_exact(TEXEL_BYTES)
        .map(|texel| {
            let magnitude = f32::from(texel[0]) / 255.0;
            if texel[1] > 0 { -magnitude } else { magnitude }
        })
        .collect())
}

/// Encode each value's four little-endian bytes as one RGBA texel.
///
/// Lossless, unlike [`encode_debug_rgba`].
#[must_use]
pub fn encode_raw_rgba(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decode the output of [`encode_raw_rgba`].
///
/// # Errors
///
/// [`BakeError::InvalidTexture`] if the length is not a multiple of 4.
pub fn decode_raw_rgba(rgba: &[u8]) -> BakeResult<Vec<f32>> {
    check_texels(rgba)?;
    Ok(rgba
        .chunks_exact(TEXEL_BYTES)
        .map(|texel| f32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]))
        .collect())
}

fn check_texels(rgba: &[u8]) -> BakeResult<()> {
    if rgba.len() % TEXEL_BYTES == 0 {
        Ok(())
    } else {
        Err(BakeError::invalid_texture(format!(
            "RGBA buffer length {} is not a multiple of {TEXEL_BYTES}",
            rgba.len()
        )))
    }
}
