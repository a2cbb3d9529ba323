// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tile slicing: compose the source onto a padded canvas and crop tiles

use crate::ImagingError;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tess_core::GridOption;

/// One sliced output tile, already PNG-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub png: Vec<u8>,
}

/// Pixel thickness of the outer transparent frame for a padding level.
///
/// `step = max(2, tile_size / 20)`; the result never exceeds half a tile.
pub fn padding_px(level: u8, tile_size: u32) -> u32 {
    let step = (tile_size / 20).max(2);
    (u32::from(level) * step).min(tile_size / 2)
}

/// Slice an encoded image into `rows × cols` square tiles.
///
/// The source is scaled (aspect preserved, Lanczos3) into the canvas region
/// left inside a single outer padding frame, centered, then cropped
/// row-major. Padding exists only at the canvas border, not between tiles.
/// Output is deterministic: fixed resampler, fixed PNG compression and
/// filter.
pub fn slice(
    bytes: &[u8],
    grid: GridOption,
    padding_level: u8,
    tile_size: u32,
) -> Result<Vec<Tile>, ImagingError> {
    let source = image::load_from_memory(bytes)?.to_rgba8();
    let pad = padding_px(padding_level, tile_size);

    let canvas_w = tile_size * grid.cols;
    let canvas_h = tile_size * grid.rows;
    let avail_w = canvas_w.saturating_sub(2 * pad).max(1);
    let avail_h = canvas_h.saturating_sub(2 * pad).max(1);

    let (src_w, src_h) = (source.width().max(1), source.height().max(1));
    let scale =
        (f64::from(avail_w) / f64::from(src_w)).min(f64::from(avail_h) / f64::from(src_h));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled_w = ((f64::from(src_w) * scale).floor() as u32).clamp(1, avail_w);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled_h = ((f64::from(src_h) * scale).floor() as u32).clamp(1, avail_h);

    let scaled = imageops::resize(&source, scaled_w, scaled_h, FilterType::Lanczos3);

    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
    let x0 = pad + (avail_w - scaled_w) / 2;
    let y0 = pad + (avail_h - scaled_h) / 2;
    imageops::replace(&mut canvas, &scaled, i64::from(x0), i64::from(y0));

    let mut tiles = Vec::with_capacity(grid.tiles() as usize);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let view =
                imageops::crop_imm(&canvas, col * tile_size, row * tile_size, tile_size, tile_size);
            let png = encode_png(&view.to_image())?;
            tiles.push(Tile { row, col, png });
        }
    }
    Ok(tiles)
}

fn encode_png(tile: &RgbaImage) -> Result<Vec<u8>, ImagingError> {
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, PngFilter::NoFilter);
    encoder.write_image(tile.as_raw(), tile.width(), tile.height(), ExtendedColorType::Rgba8)?;
    Ok(out)
}

/// Encode a solid-color RGBA PNG for kernel tests.
#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, PngFilter::NoFilter);
    #[allow(clippy::unwrap_used)]
    encoder.write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8).unwrap();
    out
}

#[cfg(test)]
#[path = "slice_tests.rs"]
mod tests;
