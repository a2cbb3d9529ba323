// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grid-suggestion and tile-slicing specs

use tess_core::GridOption;
use tess_imaging::{padding_px, slice, suggest_grids};

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A 200x100 image with at most 4 tiles: 1x2 gives exactly square cells
/// and must rank first; 2x1 ranks behind it.
#[test]
fn wide_image_plan_prefers_one_by_two() {
    let plan = suggest_grids(200, 100, 4, Some(5));
    assert_eq!(plan.fallback, GridOption { rows: 1, cols: 2 });
    let pos = |grid: GridOption| plan.options.iter().position(|o| *o == grid);
    if let (Some(a), Some(b)) =
        (pos(GridOption { rows: 1, cols: 2 }), pos(GridOption { rows: 2, cols: 1 }))
    {
        assert!(a < b);
    }
}

/// Solid red 200x100, grid 1x2, padding level 2, tile size 100: two
/// 100x100 RGBA tiles with a 10px transparent border band on the composed
/// canvas and the scaled image centered in the remaining 180x80 region.
#[test]
fn bordered_slice_matches_the_padding_contract() {
    assert_eq!(padding_px(2, 100), 10);

    let tiles = slice(&solid_png(200, 100, [255, 0, 0, 255]), GridOption { rows: 1, cols: 2 }, 2, 100)
        .unwrap();
    assert_eq!(tiles.len(), 2);

    let left = image::load_from_memory(&tiles[0].png).unwrap().to_rgba8();
    let right = image::load_from_memory(&tiles[1].png).unwrap().to_rgba8();
    assert_eq!(left.dimensions(), (100, 100));
    assert_eq!(right.dimensions(), (100, 100));

    // Outer border transparent on every edge of the composed canvas.
    for i in 0..10 {
        assert_eq!(left.get_pixel(i, 50)[3], 0);
        assert_eq!(right.get_pixel(99 - i, 50)[3], 0);
        assert_eq!(left.get_pixel(50, i)[3], 0);
        assert_eq!(left.get_pixel(50, 99 - i)[3], 0);
    }
    // Scaled 160x80 content centered in 180x80: opaque from x=20 on the
    // canvas, spanning the inter-tile seam.
    assert_eq!(left.get_pixel(20, 50)[3], 255);
    assert_eq!(left.get_pixel(99, 50)[3], 255);
    assert_eq!(right.get_pixel(0, 50)[3], 255);
    assert_eq!(left.get_pixel(19, 50)[3], 0);
}

#[test]
fn slice_output_is_reproducible() {
    let png = solid_png(123, 456, [1, 2, 3, 255]);
    let grid = GridOption { rows: 2, cols: 2 };
    assert_eq!(slice(&png, grid, 3, 100).unwrap(), slice(&png, grid, 3, 100).unwrap());
}
