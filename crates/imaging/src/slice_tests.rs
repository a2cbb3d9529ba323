// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn grid(rows: u32, cols: u32) -> GridOption {
    GridOption { rows, cols }
}

#[yare::parameterized(
    zero_level      = { 0, 100, 0 },
    level_two       = { 2, 100, 10 },
    level_five      = { 5, 100, 25 },
    small_tile_step = { 1, 64, 3 },
    clamped_at_half = { 5, 64, 15 },
    tiny_tile       = { 5, 20, 10 },
)]
fn padding_px_cases(level: u8, tile_size: u32, expected: u32) {
    assert_eq!(padding_px(level, tile_size), expected);
}

#[test]
fn slice_emits_rows_times_cols_tiles() {
    let src = test_png(200, 100, [255, 0, 0, 255]);
    let tiles = slice(&src, grid(2, 3), 1, 100).unwrap();
    assert_eq!(tiles.len(), 6);
}

#[test]
fn tiles_are_square_rgba_at_tile_size() {
    let src = test_png(200, 100, [255, 0, 0, 255]);
    for tile in slice(&src, grid(1, 2), 2, 100).unwrap() {
        let decoded = image::load_from_memory(&tile.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
    }
}

#[test]
fn tiles_are_row_major() {
    let src = test_png(300, 300, [0, 255, 0, 255]);
    let tiles = slice(&src, grid(2, 2), 0, 64).unwrap();
    let order: Vec<(u32, u32)> = tiles.iter().map(|t| (t.row, t.col)).collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
}

#[test]
fn slice_is_byte_deterministic() {
    let src = test_png(123, 77, [12, 34, 56, 200]);
    let a = slice(&src, grid(2, 2), 3, 100).unwrap();
    let b = slice(&src, grid(2, 2), 3, 100).unwrap();
    assert_eq!(a, b);
}

#[test]
fn border_padding_leaves_outer_frame_transparent() {
    // 200x100 source on a 1x2 grid at level 2: pad = 10, so the composed
    // 200x100 canvas keeps a 10px transparent band on every outer edge.
    let src = test_png(200, 100, [255, 0, 0, 255]);
    let tiles = slice(&src, grid(1, 2), 2, 100).unwrap();
    let left = image::load_from_memory(&tiles[0].png).unwrap().to_rgba8();
    let right = image::load_from_memory(&tiles[1].png).unwrap().to_rgba8();

    for y in 0..100 {
        for x in 0..10 {
            assert_eq!(left.get_pixel(x, y)[3], 0, "left frame at ({x},{y})");
            assert_eq!(right.get_pixel(99 - x, y)[3], 0, "right frame");
        }
    }
    for x in 0..100 {
        for y in 0..10 {
            assert_eq!(left.get_pixel(x, y)[3], 0, "top frame");
            assert_eq!(left.get_pixel(x, 99 - y)[3], 0, "bottom frame");
        }
    }
    // Scaled content is centered inside the 180x80 available region, so the
    // canvas center is opaque on both tiles' inner halves.
    assert_eq!(left.get_pixel(99, 50)[3], 255);
    assert_eq!(right.get_pixel(0, 50)[3], 255);
}

#[test]
fn no_gap_between_adjacent_tiles() {
    // Padding is a single outer frame: the seam between tiles stays opaque.
    let src = test_png(200, 100, [0, 0, 255, 255]);
    let tiles = slice(&src, grid(1, 2), 2, 100).unwrap();
    let left = image::load_from_memory(&tiles[0].png).unwrap().to_rgba8();
    let right = image::load_from_memory(&tiles[1].png).unwrap().to_rgba8();
    assert_eq!(left.get_pixel(99, 50)[3], 255);
    assert_eq!(right.get_pixel(0, 50)[3], 255);
}

#[test]
fn zero_padding_fills_canvas_for_matching_aspect() {
    let src = test_png(200, 100, [9, 9, 9, 255]);
    let tiles = slice(&src, grid(1, 2), 0, 100).unwrap();
    let left = image::load_from_memory(&tiles[0].png).unwrap().to_rgba8();
    assert_eq!(left.get_pixel(0, 0)[3], 255);
    assert_eq!(left.get_pixel(99, 99)[3], 255);
}

#[test]
fn slice_rejects_garbage_bytes() {
    assert!(slice(b"not an image", grid(1, 1), 0, 100).is_err());
}
