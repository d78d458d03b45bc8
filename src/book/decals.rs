// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Page-number decal textures.
//!
//! Numbers are rasterized from a 5x7 bitmap font into a transparent
//! 128x128 RGBA image, centered, so the same decal plane geometry works
//! for any number of digits.

use crate::scene::TextureData;

const TEXTURE_SIZE: u32 = 128;
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
const SCALE: u32 = 4;
const GAP: u32 = SCALE;
const INK: [u8; 4] = [0x55, 0x55, 0x55, 0xff];

// Rows top to bottom, bit 4 is the leftmost column.
const DIGITS: [[u8; GLYPH_H]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

/// Rasterize the decal texture for page number `number`.
pub fn page_number_texture(number: usize) -> TextureData {
    let digits: Vec<usize> = number
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();

    let glyph_w = GLYPH_W as u32 * SCALE;
    let glyph_h = GLYPH_H as u32 * SCALE;
    let total_w = glyph_w * digits.len() as u32 + GAP * (digits.len() as u32 - 1);
    let origin_x = TEXTURE_SIZE.saturating_sub(total_w) / 2;
    let origin_y = TEXTURE_SIZE.saturating_sub(glyph_h) / 2;

    let mut rgba = vec![0u8; (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize];
    for (slot, &digit) in digits.iter().enumerate() {
        let glyph_x = origin_x + slot as u32 * (glyph_w + GAP);
        blit_glyph(&mut rgba, &DIGITS[digit], glyph_x, origin_y);
    }

    TextureData {
        width: TEXTURE_SIZE,
        height: TEXTURE_SIZE,
        rgba,
    }
}

fn blit_glyph(rgba: &mut [u8], rows: &[u8; GLYPH_H], origin_x: u32, origin_y: u32) {
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_W {
            if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                continue;
            }
            let px = origin_x + col as u32 * SCALE;
            let py = origin_y + row as u32 * SCALE;
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    let x = px + dx;
                    let y = py + dy;
                    if x >= TEXTURE_SIZE || y >= TEXTURE_SIZE {
                        continue;
                    }
                    let offset = ((y * TEXTURE_SIZE + x) * 4) as usize;
                    rgba[offset..offset + 4].copy_from_slice(&INK);
                }
            }
        }
    }
}
