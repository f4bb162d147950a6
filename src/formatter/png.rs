//! Diagnostic PNG rendering of the pretty JSON dump
//!
//! Black 8x8 bitmap glyphs on a white 800x600 canvas, starting at (50, 50).
//! Anything that does not fit is clipped.

use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::formatter::json;
use crate::model::Value;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

const ORIGIN_X: u32 = 50;
const ORIGIN_Y: u32 = 50;
const GLYPH_ADVANCE: u32 = 8;
const LINE_HEIGHT: u32 = 12;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Rasterize the value's pretty JSON text
pub fn encode(value: &Value) -> ConversionResult<Vec<u8>> {
    let text = json::pretty(value)?;
    let canvas = render(&text);

    let mut buf = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ConversionError::encode(OutputFormat::Png, e))?;
    Ok(buf)
}

fn render(text: &str) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

    for (row, line) in text.lines().enumerate() {
        let y = ORIGIN_Y + row as u32 * LINE_HEIGHT;
        if y >= CANVAS_HEIGHT {
            break;
        }
        for (column, c) in line.chars().enumerate() {
            let x = ORIGIN_X + column as u32 * GLYPH_ADVANCE;
            if x >= CANVAS_WIDTH {
                break;
            }
            draw_glyph(&mut canvas, glyph(c), x, y);
        }
    }

    canvas
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_glyph(canvas: &mut RgbImage, bitmap: [u8; 8], x: u32, y: u32) {
    for (dy, bits) in bitmap.iter().enumerate() {
        for dx in 0..8u32 {
            // Bit 0 is the leftmost pixel
            if bits & (1 << dx) == 0 {
                continue;
            }
            let (px, py) = (x + dx, y + dy as u32);
            if px < CANVAS_WIDTH && py < CANVAS_HEIGHT {
                canvas.put_pixel(px, py, INK);
            }
        }
    }
}
