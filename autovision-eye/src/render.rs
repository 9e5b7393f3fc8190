//! Visualization rendering.
//!
//! Draws detection boxes and labels on a copy of the decoded input image
//! and encodes the result for embedding in the report. Drawing writes
//! pixels directly into the RGBA buffer; labels are rasterized from a
//! built-in 5x7 glyph set, so no font assets are needed at runtime.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use autovision_core::{BoundingBox, DetectionRecord};

use crate::error::VisionError;

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_SCALE: i32 = 2;
/// Columns between glyphs, pre-scale
const GLYPH_SPACING: i32 = 1;
/// Labels sit with a 5 px gap above the box's top edge
const LABEL_OFFSET: i32 = GLYPH_HEIGHT * GLYPH_SCALE + 5;

/// Stroke color and width for one class of box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub color: Rgba<u8>,
    pub thickness: u32,
}

impl BoxStyle {
    /// Red, 2 px: the style damage boxes are drawn in
    pub fn damage() -> Self {
        Self {
            color: Rgba([255, 0, 0, 255]),
            thickness: 2,
        }
    }

    /// Green, 1 px: the style part boxes would be drawn in. The report
    /// assembler leaves part boxes undrawn to keep the visualization
    /// readable.
    pub fn part() -> Self {
        Self {
            color: Rgba([0, 255, 0, 255]),
            thickness: 1,
        }
    }
}

/// Draw a box and an uppercase label for each record onto a copy of the
/// image. The input image is never modified.
pub fn annotate(image: &DynamicImage, records: &[DetectionRecord], style: BoxStyle) -> RgbaImage {
    let mut canvas = image.to_rgba8();

    for record in records {
        draw_rect(&mut canvas, record.bbox, style);
        let label = record.label.to_uppercase();
        draw_label(
            &mut canvas,
            &label,
            record.bbox.x1,
            record.bbox.y1 - LABEL_OFFSET,
            style.color,
        );
    }

    debug!("Annotated {} boxes", records.len());
    canvas
}

/// Encode the rendered buffer as PNG, then base64 for report embedding
pub fn encode_png_base64(canvas: &RgbaImage) -> Result<String, VisionError> {
    let mut png = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
    Ok(general_purpose::STANDARD.encode(&png))
}

fn draw_rect(canvas: &mut RgbaImage, bbox: BoundingBox, style: BoxStyle) {
    for inset in 0..style.thickness as i32 {
        let x1 = bbox.x1 + inset;
        let y1 = bbox.y1 + inset;
        let x2 = bbox.x2 - inset;
        let y2 = bbox.y2 - inset;
        if x2 < x1 || y2 < y1 {
            break;
        }

        for x in x1..=x2 {
            put_pixel_checked(canvas, x, y1, style.color);
            put_pixel_checked(canvas, x, y2, style.color);
        }
        for y in y1..=y2 {
            put_pixel_checked(canvas, x1, y, style.color);
            put_pixel_checked(canvas, x2, y, style.color);
        }
    }
}

fn draw_label(canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph_rows(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    for dy in 0..GLYPH_SCALE {
                        for dx in 0..GLYPH_SCALE {
                            put_pixel_checked(
                                canvas,
                                cursor_x + col * GLYPH_SCALE + dx,
                                y + row as i32 * GLYPH_SCALE + dy,
                                color,
                            );
                        }
                    }
                }
            }
        }
        cursor_x += (GLYPH_WIDTH + GLYPH_SPACING) * GLYPH_SCALE;
    }
}

/// Out-of-bounds writes are dropped, so boxes and labels clip at the edges
fn put_pixel_checked(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Row bitmaps for the characters labels use, 5 bits per row, MSB left.
/// Unknown characters (including the space) advance the cursor undrawn.
fn glyph_rows(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        _ => return None,
    };
    Some(rows)
}
