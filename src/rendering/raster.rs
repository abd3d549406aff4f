//! Rasterizer: executes a [`Canvas`] into an RGB buffer and encodes it

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use sha2::{Digest, Sha256};

use super::font::FontFace;
use super::gradient_shade;
use super::paint::{PaintCommand, PixelBox, Stroke};
use super::{Canvas, Color};
use crate::{Error, Result};

pub const JPEG_QUALITY: u8 = 85;

fn rgb(c: Color) -> Rgb<u8> {
    Rgb([c.0, c.1, c.2])
}

/// Execute every paint command of `canvas` in order.
pub fn rasterize(canvas: &Canvas, font: &FontFace) -> RgbImage {
    let mut img = RgbImage::from_pixel(canvas.width, canvas.height, Rgb([255, 255, 255]));
    for cmd in canvas.commands() {
        match cmd {
            PaintCommand::VerticalGradient => fill_gradient(&mut img),
            PaintCommand::Rect { bounds, fill, outline } => fill_rect(&mut img, *bounds, *fill, *outline),
            PaintCommand::Polygon { points, fill } => fill_polygon(&mut img, points, *fill),
            PaintCommand::Ellipse { bounds, fill, outline } => fill_ellipse(&mut img, *bounds, *fill, *outline),
            PaintCommand::Text { x, y, text, size_px, color } => {
                font.draw_text(&mut img, *x, *y, *size_px, *color, text)
            }
        }
    }
    img
}

fn fill_gradient(img: &mut RgbImage) {
    let height = img.height();
    for (_, y, px) in img.enumerate_pixels_mut() {
        *px = rgb(Color::grey(gradient_shade(y, height)));
    }
}

/// Visit every in-bounds pixel of the inclusive box.
fn for_each_in(img: &mut RgbImage, b: PixelBox, mut f: impl FnMut(i32, i32) -> Option<Rgb<u8>>) {
    let x0 = b.x0.max(0);
    let y0 = b.y0.max(0);
    let x1 = b.x1.min(img.width() as i32 - 1);
    let y1 = b.y1.min(img.height() as i32 - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            if let Some(color) = f(x, y) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn fill_rect(img: &mut RgbImage, b: PixelBox, fill: Color, outline: Option<Stroke>) {
    let fill = rgb(fill);
    for_each_in(img, b, |x, y| {
        if let Some(stroke) = outline {
            let w = stroke.width as i32;
            if x < b.x0 + w || x > b.x1 - w || y < b.y0 + w || y > b.y1 - w {
                return Some(rgb(stroke.color));
            }
        }
        Some(fill)
    });
}

/// Even-odd fill sampled at pixel centers.
fn fill_polygon(img: &mut RgbImage, points: &[(i32, i32)], fill: Color) {
    if points.len() < 3 {
        return;
    }
    let bounds = PixelBox::new(
        points.iter().map(|p| p.0).min().unwrap_or(0),
        points.iter().map(|p| p.1).min().unwrap_or(0),
        points.iter().map(|p| p.0).max().unwrap_or(0),
        points.iter().map(|p| p.1).max().unwrap_or(0),
    );
    let fill = rgb(fill);
    for_each_in(img, bounds, |x, y| {
        if point_in_polygon(x as f64 + 0.5, y as f64 + 0.5, points) {
            Some(fill)
        } else {
            None
        }
    });
}

fn point_in_polygon(px: f64, py: f64, points: &[(i32, i32)]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (points[i].0 as f64, points[i].1 as f64);
        let (xj, yj) = (points[j].0 as f64, points[j].1 as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn fill_ellipse(img: &mut RgbImage, b: PixelBox, fill: Color, outline: Option<Stroke>) {
    let cx = (b.x0 + b.x1 + 1) as f64 / 2.0;
    let cy = (b.y0 + b.y1 + 1) as f64 / 2.0;
    let rx = (b.width() + 1) as f64 / 2.0;
    let ry = (b.height() + 1) as f64 / 2.0;
    let inside = |x: i32, y: i32, rx: f64, ry: f64| {
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (x as f64 + 0.5 - cx) / rx;
        let dy = (y as f64 + 0.5 - cy) / ry;
        dx * dx + dy * dy <= 1.0
    };
    let fill = rgb(fill);
    for_each_in(img, b, |x, y| {
        if !inside(x, y, rx, ry) {
            return None;
        }
        match outline {
            Some(stroke) => {
                let w = stroke.width as f64;
                if inside(x, y, rx - w, ry - w) {
                    Some(fill)
                } else {
                    Some(rgb(stroke.color))
                }
            }
            None => Some(fill),
        }
    });
}

/// Hex SHA-256 of the raw pixel buffer, stable across encoders.
pub fn fingerprint(img: &RgbImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(img.width().to_be_bytes());
    hasher.update(img.height().to_be_bytes());
    hasher.update(img.as_raw());
    hex::encode(hasher.finalize())
}

pub fn encode_jpeg<W: Write>(img: &RgbImage, quality: u8, out: W) -> Result<()> {
    let mut encoder = JpegEncoder::new_with_quality(out, quality);
    encoder
        .encode_image(img)
        .map_err(|e| Error::EncodeError(format!("JPEG encoding failed: {}", e)))
}

/// Encode as JPEG and write to `path`. The file handle is closed before
/// returning, whether or not the write succeeded.
pub fn write_jpeg(img: &RgbImage, quality: u8, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    encode_jpeg(img, quality, &mut out)?;
    out.flush()?;
    Ok(())
}
