//! Placeholder rendering.
//!
//! A placeholder is first described as a [`Canvas`]: a fixed-size surface
//! holding an ordered list of [`paint::PaintCommand`]s. The raster backend
//! executes those commands into pixels; the vector backend renders the same
//! composition from a fixed SVG template.

pub mod paint;
pub mod vector;

#[cfg(feature = "raster")]
pub mod font;
#[cfg(feature = "raster")]
pub mod raster;

use paint::PaintCommand;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Color((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn grey(shade: u8) -> Self {
        Color(shade, shade, shade)
    }
}

/// Fixed-size drawing surface with its paint commands in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    commands: Vec<PaintCommand>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

/// Grey level of row `y` in the vertical background gradient: 200 at the
/// top rising towards 255 at the bottom.
pub fn gradient_shade(y: u32, height: u32) -> u8 {
    let t = y as f64 / height as f64;
    (200.0 + t * 55.0).floor() as u8
}

/// Left edge that centers a run of `text_width` pixels on a surface of
/// `surface_width` pixels. Uses floor division, so text wider than the
/// surface starts left of zero.
pub fn centered_x(surface_width: u32, text_width: u32) -> i32 {
    (surface_width as i64 - text_width as i64).div_euclid(2) as i32
}
