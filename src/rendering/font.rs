//! Font acquisition for raster text.
//!
//! [`FontFace::probe`] is a capability probe: it walks a list of TrueType
//! candidates and hands back the first one that loads. When none does it
//! returns the built-in 5x7 bitmap face, so text is always drawable and the
//! probe itself never fails. Only acquisition problems (missing, unreadable
//! or unparseable font files) lead to the fallback.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::{debug, info, warn};
use rusttype::{point, Font, Scale};

use super::paint::TextMeasure;
use super::Color;

/// Candidate font files tried in order when no configuration overrides them.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "arial.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

pub enum FontFace {
    TrueType { font: Font<'static>, source: PathBuf },
    Builtin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontFace({})", self.describe())
    }
}

impl FontFace {
    /// Return the first usable font among `candidates`, or the built-in face.
    pub fn probe(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if let Some(face) = Self::try_load(path) {
                info!("Using font {}", path.display());
                return face;
            }
        }
        info!("No TrueType font available; using built-in bitmap font");
        FontFace::Builtin
    }

    pub fn builtin() -> Self {
        FontFace::Builtin
    }

    fn try_load(path: &Path) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Font {} not found", path.display());
                return None;
            }
            Err(e) => {
                warn!("Font {} unreadable: {}", path.display(), e);
                return None;
            }
        };
        match Font::try_from_vec(bytes) {
            Some(font) => Some(FontFace::TrueType {
                font,
                source: path.to_path_buf(),
            }),
            None => {
                warn!("Font {} is not a usable TrueType font", path.display());
                None
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    pub fn describe(&self) -> String {
        match self {
            FontFace::TrueType { source, .. } => source.display().to_string(),
            FontFace::Builtin => "built-in 5x7".to_string(),
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Pixels outside the
    /// image are clipped.
    pub fn draw_text(&self, img: &mut RgbImage, x: i32, y: i32, size_px: f32, color: Color, text: &str) {
        match self {
            FontFace::TrueType { font, .. } => draw_truetype(img, font, x, y, size_px, color, text),
            FontFace::Builtin => draw_builtin(img, x, y, size_px, color, text),
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, size_px: f32) -> u32 {
        match self {
            FontFace::TrueType { font, .. } => truetype_width(font, text, size_px),
            FontFace::Builtin => builtin_width(text, size_px),
        }
    }
}

fn truetype_width(font: &Font<'static>, text: &str, size_px: f32) -> u32 {
    let scale = Scale::uniform(size_px);
    let ascent = font.v_metrics(scale).ascent;
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            min_x = min_x.min(bb.min.x);
            max_x = max_x.max(bb.max.x);
        }
    }
    if max_x < min_x {
        0
    } else {
        (max_x - min_x) as u32
    }
}

fn draw_truetype(img: &mut RgbImage, font: &Font<'static>, x: i32, y: i32, size_px: f32, color: Color, text: &str) {
    let scale = Scale::uniform(size_px);
    let ascent = font.v_metrics(scale).ascent;
    let (w, h) = (img.width() as i32, img.height() as i32);
    for glyph in font.layout(text, scale, point(x as f32, y as f32 + ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= w || py >= h || coverage <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            *dst = blend(*dst, color, coverage.min(1.0));
        });
    }
}

fn blend(dst: Rgb<u8>, color: Color, alpha: f32) -> Rgb<u8> {
    let mix = |d: u8, s: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    Rgb([mix(dst.0[0], color.0), mix(dst.0[1], color.1), mix(dst.0[2], color.2)])
}

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

/// Integer pixel scale of the bitmap face for a requested size.
fn builtin_scale(size_px: f32) -> u32 {
    ((size_px / 8.0).round() as u32).max(1)
}

fn builtin_width(text: &str, size_px: f32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    let s = builtin_scale(size_px);
    n * GLYPH_ADVANCE * s - s
}

fn draw_builtin(img: &mut RgbImage, x: i32, y: i32, size_px: f32, color: Color, text: &str) {
    let s = builtin_scale(size_px) as i32;
    let (w, h) = (img.width() as i32, img.height() as i32);
    let fill = Rgb([color.0, color.1, color.2]);
    for (i, ch) in text.chars().enumerate() {
        let rows = glyph_rows(ch);
        let gx = x + i as i32 * GLYPH_ADVANCE as i32 * s;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS as i32 {
                if bits & (1 << (GLYPH_COLS as i32 - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..s {
                    for dx in 0..s {
                        let px = gx + col * s + dx;
                        let py = y + row as i32 * s + dy;
                        if px >= 0 && py >= 0 && px < w && py < h {
                            img.put_pixel(px as u32, py as u32, fill);
                        }
                    }
                }
            }
        }
    }
}

/// 5x7 bitmap rows, most significant of the low five bits is the left column.
fn glyph_rows(ch: char) -> [u8; GLYPH_ROWS as usize] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ' ' => [0x00; 7],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_falls_back_without_error() {
        let face = FontFace::probe(&[
            PathBuf::from("/definitely/missing/arial.ttf"),
            PathBuf::from("also-missing.ttf"),
        ]);
        assert!(face.is_builtin());
    }

    #[test]
    fn probe_skips_files_that_are_not_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        let face = FontFace::probe(&[bogus]);
        assert!(face.is_builtin());
    }

    #[test]
    fn builtin_width_scales_with_size() {
        let face = FontFace::builtin();
        // 48px -> scale 6, 24px -> scale 3
        assert_eq!(face.text_width("BMW", 48.0), 3 * 6 * 6 - 6);
        assert_eq!(face.text_width("Volkswagen", 48.0), 10 * 6 * 6 - 6);
        assert_eq!(face.text_width("X3", 24.0), 2 * 6 * 3 - 3);
        assert_eq!(face.text_width("", 24.0), 0);
    }

    #[test]
    fn builtin_draws_inside_measured_box() {
        let face = FontFace::builtin();
        let mut img = RgbImage::from_pixel(120, 40, Rgb([255, 255, 255]));
        face.draw_text(&mut img, 10, 5, 16.0, Color(0, 0, 0), "BMW");
        let width = face.text_width("BMW", 16.0) as i32;
        let mut inked = 0;
        for (x, y, p) in img.enumerate_pixels() {
            if p.0 == [0, 0, 0] {
                inked += 1;
                assert!((x as i32) >= 10 && (x as i32) < 10 + width);
                assert!((y as i32) >= 5 && (y as i32) < 5 + 14);
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let face = FontFace::builtin();
        let mut img = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        face.draw_text(&mut img, -20, -3, 48.0, Color(0, 0, 0), "Volkswagen");
    }

    #[test]
    fn system_font_measures_when_available() {
        let face = FontFace::probe(&default_font_candidates());
        if face.is_builtin() {
            eprintln!("no system font installed; skipping");
            return;
        }
        let narrow = face.text_width("BMW", 48.0);
        let wide = face.text_width("Volkswagen", 48.0);
        assert!(narrow > 0);
        assert!(wide > narrow);
    }
}
