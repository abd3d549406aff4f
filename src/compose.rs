//! Placeholder composer: writes one car placeholder per catalog entry.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::outcome::{BatchSummary, ItemOutcome};
use crate::rendering::vector;
use crate::{CarLabel, Result, ToolConfig};

#[cfg(not(feature = "raster"))]
use crate::Error;

#[cfg(feature = "raster")]
use crate::rendering::{font::FontFace, paint::car_scene, raster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// JPEG, quality 85
    Raster,
    /// SVG from the fixed template
    Vector,
}

impl OutputEncoding {
    pub fn extension(self) -> &'static str {
        match self {
            OutputEncoding::Raster => "jpg",
            OutputEncoding::Vector => "svg",
        }
    }
}

pub struct PlaceholderComposer {
    output_dir: PathBuf,
    #[cfg(feature = "raster")]
    font: FontFace,
}

impl PlaceholderComposer {
    /// Build a composer writing into `config.output_dir`. With the `raster`
    /// feature this probes `config.font_paths` once up front.
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            #[cfg(feature = "raster")]
            font: FontFace::probe(&config.font_paths),
        }
    }

    #[cfg(feature = "raster")]
    pub fn with_font(output_dir: impl Into<PathBuf>, font: FontFace) -> Self {
        Self {
            output_dir: output_dir.into(),
            font,
        }
    }

    #[cfg(feature = "raster")]
    pub fn font(&self) -> &FontFace {
        &self.font
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_path(&self, output_name: &str, encoding: OutputEncoding) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", output_name, encoding.extension()))
    }

    /// Draw the placeholder for `brand`/`model` without writing it.
    #[cfg(feature = "raster")]
    pub fn render_raster(&self, brand: &str, model: &str) -> image::RgbImage {
        let canvas = car_scene(brand, model, &self.font);
        raster::rasterize(&canvas, &self.font)
    }

    /// Compose a JPEG placeholder and write it to `<output_name>.jpg`.
    #[cfg(feature = "raster")]
    pub fn compose_raster(&self, brand: &str, model: &str, output_name: &str) -> Result<PathBuf> {
        let path = self.output_path(output_name, OutputEncoding::Raster);
        let img = self.render_raster(brand, model);
        raster::write_jpeg(&img, raster::JPEG_QUALITY, &path)?;
        debug!("Wrote {} ({}x{})", path.display(), img.width(), img.height());
        Ok(path)
    }

    /// Compose an SVG placeholder and write it to `<output_name>.svg`.
    pub fn compose_vector(&self, brand: &str, model: &str, output_name: &str) -> Result<PathBuf> {
        for text in [brand, model] {
            if vector::has_markup_chars(text) {
                warn!("{:?} contains markup characters and is written unescaped", text);
            }
        }
        let path = self.output_path(output_name, OutputEncoding::Vector);
        std::fs::write(&path, vector::render_svg(brand, model))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    pub fn compose(&self, label: &CarLabel, encoding: OutputEncoding) -> Result<PathBuf> {
        let stem = label.file_stem();
        match encoding {
            OutputEncoding::Vector => self.compose_vector(&label.brand, &label.model, &stem),
            #[cfg(feature = "raster")]
            OutputEncoding::Raster => self.compose_raster(&label.brand, &label.model, &stem),
            #[cfg(not(feature = "raster"))]
            OutputEncoding::Raster => Err(Error::RenderError(
                "raster output requires the `raster` feature".into(),
            )),
        }
    }

    /// Compose every label, reporting one line per item and a final count.
    /// A failed item is recorded and the batch moves on; only a failure to
    /// write the report itself is returned as an error.
    pub fn compose_all<W: Write>(
        &self,
        labels: &[CarLabel],
        encoding: OutputEncoding,
        out: &mut W,
    ) -> Result<BatchSummary> {
        if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
            warn!("Cannot create {}: {}", self.output_dir.display(), e);
        }

        let mut summary = BatchSummary::new();
        for label in labels {
            let stem = label.file_stem();
            let name = format!("{}.{}", stem, encoding.extension());
            let result = self.compose(label, encoding);
            match &result {
                Ok(path) => writeln!(out, "✓ Image created: {}", path.display())?,
                Err(e) => writeln!(out, "✗ Failed to create {}: {}", name, e)?,
            }
            summary.push(ItemOutcome::from_result(name, &result, |p| p.display().to_string()));
        }

        writeln!(
            out,
            "\n{}/{} {} images created",
            summary.succeeded(),
            summary.total(),
            encoding.extension().to_uppercase()
        )?;
        Ok(summary)
    }
}
