//! carimg
//!
//! Tooling around the car listing images served by the LocMe backend:
//! placeholder generation (JPEG and SVG), stock photo download and a
//! reachability check of the backend's image and listing endpoints.
//!
//! # Features
//!
//! - **raster** (default): JPEG placeholders drawn with `image` + `rusttype`
//! - **net** (default): remote fetching and endpoint probing via `reqwest`
//!
//! # Example
//!
//! ```no_run
//! use carimg::compose::{OutputEncoding, PlaceholderComposer};
//! use carimg::ToolConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolConfig {
//!     output_dir: "out".into(),
//!     ..Default::default()
//! };
//! let composer = PlaceholderComposer::new(&config);
//! let summary = composer.compose_all(&config.catalog, OutputEncoding::Vector, &mut std::io::stdout())?;
//! println!("{}/{}", summary.succeeded(), summary.total());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod compose;
pub mod error;
pub mod outcome;
pub mod rendering;

#[cfg(feature = "net")]
pub mod fetch;
#[cfg(feature = "net")]
pub mod reachability;

pub use catalog::{AssetSource, CarLabel};
pub use error::{Error, Result};
pub use outcome::{BatchSummary, ItemOutcome};

/// Configuration shared by every tool in the crate.
///
/// The defaults reproduce the built-in catalogs, talk to a backend on
/// `http://localhost:8080` and write into the current directory. Every
/// field may be omitted from a JSON configuration file.
///
/// # Examples
///
/// ```
/// let cfg = carimg::ToolConfig::default();
/// assert_eq!(cfg.base_url, "http://localhost:8080");
/// assert_eq!(cfg.catalog.len(), 9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Backend base URL used by the reachability check
    pub base_url: String,
    /// Cars to compose placeholders for
    pub catalog: Vec<CarLabel>,
    /// Remote images to download
    pub sources: Vec<AssetSource>,
    /// Image names expected under `/api/images/voitures/`
    pub probe_names: Vec<String>,
    /// Directory composed and fetched files are written into
    pub output_dir: PathBuf,
    /// TrueType candidates for raster text, tried in order
    pub font_paths: Vec<PathBuf>,
    /// Per-probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Per-download timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            catalog: catalog::default_car_labels(),
            sources: catalog::default_asset_sources(),
            probe_names: catalog::default_probe_names(),
            output_dir: PathBuf::from("."),
            font_paths: default_font_paths(),
            probe_timeout_ms: 5000,
            fetch_timeout_ms: 30000,
            user_agent: format!("carimg/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(feature = "raster")]
fn default_font_paths() -> Vec<PathBuf> {
    rendering::font::default_font_candidates()
}

#[cfg(not(feature = "raster"))]
fn default_font_paths() -> Vec<PathBuf> {
    Vec::new()
}

impl ToolConfig {
    /// Read a JSON configuration file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: ToolConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the tools rely on: non-empty labels, unique
    /// output names within each catalog and absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        check_http_url("base_url", &self.base_url)?;

        let mut stems = HashSet::new();
        for label in &self.catalog {
            if label.brand.trim().is_empty() || label.model.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "catalog entry {:?} needs a non-empty brand and model",
                    label
                )));
            }
            let stem = label.file_stem();
            if stem.is_empty() {
                return Err(Error::ConfigError(format!(
                    "cannot derive an output name for {} {}",
                    label.brand, label.model
                )));
            }
            if !stems.insert(stem.clone()) {
                return Err(Error::ConfigError(format!("duplicate output name in catalog: {}", stem)));
            }
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if source.output_name.trim().is_empty() {
                return Err(Error::ConfigError(format!("source {} has no output name", source.locator)));
            }
            if !names.insert(source.output_name.as_str()) {
                return Err(Error::ConfigError(format!(
                    "duplicate output name in sources: {}",
                    source.output_name
                )));
            }
            check_http_url("sources.locator", &source.locator)?;
        }

        if self.probe_timeout_ms == 0 || self.fetch_timeout_ms == 0 {
            return Err(Error::ConfigError("timeouts must be greater than zero".into()));
        }
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::ConfigError(format!("{} {:?} is not a valid URL: {}", field, value, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::ConfigError(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}
