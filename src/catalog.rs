//! Built-in catalogs and slug derivation.
//!
//! These are the defaults used when no configuration file is supplied. They
//! mirror the image set the backend ships under `static/images/voitures`.

use serde::{Deserialize, Serialize};

/// Brand/model pair with the file stem its placeholder is written under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarLabel {
    pub brand: String,
    pub model: String,
    /// File stem without extension. Empty means "derive from brand/model".
    #[serde(default)]
    pub output_name: String,
}

impl CarLabel {
    pub fn new(brand: &str, model: &str, output_name: &str) -> Self {
        Self {
            brand: brand.to_string(),
            model: model.to_string(),
            output_name: output_name.to_string(),
        }
    }

    /// The stem the composer writes to, falling back to the slug of
    /// brand and model.
    pub fn file_stem(&self) -> String {
        if self.output_name.trim().is_empty() {
            slugify(&self.brand, &self.model)
        } else {
            self.output_name.clone()
        }
    }
}

/// A remote image and the local file name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSource {
    /// File name including extension, relative to the output directory
    pub output_name: String,
    /// Absolute http(s) URL
    pub locator: String,
}

impl AssetSource {
    pub fn new(output_name: &str, locator: &str) -> Self {
        Self {
            output_name: output_name.to_string(),
            locator: locator.to_string(),
        }
    }
}

/// Derive a filesystem-safe stem from brand and model.
///
/// Lowercases ASCII alphanumerics, folds every other run of characters into a
/// single `-` and trims dashes at both ends.
///
/// ```
/// assert_eq!(carimg::catalog::slugify("Mercedes", "Classe A"), "mercedes-classe-a");
/// ```
pub fn slugify(brand: &str, model: &str) -> String {
    let mut slug = String::with_capacity(brand.len() + model.len() + 1);
    for ch in brand.chars().chain(std::iter::once(' ')).chain(model.chars()) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn default_car_labels() -> Vec<CarLabel> {
    vec![
        CarLabel::new("Toyota", "Corolla", "toyota-corolla"),
        CarLabel::new("BMW", "X3", "bmw-x3"),
        CarLabel::new("Mercedes", "Classe A", "mercedes-classe-a"),
        CarLabel::new("Audi", "A4", "audi-a4"),
        CarLabel::new("Volkswagen", "Golf", "volkswagen-golf"),
        CarLabel::new("Peugeot", "308", "peugeot-308"),
        CarLabel::new("Renault", "Clio", "renault-clio"),
        CarLabel::new("Tesla", "Model 3", "tesla-model3"),
        CarLabel::new("Default", "Car", "default-car"),
    ]
}

const UNSPLASH_PARAMS: &str = "?w=800&h=600&fit=crop&crop=center";

pub fn default_asset_sources() -> Vec<AssetSource> {
    [
        ("toyota-corolla.jpg", "photo-1621007947382-bb3c3994e3fb"),
        ("bmw-x3.jpg", "photo-1555215695-3004980ad54e"),
        ("mercedes-classe-a.jpg", "photo-1618843479313-40f8afb4b4d8"),
        ("audi-a4.jpg", "photo-1606664515524-ed2f786a0bd6"),
        ("volkswagen-golf.jpg", "photo-1549317336-206569e8475c"),
        ("peugeot-308.jpg", "photo-1552519507-da3b142c6e3d"),
        ("renault-clio.jpg", "photo-1544636331-e26879cd4d9b"),
        ("tesla-model3.jpg", "photo-1560958089-b8a1929cea89"),
        ("default-car.jpg", "photo-1492144534655-ae79c964c9d7"),
    ]
    .iter()
    .map(|(name, photo)| {
        AssetSource::new(
            name,
            &format!("https://images.unsplash.com/{}{}", photo, UNSPLASH_PARAMS),
        )
    })
    .collect()
}

/// Image names the reachability check expects the backend to serve.
pub fn default_probe_names() -> Vec<String> {
    default_car_labels()
        .iter()
        .map(|label| format!("{}.svg", label.file_stem()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_folds_separators() {
        assert_eq!(slugify("Toyota", "Corolla"), "toyota-corolla");
        assert_eq!(slugify("Tesla", "Model 3"), "tesla-model-3");
        assert_eq!(slugify("  Alfa Romeo ", "Giulia (QV)"), "alfa-romeo-giulia-qv");
    }

    #[test]
    fn file_stem_prefers_explicit_output_name() {
        let label = CarLabel::new("Tesla", "Model 3", "tesla-model3");
        assert_eq!(label.file_stem(), "tesla-model3");
        let derived = CarLabel::new("Tesla", "Model 3", "");
        assert_eq!(derived.file_stem(), "tesla-model-3");
    }

    #[test]
    fn default_catalogs_have_unique_targets() {
        let labels = default_car_labels();
        let stems: HashSet<_> = labels.iter().map(|l| l.file_stem()).collect();
        assert_eq!(stems.len(), labels.len());

        let sources = default_asset_sources();
        let names: HashSet<_> = sources.iter().map(|s| s.output_name.clone()).collect();
        assert_eq!(names.len(), sources.len());
        assert!(sources.iter().all(|s| s.locator.starts_with("https://images.unsplash.com/")));
    }

    #[test]
    fn probe_names_cover_the_catalog() {
        let names = default_probe_names();
        assert_eq!(names.len(), 9);
        assert_eq!(names[1], "bmw-x3.svg");
        assert_eq!(names[8], "default-car.svg");
    }
}
