//! Integration tests for placeholder composition

use carimg::catalog::default_car_labels;
use carimg::compose::{OutputEncoding, PlaceholderComposer};
use carimg::ToolConfig;

fn config_in(dir: &std::path::Path) -> ToolConfig {
    ToolConfig {
        output_dir: dir.to_path_buf(),
        font_paths: Vec::new(),
        ..Default::default()
    }
}

#[test]
fn vector_catalog_is_written_and_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let composer = PlaceholderComposer::new(&config);

    let mut report = Vec::new();
    let summary = composer
        .compose_all(&config.catalog, OutputEncoding::Vector, &mut report)
        .unwrap();
    assert_eq!(summary.counts(), (9, 9));

    let first = std::fs::read_to_string(dir.path().join("mercedes-classe-a.svg")).unwrap();
    assert!(first.contains(">Mercedes</text>"));
    assert!(first.contains(">Classe A</text>"));

    composer
        .compose_all(&config.catalog, OutputEncoding::Vector, &mut std::io::sink())
        .unwrap();
    let second = std::fs::read_to_string(dir.path().join("mercedes-classe-a.svg")).unwrap();
    assert_eq!(first, second);

    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("9/9 SVG images created"));
}

#[test]
fn output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir.path().join("static/images/voitures"));
    let composer = PlaceholderComposer::new(&config);
    let summary = composer
        .compose_all(&default_car_labels()[..2], OutputEncoding::Vector, &mut std::io::sink())
        .unwrap();
    assert!(summary.all_succeeded());
    assert!(dir.path().join("static/images/voitures/bmw-x3.svg").exists());
}

#[cfg(feature = "raster")]
mod raster {
    use super::*;
    use carimg::rendering::font::FontFace;
    use carimg::rendering::paint::{car_scene, PaintCommand, TextMeasure};
    use carimg::rendering::{centered_x, raster::fingerprint};
    use image::GenericImageView;

    #[test]
    fn raster_catalog_produces_800x600_jpegs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let composer = PlaceholderComposer::new(&config);

        let summary = composer
            .compose_all(&config.catalog, OutputEncoding::Raster, &mut std::io::sink())
            .unwrap();
        assert_eq!(summary.counts(), (9, 9));

        for label in &config.catalog {
            let path = dir.path().join(format!("{}.jpg", label.file_stem()));
            let img = image::open(&path).expect("decode jpeg");
            assert_eq!(img.dimensions(), (800, 600));
        }
    }

    #[test]
    fn brand_text_is_centered_for_short_and_long_names() {
        let font = FontFace::builtin();
        for brand in ["BMW", "Volkswagen"] {
            let width = font.text_width(brand, 48.0);
            let canvas = car_scene(brand, "X", &font);
            let x = canvas
                .commands()
                .iter()
                .find_map(|c| match c {
                    PaintCommand::Text { x, text, .. } if text == brand => Some(*x),
                    _ => None,
                })
                .expect("brand text command");
            assert_eq!(x, (800 - width as i32) / 2, "{}", brand);
            assert_eq!(x, centered_x(800, width));
        }
    }

    #[test]
    fn same_inputs_render_identical_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let composer = PlaceholderComposer::new(&config_in(dir.path()));
        let a = fingerprint(&composer.render_raster("Renault", "Clio"));
        let b = fingerprint(&composer.render_raster("Renault", "Clio"));
        assert_eq!(a, b);
    }
}
