use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use test_case::test_case;

use qrlogo::*;

const RED: Rgb<u8> = Rgb([255, 0, 0]);

fn write_logo(dir: &Path, name: &str, img: DynamicImage) -> std::path::PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn near(a: Rgb<u8>, b: Rgb<u8>) -> bool {
    a.0.iter().zip(b.0.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

#[test]
fn test_scenario_hello_with_logo() {
    let dir = tempfile::tempdir().unwrap();
    let logo = write_logo(
        dir.path(),
        "logo.png",
        DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, RED)),
    );

    let gen = Generator::default();
    let plain = gen.generate("HELLO", None).unwrap();
    let stamped = gen.generate("HELLO", Some(&logo)).unwrap();
    assert_eq!(plain.dimensions(), stamped.dimensions());
    assert_eq!(stamped.dimensions(), (250, 250));

    // 100 px asked for, held to a quarter of the width: 62 px at (94, 94)
    for (x, y) in [(94, 94), (155, 94), (94, 155), (155, 155), (125, 125)] {
        assert!(near(*stamped.get_pixel(x, y), RED), "({x}, {y})");
    }
    for (x, y) in [(93, 125), (156, 125), (125, 93), (125, 156)] {
        assert_eq!(stamped.get_pixel(x, y), plain.get_pixel(x, y), "({x}, {y})");
    }

    let gray = DynamicImage::ImageRgb8(stamped).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, content) = grids[0].decode().unwrap();
    assert_eq!(content, "HELLO");
}

#[test_case("HELLO")]
#[test_case("Hello, world!")]
#[test_case("https://example.com")]
fn test_default_logo_still_decodes(payload: &str) {
    let dir = tempfile::tempdir().unwrap();
    let logo = write_logo(
        dir.path(),
        "logo.png",
        DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, RED)),
    );

    let img = Generator::default().generate(payload, Some(&logo)).unwrap();
    let gray = DynamicImage::ImageRgb8(img).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, content) = grids[0].decode().unwrap();
    assert_eq!(content, payload);
}

#[test]
fn test_logo_with_alpha_keeps_symbol_visible() {
    let dir = tempfile::tempdir().unwrap();
    let mut logo = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 0]));
    for y in 10..30 {
        for x in 10..30 {
            logo.put_pixel(x, y, Rgba([0, 0, 255, 255]));
        }
    }
    let path = write_logo(dir.path(), "logo.png", DynamicImage::ImageRgba8(logo));

    let gen = Generator::default();
    let plain = gen.generate("HELLO", None).unwrap();
    let stamped = gen.generate("HELLO", Some(&path)).unwrap();
    // Transparent border shows the symbol underneath
    assert_eq!(stamped.get_pixel(80, 80), plain.get_pixel(80, 80));
    assert!(near(*stamped.get_pixel(125, 125), Rgb([0, 0, 255])));
}

#[test]
fn test_symbol_with_logo_still_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let logo = write_logo(
        dir.path(),
        "logo.png",
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, RED)),
    );

    let opts = GeneratorOptions { logo_size: LogoSize::Fraction(0.2), ..Default::default() };
    let img = Generator::new(opts).generate("https://example.com", Some(&logo)).unwrap();

    let gray = DynamicImage::ImageRgb8(img).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, content) = grids[0].decode().unwrap();
    assert_eq!(content, "https://example.com");
}

#[test]
fn test_generate_to_with_bad_logo_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.gif");
    std::fs::write(&logo, b"GIF89a?").unwrap();
    let target = dir.path().join("out.png");

    let res = Generator::default().generate_to("HELLO", Some(&logo), &target);
    assert!(matches!(res, Err(QRError::LogoDecode(_))));
    assert!(!target.exists());
}

#[test]
fn test_generate_to_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let saved = Generator::default().generate_to("HELLO", None, &dir.path().join("hello")).unwrap();
    assert_eq!(saved.extension().unwrap(), "png");

    let loaded = image::open(&saved).unwrap();
    assert!(matches!(loaded, DynamicImage::ImageRgb8(_)));
    assert_eq!(loaded.into_rgb8(), Generator::default().generate("HELLO", None).unwrap());
}
