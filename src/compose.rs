//! Logo loading and compositing onto a rendered symbol.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbImage};
use tracing::{debug, warn};

use crate::common::error::{QRError, QRResult};

/// Largest share of the base image width a logo may take. Wider logos are
/// shrunk to this bound.
pub const MAX_LOGO_FRACTION: f32 = 0.25;

/// File extensions accepted by [`load_logo`], compared case-insensitively.
pub const LOGO_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "ico"];

/// Bounding box of the preview returned by [`preview_logo`].
pub const PREVIEW_SIZE: u32 = 100;

/// Width of the logo once pasted. The height follows the logo's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogoSize {
    /// Width in pixels, capped at `MAX_LOGO_FRACTION` of the base width.
    Fixed(u32),
    /// Share of the base image width, in `(0, MAX_LOGO_FRACTION]`.
    Fraction(f32),
}

impl Default for LogoSize {
    fn default() -> Self {
        Self::Fixed(100)
    }
}

impl LogoSize {
    /// Pixel width on a base `base_width` pixels wide, never above
    /// `floor(base_width * MAX_LOGO_FRACTION)`.
    pub fn target_width(self, base_width: u32) -> QRResult<u32> {
        let requested = match self {
            Self::Fixed(w) => w,
            Self::Fraction(f) if f > 0.0 && f <= MAX_LOGO_FRACTION => {
                (base_width as f32 * f).round() as u32
            }
            Self::Fraction(f) => {
                return Err(QRError::Compositing(format!(
                    "Logo fraction {f} is outside (0, {MAX_LOGO_FRACTION}]"
                )))
            }
        };

        let max = max_logo_width(base_width);
        if requested > max {
            warn!("Logo width {requested} exceeds {MAX_LOGO_FRACTION} of {base_width} px, using {max}");
            return Ok(max);
        }
        Ok(requested)
    }
}

fn max_logo_width(base_width: u32) -> u32 {
    (base_width as f64 * MAX_LOGO_FRACTION as f64).floor() as u32
}

// trunc(lh * tw / lw)
fn scaled_height(lw: u32, lh: u32, tw: u32) -> QRResult<u32> {
    u32::try_from(lh as u64 * tw as u64 / lw as u64).map_err(|_| {
        QRError::Compositing(format!("Logo of {lw}x{lh} is too tall to resize to width {tw}"))
    })
}

/// Returns a copy of `base` with the logo resized and pasted at its center.
///
/// Logos without an alpha channel overwrite the covered pixels, logos with one
/// are alpha-blended over the symbol.
pub fn overlay(base: &RgbImage, logo: &DynamicImage, size: LogoSize) -> QRResult<RgbImage> {
    let (bw, bh) = base.dimensions();
    let (lw, lh) = logo.dimensions();
    if lw == 0 || lh == 0 {
        return Err(QRError::Compositing("Logo has no pixels".to_string()));
    }

    let tw = size.target_width(bw)?;
    let th = scaled_height(lw, lh, tw)?;
    if tw == 0 || th == 0 {
        return Err(QRError::Compositing(format!("Logo resized to {tw}x{th} has no pixels")));
    }
    if tw > bw || th > bh {
        return Err(QRError::Compositing(format!(
            "Logo of {tw}x{th} does not fit the {bw}x{bh} image"
        )));
    }
    if tw as u64 * th as u64 * 10 > bw as u64 * bh as u64 {
        warn!("Logo covers over 10% of the symbol, it may not scan");
    }

    let x = ((bw - tw) / 2) as i64;
    let y = ((bh - th) / 2) as i64;
    debug!("Pasting {lw}x{lh} logo as {tw}x{th} at ({x}, {y})");

    if logo.color().has_alpha() {
        let resized = imageops::resize(&logo.to_rgba8(), tw, th, FilterType::CatmullRom);
        let mut canvas = DynamicImage::ImageRgb8(base.clone()).into_rgba8();
        imageops::overlay(&mut canvas, &resized, x, y);
        Ok(DynamicImage::ImageRgba8(canvas).into_rgb8())
    } else {
        let resized = imageops::resize(&logo.to_rgb8(), tw, th, FilterType::CatmullRom);
        let mut canvas = base.clone();
        imageops::replace(&mut canvas, &resized, x, y);
        Ok(canvas)
    }
}

/// Decodes a logo, rejecting files whose extension is not in [`LOGO_EXTENSIONS`].
pub fn load_logo(path: &Path) -> QRResult<DynamicImage> {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext {
        Some(ext) if LOGO_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(QRError::LogoDecode(format!(
                "{} is not one of {}",
                path.display(),
                LOGO_EXTENSIONS.join(", ")
            )))
        }
    }
    let logo =
        image::open(path).map_err(|e| QRError::LogoDecode(format!("{}: {e}", path.display())))?;
    debug!("Loaded {}x{} logo from {}", logo.width(), logo.height(), path.display());
    Ok(logo)
}

/// Loads the logo and scales it down to fit a [`PREVIEW_SIZE`] square.
pub fn preview_logo(path: &Path) -> QRResult<DynamicImage> {
    Ok(load_logo(path)?.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE))
}

#[cfg(test)]
mod compose_tests {
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use test_case::test_case;

    use super::{load_logo, overlay, preview_logo, scaled_height, LogoSize, MAX_LOGO_FRACTION};
    use crate::common::error::QRError;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    fn near(a: Rgb<u8>, b: Rgb<u8>) -> bool {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
    }

    fn red_logo(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, RED))
    }

    #[test]
    fn test_fixed_logo_is_centered() {
        let base = RgbImage::from_pixel(400, 400, WHITE);
        let out = overlay(&base, &red_logo(50, 50), LogoSize::default()).unwrap();
        assert_eq!(out.dimensions(), base.dimensions());
        // 100x100 at (150, 150)
        assert!(near(*out.get_pixel(150, 150), RED));
        assert!(near(*out.get_pixel(249, 249), RED));
        assert_eq!(*out.get_pixel(149, 200), WHITE);
        assert_eq!(*out.get_pixel(250, 200), WHITE);
        assert_eq!(*out.get_pixel(200, 149), WHITE);
        assert_eq!(*out.get_pixel(200, 250), WHITE);
        // Base is left as it was
        assert!(base.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_fixed_logo_is_clamped() {
        assert_eq!(LogoSize::Fixed(100).target_width(250), Ok(62));
        assert_eq!(LogoSize::Fixed(100).target_width(400), Ok(100));
        assert_eq!(LogoSize::Fixed(u32::MAX).target_width(1000), Ok(250));

        let base = RgbImage::from_pixel(250, 250, WHITE);
        let out = overlay(&base, &red_logo(50, 50), LogoSize::Fixed(100)).unwrap();
        // 62x62 at (94, 94)
        assert!(near(*out.get_pixel(94, 94), RED));
        assert!(near(*out.get_pixel(155, 155), RED));
        assert_eq!(*out.get_pixel(93, 125), WHITE);
        assert_eq!(*out.get_pixel(156, 125), WHITE);
        assert_eq!(*out.get_pixel(125, 93), WHITE);
        assert_eq!(*out.get_pixel(125, 156), WHITE);
    }

    #[test]
    fn test_aspect_ratio() {
        let base = RgbImage::from_pixel(400, 400, WHITE);
        let out = overlay(&base, &red_logo(80, 40), LogoSize::Fixed(100)).unwrap();
        // 100x50 at (150, 175)
        assert!(near(*out.get_pixel(150, 175), RED));
        assert!(near(*out.get_pixel(249, 224), RED));
        assert_eq!(*out.get_pixel(200, 174), WHITE);
        assert_eq!(*out.get_pixel(200, 225), WHITE);
    }

    #[test]
    fn test_fraction() {
        let base = RgbImage::from_pixel(290, 290, WHITE);
        assert_eq!(LogoSize::Fraction(0.2).target_width(290), Ok(58));
        // round(72.5) is pulled back to the 72 px bound
        assert_eq!(LogoSize::Fraction(MAX_LOGO_FRACTION).target_width(290), Ok(72));
        let out = overlay(&base, &red_logo(10, 10), LogoSize::Fraction(0.2)).unwrap();
        // 58x58 at (116, 116)
        assert!(near(*out.get_pixel(116, 116), RED));
        assert!(near(*out.get_pixel(173, 173), RED));
        assert_eq!(*out.get_pixel(115, 145), WHITE);
        assert_eq!(*out.get_pixel(174, 145), WHITE);
    }

    #[test_case(0.0)]
    #[test_case(-0.1)]
    #[test_case(MAX_LOGO_FRACTION + 0.01)]
    #[test_case(0.3)]
    #[test_case(f32::NAN)]
    fn test_fraction_out_of_range(f: f32) {
        let base = RgbImage::from_pixel(100, 100, WHITE);
        let res = overlay(&base, &red_logo(10, 10), LogoSize::Fraction(f));
        assert!(matches!(res, Err(QRError::Compositing(_))));
    }

    #[test]
    fn test_degenerate_geometry() {
        let base = RgbImage::from_pixel(100, 100, WHITE);
        let zero = overlay(&base, &red_logo(10, 10), LogoSize::Fixed(0));
        assert!(matches!(zero, Err(QRError::Compositing(_))));
        // 100x1 logo shrunk to 25 wide truncates to zero height
        let flat = overlay(&base, &red_logo(100, 1), LogoSize::Fixed(50));
        assert!(matches!(flat, Err(QRError::Compositing(_))));
        // 10 wide makes a 1x200 logo 2000 tall
        let tall = overlay(&base, &red_logo(1, 200), LogoSize::Fixed(10));
        assert!(matches!(tall, Err(QRError::Compositing(_))));
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let res = overlay(&base, &empty, LogoSize::Fixed(50));
        assert!(matches!(res, Err(QRError::Compositing(_))));
    }

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height(80, 40, 100), Ok(50));
        assert_eq!(scaled_height(3, 2, 10), Ok(6));
        assert!(matches!(scaled_height(1, u32::MAX, 2), Err(QRError::Compositing(_))));
    }

    #[test]
    fn test_alpha_blending() {
        let base = RgbImage::from_pixel(100, 100, WHITE);
        let clear = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 0])));
        let out = overlay(&base, &clear, LogoSize::Fixed(20)).unwrap();
        assert_eq!(out, base);

        let half = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 128])));
        let out = overlay(&base, &half, LogoSize::Fixed(20)).unwrap();
        assert!(near(*out.get_pixel(50, 50), Rgb([255, 127, 127])));
        assert_eq!(*out.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn test_load_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.PNG");
        RgbImage::from_pixel(240, 120, RED).save_with_format(&path, image::ImageFormat::Png).unwrap();
        let logo = load_logo(&path).unwrap();
        assert_eq!(logo.dimensions(), (240, 120));
        let preview = preview_logo(&path).unwrap();
        assert_eq!(preview.dimensions(), (100, 50));
    }

    #[test]
    fn test_load_logo_errors() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("logo.txt");
        std::fs::write(&text, b"not an image").unwrap();
        assert!(matches!(load_logo(&text), Err(QRError::LogoDecode(_))));

        let corrupt = dir.path().join("logo.png");
        std::fs::write(&corrupt, b"not an image").unwrap();
        assert!(matches!(load_logo(&corrupt), Err(QRError::LogoDecode(_))));

        let missing = dir.path().join("missing.jpg");
        assert!(matches!(load_logo(&missing), Err(QRError::LogoDecode(_))));
        assert!(matches!(preview_logo(&missing), Err(QRError::LogoDecode(_))));
    }
}
