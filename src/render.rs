//! Rasterizes a module matrix into an RGB image.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::builder::QR;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per module side.
    pub module_size: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
    pub dark: Rgb<u8>,
    pub light: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { module_size: 10, quiet_zone: 2, dark: Rgb([0, 0, 0]), light: Rgb([255, 255, 255]) }
    }
}

impl RenderOptions {
    /// Side of the rendered square in pixels for a symbol `width` modules wide.
    pub fn image_side(&self, width: usize) -> QRResult<u32> {
        if self.module_size == 0 || self.quiet_zone == 0 {
            return Err(QRError::InvalidRenderSize);
        }
        let side = u32::try_from(width)
            .ok()
            .and_then(|w| self.quiet_zone.checked_mul(2)?.checked_add(w))
            .and_then(|modules| modules.checked_mul(self.module_size))
            .filter(|&side| side <= i32::MAX as u32)
            .ok_or(QRError::InvalidRenderSize)?;
        Ok(side)
    }
}

/// Paints every dark module as a filled square over a light canvas that
/// includes the quiet zone.
pub fn render(qr: &QR, opts: &RenderOptions) -> QRResult<RgbImage> {
    let side = opts.image_side(qr.width())?;
    let mut canvas = RgbImage::from_pixel(side, side, opts.light);

    let w = qr.width() as i16;
    let ms = opts.module_size;
    for r in 0..w {
        for c in 0..w {
            if *qr.get(r, c) != Color::Dark {
                continue;
            }
            let x = (opts.quiet_zone + c as u32) * ms;
            let y = (opts.quiet_zone + r as u32) * ms;
            draw_filled_rect_mut(&mut canvas, Rect::at(x as i32, y as i32).of_size(ms, ms), opts.dark);
        }
    }

    Ok(canvas)
}
