//! End-to-end pipeline from payload text to a finished image on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::common::error::{QRError, QRResult};
use crate::common::metadata::ECLevel;
use crate::compose::{load_logo, overlay, LogoSize};
use crate::render::{render, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeneratorOptions {
    pub render: RenderOptions,
    pub logo_size: LogoSize,
}

/// Encodes at level H so a centered logo stays within the error correction budget.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    opts: GeneratorOptions,
}

impl Generator {
    pub fn new(opts: GeneratorOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.opts
    }

    /// Builds the image for `payload`, trimmed of surrounding whitespace, with
    /// the logo at `logo` pasted in the middle when given.
    pub fn generate(&self, payload: &str, logo: Option<&Path>) -> QRResult<RgbImage> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(QRError::EmptyPayload);
        }

        let qr = crate::encode(payload, ECLevel::H)?;
        let img = render(&qr, &self.opts.render)?;
        debug!("Rendered version {} symbol at {}x{}", *qr.version(), img.width(), img.height());

        let img = match logo {
            Some(path) => overlay(&img, &load_logo(path)?, self.opts.logo_size)?,
            None => img,
        };
        info!(
            "Generated {}x{} image for {} byte payload{}",
            img.width(),
            img.height(),
            payload.len(),
            if logo.is_some() { " with logo" } else { "" }
        );
        Ok(img)
    }

    /// Generates and saves in one go. Nothing is written when generation fails.
    pub fn generate_to(
        &self,
        payload: &str,
        logo: Option<&Path>,
        output: &Path,
    ) -> QRResult<PathBuf> {
        let img = self.generate(payload, logo)?;
        save_png(&img, output)
    }
}

/// Writes the image as PNG, appending `.png` when `path` has no extension.
///
/// The bytes go to a hidden sibling file first and are renamed over the
/// target, so a failed write leaves no partial file behind. Returns the final path.
pub fn save_png(image: &RgbImage, path: &Path) -> QRResult<PathBuf> {
    let target = match path.extension() {
        Some(_) => path.to_path_buf(),
        None => path.with_extension("png"),
    };
    let file_name = target
        .file_name()
        .ok_or_else(|| QRError::Persistence(format!("{} has no file name", target.display())))?;
    let tmp = target.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    if let Err(e) = image.save_with_format(&tmp, ImageFormat::Png) {
        let _ = fs::remove_file(&tmp);
        return Err(QRError::Persistence(format!("{}: {e}", target.display())));
    }
    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(QRError::Persistence(format!("{}: {e}", target.display())));
    }

    info!("Saved {}", target.display());
    Ok(target)
}
