//! # qrlogo
//!
//! A QR code generator with Reed-Solomon error correction that stamps a logo
//! onto the center of the symbol and saves the result as PNG.
//!
//! ## Features
//!
//! - **QR Code Generation**: Model 2 symbols, versions 1-40, error correction levels L, M, Q and H
//! - **Automatic Sizing**: The smallest version that fits the payload is chosen
//! - **Mask Selection**: All eight masks are scored and the lowest penalty wins
//! - **Rendering**: Square modules on a light canvas with a configurable quiet zone
//! - **Logo Compositing**: Opaque logos are pasted, logos with alpha are blended
//!
//! ## Quick Start
//!
//! ### Payload to image
//!
//! ```rust,no_run
//! use qrlogo::Generator;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gen = Generator::default();
//! let saved = gen.generate_to(
//!     "https://example.com",
//!     Some(Path::new("logo.png")),
//!     Path::new("code.png"),
//! )?;
//! println!("Saved {}", saved.display());
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrlogo::{render, ECLevel, MaskPattern, Mode, QRBuilder, RenderOptions, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"HELLO WORLD")
//!     .version(Version::new(2)?)       // if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::M)            // if not provided, defaults to ECLevel::H
//!     .mode(Mode::Alphanumeric)        // if not provided, defaults to Mode::Byte
//!     .mask(MaskPattern::new(3)?)      // if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = render(&qr, &RenderOptions { module_size: 4, ..Default::default() })?;
//! assert_eq!(img.width(), (25 + 4) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! [`Generator`] always encodes at H since the logo hides part of the symbol.

pub mod builder;
pub mod common;
pub mod compose;
pub mod config;
pub mod generator;
pub mod logging;
pub mod render;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use compose::{load_logo, overlay, preview_logo, LogoSize};
pub use config::Config;
pub use generator::{save_png, Generator, GeneratorOptions};
pub use render::{render, RenderOptions};

/// Encodes `payload` as bytes at `ecl` in the smallest fitting version,
/// with the mask chosen by penalty score.
pub fn encode(payload: &str, ecl: ECLevel) -> QRResult<QR> {
    QRBuilder::new(payload.as_bytes()).ec_level(ecl).build()
}

#[cfg(feature = "benchmark")]
pub mod benchmark {
    use std::time::{Duration, Instant};

    /// Runs `f` `iters` times and returns the mean wall time per run.
    pub fn time<F: FnMut()>(iters: u32, mut f: F) -> Duration {
        let start = Instant::now();
        for _ in 0..iters {
            f();
        }
        start.elapsed() / iters.max(1)
    }
}
