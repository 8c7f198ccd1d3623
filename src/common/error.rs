use thiserror::Error;

use super::metadata::ECLevel;

// Error
//------------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum QRError {
    // Symbol encoder
    #[error("Payload is empty")]
    EmptyPayload,

    #[error("Payload of {len} bytes does not fit any QR version at error correction level {ec_level:?}")]
    PayloadTooLarge { len: usize, ec_level: ECLevel },

    #[error("Character {0:?} cannot be encoded in the selected mode")]
    UnsupportedCharacter(char),

    #[error("Invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),

    #[error("Invalid masking pattern {0}, expected 0 to 7")]
    InvalidMaskPattern(u8),

    // Renderer
    #[error("Module size and quiet zone must be positive")]
    InvalidRenderSize,

    // Compositor
    #[error("Failed to decode logo: {0}")]
    LogoDecode(String),

    #[error("Failed to composite logo: {0}")]
    Compositing(String),

    // Output & setup
    #[error("Failed to save image: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type QRResult<T> = Result<T, QRError>;
