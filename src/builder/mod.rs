mod qr;

pub use qr::{Module, QR};

use tracing::debug;

use crate::common::{
    codec::{encode, encode_with_version, Mode},
    ec::{ecc, interleave},
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mode: Mode,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::H, mode: Mode::Byte, mask: None }
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {:?}, Ec level: {:?}, Mode: {:?} }}",
                *v, self.ec_level, self.mode
            ),
            None => format!(
                "{{ Version: None, Ec level: {:?}, Mode: {:?} }}",
                self.ec_level, self.mode
            ),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyPayload);
        }

        // Encode data
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, v, self.ec_level, self.mode)?, v),
            None => encode(self.data, self.ec_level, self.mode)?,
        };

        // Compute error correction codewords & interleave them after the data codewords
        let (data_blocks, ecc_blocks) = ecc(encoded_data.data(), version, self.ec_level);
        let mut payload = interleave(&data_blocks);
        payload.extend(interleave(&ecc_blocks));
        debug_assert_eq!(
            payload.len(),
            version.total_codewords(),
            "Payload length doesn't match total codewords"
        );

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        let total_modules = qr.width() * qr.width();
        debug!(
            "QR generated: version {}, mask {}, {} data bytes in {} codewords, dark modules {}%",
            *version,
            *mask,
            self.data.len(),
            payload.len(),
            qr.count_dark_modules() * 100 / total_modules
        );

        Ok(qr)
    }
}
