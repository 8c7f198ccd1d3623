use tracing::debug;

use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    #[default]
    Byte = 0b0100,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
        }
    }

    fn chunk_size(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte => 1,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub mode: Mode,
    pub len_bits: usize, // Bit len of char count
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, ver: Version, data: &'a [u8]) -> Self {
        Self { mode, len_bits: ver.char_cnt_bits(mode), data }
    }

    pub fn bit_len(&self) -> usize {
        MODE_INDICATOR_BIT_LEN + self.len_bits + self.mode.encoded_len(self.data.len())
    }
}

// Encoder
//------------------------------------------------------------------------------

/// Encodes the data as a single segment in the smallest version that fits.
pub fn encode(data: &[u8], ecl: ECLevel, mode: Mode) -> QRResult<(BitStream, Version)> {
    validate(data, mode)?;
    let ver = Version::all()
        .find(|&v| Segment::new(mode, v, data).bit_len() <= v.data_bit_capacity(ecl))
        .ok_or(QRError::PayloadTooLarge { len: data.len(), ec_level: ecl })?;
    debug!("Selected version {} for {} bytes at level {ecl:?} in {mode:?} mode", *ver, data.len());
    Ok((write(Segment::new(mode, ver, data), ver, ecl), ver))
}

pub fn encode_with_version(
    data: &[u8],
    ver: Version,
    ecl: ECLevel,
    mode: Mode,
) -> QRResult<BitStream> {
    validate(data, mode)?;
    let seg = Segment::new(mode, ver, data);
    if seg.bit_len() > ver.data_bit_capacity(ecl) {
        return Err(QRError::PayloadTooLarge { len: data.len(), ec_level: ecl });
    }
    Ok(write(seg, ver, ecl))
}

fn validate(data: &[u8], mode: Mode) -> QRResult<()> {
    if data.is_empty() {
        return Err(QRError::EmptyPayload);
    }
    match data.iter().find(|b| !mode.contains(**b)) {
        Some(&b) => Err(QRError::UnsupportedCharacter(b as char)),
        None => Ok(()),
    }
}

fn write(seg: Segment, ver: Version, ecl: ECLevel) -> BitStream {
    let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
    writer::push_segment(seg, &mut bs);
    writer::push_terminator(&mut bs);
    writer::pad_remaining_capacity(&mut bs);
    bs
}


// Writer for encoded data
//------------------------------------------------------------------------------

mod writer {
    use super::{Segment, MODE_INDICATOR_BIT_LEN, PADDING_CODEWORDS};
    use crate::common::bitstream::BitStream;

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        for chunk in seg.data.chunks(seg.mode.chunk_size()) {
            out.push_bits(seg.mode.encode_chunk(chunk), seg.mode.encoded_len(chunk.len()));
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u16, MODE_INDICATOR_BIT_LEN);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    pub fn push_terminator(out: &mut BitStream) {
        let term_len = std::cmp::min(4, out.capacity() - out.len());
        out.push_bits(0, term_len);
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(out.len() & 7 == 0, "Bit offset should be zero before padding codewords");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc as u16, 8);
        });
    }

}

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

const MODE_INDICATOR_BIT_LEN: usize = 4;
