//! Base64URL encoding/decoding per RFC 4648
//!
//! Tokens are always produced without padding. Decoding picks one of four
//! engines from two independent switches: whether `=` padding is accepted,
//! and whether non-canonical encodings are rejected.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine, alphabet};

const fn engine(padded: bool, strict: bool) -> GeneralPurpose {
    let mode = if padded {
        DecodePaddingMode::RequireCanonical
    } else {
        DecodePaddingMode::RequireNone
    };
    GeneralPurpose::new(
        &alphabet::URL_SAFE,
        GeneralPurposeConfig::new()
            .with_encode_padding(padded)
            .with_decode_padding_mode(mode)
            .with_decode_allow_trailing_bits(!strict),
    )
}

const RAW: GeneralPurpose = engine(false, false);
const RAW_STRICT: GeneralPurpose = engine(false, true);
const PADDED: GeneralPurpose = engine(true, false);
const PADDED_STRICT: GeneralPurpose = engine(true, true);

/// Encode bytes to unpadded Base64URL
pub fn encode_bytes(input: &[u8]) -> String {
    RAW.encode(input)
}

/// Encode string to unpadded Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode one compact segment
///
/// With `padding_allowed`, short input is padded with `=` to a multiple of four
/// characters and decoded with the padded alphabet. With `strict`, encodings
/// carrying non-zero trailing bits are rejected. Line breaks are skipped in
/// every mode.
pub fn decode_segment(
    segment: &str,
    padding_allowed: bool,
    strict: bool,
) -> Result<Vec<u8>, DecodeError> {
    let mut input = segment.replace(['\r', '\n'], "");

    if padding_allowed {
        let rem = input.len() % 4;
        if rem > 0 {
            input.extend(std::iter::repeat_n('=', 4 - rem));
        }
    }

    let engine = match (padding_allowed, strict) {
        (false, false) => &RAW,
        (false, true) => &RAW_STRICT,
        (true, false) => &PADDED,
        (true, true) => &PADDED_STRICT,
    };
    engine.decode(input)
}
