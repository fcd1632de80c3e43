//! Price-embedded barcode decoding.
//!
//! Layout of the 12 digit code, 0-indexed:
//! - `[0, 2)`   prefix, ignored
//! - `[2, 6)`   product code, kept zero padded
//! - `[6, 11)`  price in cents
//! - `[11]`     check digit, not validated

use crate::error::DecodeError;

const BARCODE_LEN: usize = 12;
const PRODUCT_CODE: std::ops::Range<usize> = 2..6;
const PRICE_CENTS: std::ops::Range<usize> = 6..11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBarcode {
    pub product_code: String,
    pub price_cents: u32,
}

impl DecodedBarcode {
    /// Embedded price in dollars.
    pub fn embedded_price(&self) -> f64 {
        f64::from(self.price_cents) / 100.0
    }
}

pub fn decode(raw: &str) -> Result<DecodedBarcode, DecodeError> {
    if raw.len() != BARCODE_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedInput);
    }

    // All ASCII digits, so byte ranges are char boundaries and the parse cannot overflow.
    let product_code = raw[PRODUCT_CODE].to_owned();
    let price_cents = raw[PRICE_CENTS]
        .parse::<u32>()
        .map_err(|_| DecodeError::MalformedInput)?;

    Ok(DecodedBarcode {
        product_code,
        price_cents,
    })
}
