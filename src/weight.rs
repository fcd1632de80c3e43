use crate::error::DivisionError;

/// Weight in pounds implied by a label price. Full precision; rounding happens on display.
pub fn derive_weight(embedded_price: f64, price_per_pound: f64) -> Result<f64, DivisionError> {
    if !(price_per_pound.is_finite() && price_per_pound > 0.0) {
        return Err(DivisionError::ZeroOrNegativeDivisor);
    }

    Ok(embedded_price / price_per_pound)
}

/// Rounds to the nearest half pound, ties going up.
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_weight_divides() {
        assert_eq!(derive_weight(2.00, 4.00), Ok(0.5));
        assert_eq!(derive_weight(508.00, 4.0), Ok(127.0));
        assert_eq!(derive_weight(0.0, 3.49), Ok(0.0));
    }

    #[test]
    fn derive_weight_keeps_full_precision() {
        let weight = derive_weight(10.00, 3.00).unwrap();

        assert!((weight - 3.333_333_333_333_333).abs() < 1e-12);
    }

    #[test]
    fn derive_weight_zero_divisor() {
        assert_eq!(
            derive_weight(1.00, 0.0),
            Err(DivisionError::ZeroOrNegativeDivisor)
        );
    }

    #[test]
    fn derive_weight_negative_or_nan_divisor() {
        assert_eq!(
            derive_weight(1.00, -2.5),
            Err(DivisionError::ZeroOrNegativeDivisor)
        );
        assert_eq!(
            derive_weight(1.00, f64::NAN),
            Err(DivisionError::ZeroOrNegativeDivisor)
        );
        assert_eq!(
            derive_weight(1.00, f64::INFINITY),
            Err(DivisionError::ZeroOrNegativeDivisor)
        );
    }

    #[test]
    fn round_to_half_nearest() {
        assert_eq!(round_to_half(1.24), 1.0);
        assert_eq!(round_to_half(1.26), 1.5);
        assert_eq!(round_to_half(0.74), 0.5);
        assert_eq!(round_to_half(0.76), 1.0);
        assert_eq!(round_to_half(127.0), 127.0);
        assert_eq!(round_to_half(0.0), 0.0);
        assert_eq!(round_to_half(0.24999999999999997), 0.0);
        assert_eq!(round_to_half(0.7499999999999999), 0.5);
    }

    #[test]
    fn round_to_half_ties_up() {
        assert_eq!(round_to_half(1.25), 1.5);
        assert_eq!(round_to_half(0.75), 1.0);
        assert_eq!(round_to_half(0.25), 0.5);
    }
}
