//! Number formatting for pgfplots input.

/// Fixed-point with six fractional digits, `.` separator, no exponent.
///
/// Non-finite values map to the tokens pgfplots understands (`nan`, `inf`, `-inf`).
pub fn fixed(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.6}", v)
    }
}

/// A coordinate pair as it appears inside `coordinates { ... }`.
pub fn coordinate(x: f64, y: f64) -> String {
    format!("({},{})", fixed(x), fixed(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digits_no_exponent() {
        assert_eq!(fixed(0.0), "0.000000");
        assert_eq!(fixed(-1.1), "-1.100000");
        assert_eq!(fixed(1e-9), "0.000000");
        assert_eq!(fixed(1.5e12), "1500000000000.000000");
    }

    #[test]
    fn non_finite_tokens() {
        assert_eq!(fixed(f64::NAN), "nan");
        assert_eq!(fixed(f64::INFINITY), "inf");
        assert_eq!(fixed(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn coordinate_pair() {
        assert_eq!(coordinate(1.0, 0.5), "(1.000000,0.500000)");
    }
}
