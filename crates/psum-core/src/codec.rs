//! Canonical text codec for exact rational results.
//!
//! The wire form is the decimal literal `[-]numerator[/denominator]`, with the
//! denominator omitted when it is 1. Buffers are sized from the value's digit
//! count before anything is written, and a value whose text is longer than the
//! transport ceiling is refused instead of truncated.

use std::io::Write;

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::arith::decimal_digits_upper_bound;
use crate::constants::CODEC_OVERHEAD;
use crate::error::ReduceError;

/// Upper bound on the encoded length of `value`, used to size the buffer.
///
/// Numerator digits plus denominator digits plus [`CODEC_OVERHEAD`].
#[must_use]
pub fn encoded_size(value: &BigRational) -> usize {
    decimal_digits_upper_bound(value.numer().magnitude())
        + decimal_digits_upper_bound(value.denom().magnitude())
        + CODEC_OVERHEAD
}

/// Encode `value` into its canonical text form.
///
/// # Errors
///
/// Returns [`ReduceError::TransportAllocation`] when the canonical text is
/// longer than `limit` bytes or the buffer cannot be reserved.
///
/// # Example
/// ```
/// use num_rational::BigRational;
/// use num_bigint::BigInt;
/// use psum_core::codec::{decode, encode};
///
/// let v = BigRational::new(BigInt::from(-3), BigInt::from(6));
/// let bytes = encode(&v, 64).unwrap();
/// assert_eq!(bytes, b"-1/2");
/// assert_eq!(decode(&bytes, 64).unwrap(), v);
/// ```
pub fn encode(value: &BigRational, limit: usize) -> Result<Vec<u8>, ReduceError> {
    let requested = encoded_size(value);
    let mut buf = Vec::new();
    buf.try_reserve_exact(requested.min(limit))
        .map_err(|_| ReduceError::TransportAllocation { requested, limit })?;

    write!(buf, "{}", value.numer())
        .map_err(|e| ReduceError::MalformedResult(format!("encode failed: {e}")))?;
    if !value.denom().is_one() {
        write!(buf, "/{}", value.denom())
            .map_err(|e| ReduceError::MalformedResult(format!("encode failed: {e}")))?;
    }

    debug_assert!(buf.len() <= requested, "digit bound undercounted");
    if buf.len() > limit {
        return Err(ReduceError::TransportAllocation {
            requested: buf.len(),
            limit,
        });
    }
    Ok(buf)
}

/// Decode a canonical rational literal.
///
/// Accepts `[-]digits[/digits]` with a non-zero denominator; a non-reduced
/// fraction is normalised. Anything else, including surrounding whitespace,
/// a `+` sign or digit separators, is rejected.
///
/// # Errors
///
/// Returns [`ReduceError::MalformedResult`] when the input is longer than
/// `limit` bytes or is not a complete rational literal.
pub fn decode(bytes: &[u8], limit: usize) -> Result<BigRational, ReduceError> {
    if bytes.len() > limit {
        return Err(ReduceError::MalformedResult(format!(
            "encoded value of {} bytes exceeds the {limit}-byte limit",
            bytes.len()
        )));
    }

    let (negative, body) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let mut parts = body.splitn(2, |&b| b == b'/');
    let numer_digits = parts.next().unwrap_or_default();
    let denom_digits = parts.next();

    let numer = parse_digits(numer_digits, "numerator")?;
    let numer = if negative {
        BigInt::from_biguint(Sign::Minus, numer)
    } else {
        BigInt::from_biguint(Sign::Plus, numer)
    };

    let denom = match denom_digits {
        None => BigInt::one(),
        Some(digits) => {
            let d = parse_digits(digits, "denominator")?;
            if d.is_zero() {
                return Err(ReduceError::MalformedResult("zero denominator".into()));
            }
            BigInt::from_biguint(Sign::Plus, d)
        }
    };

    Ok(BigRational::new(numer, denom))
}

fn parse_digits(digits: &[u8], part: &str) -> Result<num_bigint::BigUint, ReduceError> {
    if digits.is_empty() {
        return Err(ReduceError::MalformedResult(format!("empty {part}")));
    }
    if let Some(pos) = digits.iter().position(|b| !b.is_ascii_digit()) {
        return Err(ReduceError::MalformedResult(format!(
            "unexpected byte 0x{:02x} in {part} at offset {pos}",
            digits[pos]
        )));
    }
    num_bigint::BigUint::parse_bytes(digits, 10)
        .ok_or_else(|| ReduceError::MalformedResult(format!("unparsable {part}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::factorial;
    use crate::constants::DEFAULT_MAX_MESSAGE_BYTES;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn encode_integer_has_no_denominator() {
        let bytes = encode(&rat(55, 1), DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        assert_eq!(bytes, b"55");
    }

    #[test]
    fn encode_fraction_and_sign() {
        assert_eq!(encode(&rat(3, 4), 16).unwrap(), b"3/4");
        assert_eq!(encode(&rat(-3, 4), 16).unwrap(), b"-3/4");
        assert_eq!(encode(&rat(0, 9), 16).unwrap(), b"0");
    }

    #[test]
    fn encode_buffer_is_sized_from_digits() {
        let value = BigRational::from_integer(BigInt::from(factorial(200)));
        let bytes = encode(&value, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        let size = encoded_size(&value);
        assert!(bytes.len() <= size);
        assert!(size - bytes.len() <= CODEC_OVERHEAD + 2);
    }

    #[test]
    fn encode_over_limit_is_allocation_error() {
        let value = BigRational::from_integer(BigInt::from(factorial(100)));
        let err = encode(&value, 50).unwrap_err();
        assert!(matches!(
            err,
            ReduceError::TransportAllocation { limit: 50, .. }
        ));
    }

    #[test]
    fn encode_fits_exactly_at_limit() {
        assert_eq!(encode(&rat(55, 1), 2).unwrap(), b"55");
        assert_eq!(encode(&rat(-3, 4), 4).unwrap(), b"-3/4");
        assert_eq!(
            encode(&rat(55, 1), 1).unwrap_err(),
            ReduceError::TransportAllocation {
                requested: 2,
                limit: 1
            }
        );
    }

    #[test]
    fn over_limit_error_reports_encoded_length() {
        let value = BigRational::from_integer(BigInt::from(factorial(100)));
        let len = value.to_string().len();
        assert_eq!(
            encode(&value, len - 1).unwrap_err(),
            ReduceError::TransportAllocation {
                requested: len,
                limit: len - 1
            }
        );
        assert_eq!(encode(&value, len).unwrap().len(), len);
    }

    #[test]
    fn decode_canonical_forms() {
        assert_eq!(decode(b"55", 16).unwrap(), rat(55, 1));
        assert_eq!(decode(b"-7/3", 16).unwrap(), rat(-7, 3));
        assert_eq!(decode(b"0", 16).unwrap(), rat(0, 1));
    }

    #[test]
    fn decode_normalises_unreduced_fraction() {
        assert_eq!(decode(b"2/4", 16).unwrap(), rat(1, 2));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        for bad in [
            &b""[..],
            b"-",
            b"/",
            b"12/",
            b"/12",
            b"1/0",
            b"+5",
            b" 5",
            b"5 ",
            b"1_000",
            b"1/2/3",
            b"1/-2",
            b"--1",
            b"0x10",
            b"12a",
        ] {
            let result = decode(bad, 64);
            assert!(
                matches!(result, Err(ReduceError::MalformedResult(_))),
                "accepted {:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn decode_rejects_oversized_input() {
        let err = decode(b"123456", 5).unwrap_err();
        assert!(matches!(err, ReduceError::MalformedResult(_)));
    }

    #[test]
    fn round_trip_large_factorial() {
        let value = BigRational::from_integer(BigInt::from(factorial(1000)));
        let bytes = encode(&value, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        assert_eq!(decode(&bytes, DEFAULT_MAX_MESSAGE_BYTES).unwrap(), value);
    }
}
