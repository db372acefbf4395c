//! Random helpers shared by value generation and schema synthesis.

use crate::data_type::{BIT_CHARSET, IDENTIFIER_CHARSET, LETTER_COUNT};
use crate::error::{Error, Result};
use rand::Rng;

/// Uniform integer in `[0, upper]`.
pub fn random_integer<R: Rng + ?Sized>(upper: i64, rng: &mut R) -> Result<i64> {
    if upper < 0 {
        return Err(Error::InvalidArgument(format!(
            "upper bound cannot be negative (got {upper})"
        )));
    }
    Ok(rng.random_range(0..=upper))
}

/// Uniform element of a non-empty slice.
pub fn random_element<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Result<&'a T> {
    if items.is_empty() {
        return Err(Error::InvalidArgument(
            "cannot pick from an empty set".to_string(),
        ));
    }
    Ok(&items[rng.random_range(0..items.len())])
}

/// Random string over `[A-Za-z0-9_]` that never starts with a digit.
pub fn random_identifier<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<String> {
    if length == 0 {
        return Err(Error::InvalidArgument(
            "random string must have positive length".to_string(),
        ));
    }

    let mut out = String::with_capacity(length);
    for i in 0..length {
        let mut c = IDENTIFIER_CHARSET[rng.random_range(0..IDENTIFIER_CHARSET.len())];
        if i == 0 && c.is_ascii_digit() {
            // identifiers can't start with a digit
            c = IDENTIFIER_CHARSET[rng.random_range(0..LETTER_COUNT)];
        }
        out.push(c as char);
    }
    Ok(out)
}

/// Random string of `0`/`1` characters.
pub fn random_bit_string<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<String> {
    if length == 0 {
        return Err(Error::InvalidArgument(
            "random byte string must have positive length".to_string(),
        ));
    }
    Ok((0..length)
        .map(|_| BIT_CHARSET[usize::from(rng.random_bool(0.5))] as char)
        .collect())
}
