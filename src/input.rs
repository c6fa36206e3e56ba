//! Validation of raw control input before it reaches the sampler.
//!
//! The length field follows browser number-field semantics: every keystroke
//! is parsed and only valid values are applied, and on blur an invalid field
//! snaps back to the default length.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::physics::{is_valid_length, DEFAULT_LENGTH, MAX_LEVEL, MIN_LEVEL};

/// Leading decimal literal, the same prefix `parseFloat` accepts. Digits are
/// ASCII only; leading whitespace is any Unicode space, as in JS.
const LEADING_NUMBER_PATTERN: &str =
    r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)";

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(LEADING_NUMBER_PATTERN).expect("leading-number pattern is valid"));

/// What the state container should do with the stored length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthUpdate {
    Apply(f64),
    Retain,
    Reset(f64),
}

/// Parse the leading real number of `raw`; trailing text is ignored.
pub fn parse_number(raw: &str) -> Option<f64> {
    let caps = LEADING_NUMBER.captures(raw)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// A usable box length: parseable, positive and not so small that
/// sqrt(2/L) overflows.
pub fn parse_length(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|v| is_valid_length(*v))
}

/// Keystroke in the length field.
pub fn on_length_change(raw: &str) -> LengthUpdate {
    match parse_length(raw) {
        Some(length) => LengthUpdate::Apply(length),
        None => LengthUpdate::Retain,
    }
}

/// Focus left the length field.
pub fn on_length_commit(raw: &str) -> LengthUpdate {
    match parse_length(raw) {
        Some(_) => LengthUpdate::Retain,
        None => LengthUpdate::Reset(DEFAULT_LENGTH),
    }
}

/// Quantum numbers outside the slider range are pulled back into it.
pub fn clamp_level(raw: i64) -> u32 {
    raw.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u32
}
