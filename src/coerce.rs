//! String to native value conversion for each [`Kind`].
//!
//! Integers accept an optional sign followed by a base prefix (`0x`, `0o`,
//! `0b`, or a bare leading `0` for octal) and may use `_` between digits.
//! Booleans accept `1`, `t`, `true`, `0`, `f`, `false` in any case. Floats use
//! Rust's decimal syntax plus hex floats with a binary exponent (`0x1.8p1`).
//! Lists are split on every `,` without trimming.

use crate::error::CoerceError;
use crate::field::Kind;

/// A coerced value, ready to be stored in a [`Slot`](crate::Slot)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    List(Vec<String>),
}

/// Convert `raw` to a value of `kind`.
///
/// `bit_width` bounds integers (signed, 1 to 64 bits) and selects float
/// precision (32 or 64). A width of 0 means 64. Unsupported kinds produce no
/// value and no error.
pub fn coerce(raw: &str, kind: Kind, bit_width: u32) -> Result<Option<Value>, CoerceError> {
    let value = match kind {
        Kind::StringList => Value::List(split_list(raw)),
        Kind::String => Value::Str(raw.to_string()),
        Kind::Integer => Value::Int(parse_int(raw, bit_width)?),
        Kind::Boolean => Value::Bool(parse_bool(raw)?),
        Kind::Float => Value::Float(parse_float(raw, bit_width)?),
        Kind::Unsupported => return Ok(None),
    };
    Ok(Some(value))
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(CoerceError::new(raw)),
    }
}

pub fn parse_int(raw: &str, bit_width: u32) -> Result<i64, CoerceError> {
    let err = || CoerceError::new(raw);
    let bits = match bit_width {
        0 => 64,
        b if b > 64 => 64,
        b => b,
    };

    let (negative, body) = strip_sign(raw);
    let (radix, digits, prefixed) = split_radix(body);

    if !underscores_ok(digits, prefixed) {
        return Err(err());
    }
    let cleaned = digits.replace('_', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(err());
    }

    let magnitude = u64::from_str_radix(&cleaned, radix).map_err(|_| err())?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };

    let max = (1i128 << (bits - 1)) - 1;
    let min = -(1i128 << (bits - 1));
    if value < min || value > max {
        return Err(err());
    }
    i64::try_from(value).map_err(|_| err())
}

pub fn parse_float(raw: &str, bit_width: u32) -> Result<f64, CoerceError> {
    let err = || CoerceError::new(raw);
    let value = if is_hex_float(raw) {
        let value = parse_hex_float(raw).ok_or_else(err)?;
        if bit_width == 32 {
            f64::from(value as f32)
        } else {
            value
        }
    } else if bit_width == 32 {
        raw.parse::<f32>().map(f64::from).map_err(|_| err())?
    } else {
        raw.parse::<f64>().map_err(|_| err())?
    };

    // Overflow parses to infinity, only an explicit "inf" may produce one
    if value.is_infinite() {
        let unsigned = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if !unsigned.starts_with("inf") {
            return Err(err());
        }
    }
    Ok(value)
}

fn strip_sign(raw: &str) -> (bool, &str) {
    match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    }
}

fn is_hex_float(raw: &str) -> bool {
    let (_, body) = strip_sign(raw);
    body.starts_with("0x") || body.starts_with("0X")
}

/// `0x` mantissa with an optional point, then a mandatory `p` exponent
fn parse_hex_float(raw: &str) -> Option<f64> {
    let (negative, body) = strip_sign(raw);
    let body = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))?;
    let (mantissa, exponent) = body.split_once(['p', 'P'])?;
    let exponent: i64 = exponent.parse().ok()?;
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_digits.chars().chain(frac_digits.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }

    // Scale in steps so intermediate powers of two stay finite
    let mut scale = exponent.checked_sub(4 * i64::try_from(frac_digits.len()).ok()?)?;
    while scale > 0 && value.is_finite() && value != 0.0 {
        let step = scale.min(1000);
        value *= 2f64.powi(step as i32);
        scale -= step;
    }
    while scale < 0 && value != 0.0 {
        let step = scale.max(-1000);
        value *= 2f64.powi(step as i32);
        scale -= step;
    }

    Some(if negative { -value } else { value })
}

/// Returns (radix, digits, whether a base prefix preceded the digits)
fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..], true),
            b'o' | b'O' => return (8, &body[2..], true),
            b'b' | b'B' => return (2, &body[2..], true),
            _ => return (8, &body[1..], true),
        }
    }
    (10, body, false)
}

/// Every `_` must sit between two digits, where a base prefix counts as a digit
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    let mut prev_digit = prefixed;
    for c in digits.chars() {
        if c == '_' {
            if !prev_digit {
                return false;
            }
            prev_digit = false;
        } else {
            prev_digit = true;
        }
    }
    prev_digit || digits.is_empty()
}
