//! Width-aware integers.
//!
//! `SizedInt` models the fixed-width integer family (int8 through uint64)
//! behind the numeric conversion functions. Every constructor and conversion
//! validates the value against the target width, so a `SizedInt` always holds
//! a representable value.

use std::fmt;

use thiserror::Error;

/// Bit width of a sized integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// The number of bits.
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Errors from sized-integer construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumericError {
    #[error("value {value} out of range for {type_name}")]
    Range { value: i128, type_name: String },
    #[error("cannot parse '{text}' as {type_name}")]
    Parse { text: String, type_name: String },
}

/// An integer of a specific width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizedInt {
    width: IntWidth,
    signed: bool,
    value: i128,
}

impl SizedInt {
    /// Construct, validating the value against the width.
    pub fn new(width: IntWidth, signed: bool, value: i128) -> Result<Self, NumericError> {
        if value < Self::min_value(width, signed) || value > Self::max_value(width, signed) {
            return Err(NumericError::Range {
                value,
                type_name: type_name(width, signed),
            });
        }
        Ok(Self {
            width,
            signed,
            value,
        })
    }

    /// Smallest representable value for the width.
    pub fn min_value(width: IntWidth, signed: bool) -> i128 {
        if signed {
            -(1i128 << (width.bits() - 1))
        } else {
            0
        }
    }

    /// Largest representable value for the width.
    pub fn max_value(width: IntWidth, signed: bool) -> i128 {
        if signed {
            (1i128 << (width.bits() - 1)) - 1
        } else {
            (1i128 << width.bits()) - 1
        }
    }

    pub fn int8(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W8, true, value)
    }

    pub fn int16(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W16, true, value)
    }

    pub fn int32(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W32, true, value)
    }

    pub fn int64(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W64, true, value)
    }

    pub fn uint8(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W8, false, value)
    }

    pub fn uint16(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W16, false, value)
    }

    pub fn uint32(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W32, false, value)
    }

    pub fn uint64(value: i128) -> Result<Self, NumericError> {
        Self::new(IntWidth::W64, false, value)
    }

    /// Parse from text. Accepts decimal, "0x" hexadecimal, and "0o" octal,
    /// each with an optional leading sign.
    pub fn from_str(width: IntWidth, signed: bool, text: &str) -> Result<Self, NumericError> {
        let parse_err = || NumericError::Parse {
            text: text.to_string(),
            type_name: type_name(width, signed),
        };

        let mut rest = text.trim();
        let mut negative = false;
        match rest.as_bytes().first() {
            Some(b'-') => {
                negative = true;
                rest = &rest[1..];
            }
            Some(b'+') => rest = &rest[1..],
            _ => {}
        }
        let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or(rest.strip_prefix("0X"))
        {
            (16, hex)
        } else if let Some(oct) = rest.strip_prefix("0o").or(rest.strip_prefix("0O")) {
            (8, oct)
        } else {
            (10, rest)
        };
        if digits.is_empty() {
            return Err(parse_err());
        }
        let magnitude = i128::from_str_radix(digits, radix).map_err(|_| parse_err())?;
        let value = if negative { -magnitude } else { magnitude };
        Self::new(width, signed, value)
    }

    /// Construct from a bool (false is 0, true is 1).
    pub fn from_bool(width: IntWidth, signed: bool, value: bool) -> Self {
        Self {
            width,
            signed,
            value: value as i128,
        }
    }

    /// Construct from a double. The value must be finite and integral;
    /// fractional inputs are parse errors, not rounded.
    pub fn from_f64(width: IntWidth, signed: bool, value: f64) -> Result<Self, NumericError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(NumericError::Parse {
                text: value.to_string(),
                type_name: type_name(width, signed),
            });
        }
        // Every integral double this side of 2^127 converts exactly.
        if value < -1.8e20 || value > 1.8e20 {
            return Err(NumericError::Range {
                value: if value < 0.0 { i128::MIN } else { i128::MAX },
                type_name: type_name(width, signed),
            });
        }
        Self::new(width, signed, value as i128)
    }

    /// Convert to another width or signedness, validating the range.
    pub fn convert(&self, width: IntWidth, signed: bool) -> Result<Self, NumericError> {
        Self::new(width, signed, self.value)
    }

    /// The underlying value.
    pub fn value(&self) -> i128 {
        self.value
    }

    /// The width.
    pub fn width(&self) -> IntWidth {
        self.width
    }

    /// Whether the type is signed.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// The type name, e.g. "int32" or "uint8".
    pub fn type_name(&self) -> String {
        type_name(self.width, self.signed)
    }

    /// Render in the given radix (2..=36). Negative values get a leading '-'.
    pub fn to_string_radix(&self, radix: u32) -> Result<String, NumericError> {
        if !(2..=36).contains(&radix) {
            return Err(NumericError::Parse {
                text: format!("radix {}", radix),
                type_name: self.type_name(),
            });
        }
        if self.value == 0 {
            return Ok("0".to_string());
        }
        let mut magnitude = self.value.unsigned_abs();
        let mut digits = Vec::new();
        while magnitude > 0 {
            let digit = (magnitude % radix as u128) as u32;
            digits.push(std::char::from_digit(digit, radix).unwrap_or('?'));
            magnitude /= radix as u128;
        }
        if self.value < 0 {
            digits.push('-');
        }
        Ok(digits.iter().rev().collect())
    }

    /// Render in decimal with '_' separators every three digits.
    pub fn to_grouped_string(&self) -> String {
        let plain = self.value.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(plain.len() + plain.len() / 3 + 1);
        if self.value < 0 {
            grouped.push('-');
        }
        let lead = plain.len() % 3;
        for (i, c) in plain.chars().enumerate() {
            if i > 0 && i % 3 == lead % 3 {
                grouped.push('_');
            }
            grouped.push(c);
        }
        grouped
    }
}

fn type_name(width: IntWidth, signed: bool) -> String {
    format!("{}int{}", if signed { "" } else { "u" }, width.bits())
}

impl fmt::Display for SizedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

macro_rules! sized_int_try_from {
    ($($native:ty),*) => {
        $(
            impl TryFrom<SizedInt> for $native {
                type Error = NumericError;

                fn try_from(v: SizedInt) -> Result<Self, Self::Error> {
                    <$native>::try_from(v.value).map_err(|_| NumericError::Range {
                        value: v.value,
                        type_name: stringify!($native).to_string(),
                    })
                }
            }
        )*
    };
}

sized_int_try_from!(i8, i16, i32, i64, u8, u16, u32, u64);
