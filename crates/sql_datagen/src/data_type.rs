//! Column data types and their generation domains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters in generated `STR` and `BYTES` values.
pub const TEXT_LENGTH: usize = 20;

/// Fixed-point values are drawn from `[-DECIMAL_BOUND, DECIMAL_BOUND)` where the
/// bound is `DECIMAL_BOUND_MANTISSA * 10^DECIMAL_BOUND_EXPONENT`.
pub const DECIMAL_BOUND_MANTISSA: i64 = 5;
pub const DECIMAL_BOUND_EXPONENT: i64 = 53;

pub const FIXED_DATE: &str = "1999-01-01";
pub const FIXED_TIME: &str = "04:05:06.789";
pub const FIXED_TIMESTAMP: &str = "1999-01-08 04:05:06";

/// Identifier-safe alphabet. The first 52 characters are letters.
pub const IDENTIFIER_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
pub const LETTER_COUNT: usize = 52;

pub const BIT_CHARSET: &[u8] = b"01";

/// Native representation used when generating a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Integer,
    Long,
    Double,
    Decimal,
    String,
    Boolean,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageClass::Integer => "integer",
            StorageClass::Long => "long",
            StorageClass::Double => "double",
            StorageClass::Decimal => "decimal",
            StorageClass::String => "string",
            StorageClass::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Range a generated value is guaranteed to fall into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDomain {
    /// Inclusive integer range.
    Integer { min: i64, max: i64 },
    /// Symmetric floating range `[-max, max]`.
    Float { max: f64 },
    /// `|v| <= mantissa * 10^exponent`.
    Decimal { mantissa: i64, exponent: i64 },
    /// Fixed-length text over an alphabet.
    Text {
        length: usize,
        alphabet: &'static [u8],
    },
    /// A single literal.
    Fixed(&'static str),
    Boolean,
}

/// SQL column types supported by the generator (dialect independent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    SmallInt,
    Integer,
    SmallSerial,
    Serial,
    BigInt,
    BigSerial,
    Real,
    BigReal,
    Decimal,
    Numeric,
    Str,
    Bytes,
    Bool,
    Date,
    Time,
    Timestamp,
}

impl DataType {
    pub const ALL: [DataType; 16] = [
        DataType::SmallInt,
        DataType::Integer,
        DataType::SmallSerial,
        DataType::Serial,
        DataType::BigInt,
        DataType::BigSerial,
        DataType::Real,
        DataType::BigReal,
        DataType::Decimal,
        DataType::Numeric,
        DataType::Str,
        DataType::Bytes,
        DataType::Bool,
        DataType::Date,
        DataType::Time,
        DataType::Timestamp,
    ];

    /// Canonical lowercase name, as used in templates and YAML configs.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::SmallInt => "small_int",
            DataType::Integer => "integer",
            DataType::SmallSerial => "small_serial",
            DataType::Serial => "serial",
            DataType::BigInt => "big_int",
            DataType::BigSerial => "big_serial",
            DataType::Real => "real",
            DataType::BigReal => "big_real",
            DataType::Decimal => "decimal",
            DataType::Numeric => "numeric",
            DataType::Str => "str",
            DataType::Bytes => "bytes",
            DataType::Bool => "bool",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Timestamp => "timestamp",
        }
    }

    /// Key used by the datatype mapping config (`SMALL_INT`, `BIG_REAL`, ...).
    pub fn config_key(&self) -> String {
        self.name().to_ascii_uppercase()
    }

    pub fn storage_class(&self) -> StorageClass {
        match self {
            DataType::SmallInt | DataType::Integer | DataType::SmallSerial | DataType::Serial => {
                StorageClass::Integer
            }
            DataType::BigInt | DataType::BigSerial => StorageClass::Long,
            DataType::Real | DataType::BigReal => StorageClass::Double,
            DataType::Decimal | DataType::Numeric => StorageClass::Decimal,
            DataType::Str
            | DataType::Bytes
            | DataType::Date
            | DataType::Time
            | DataType::Timestamp => StorageClass::String,
            DataType::Bool => StorageClass::Boolean,
        }
    }

    pub fn is_integer_type(&self) -> bool {
        self.storage_class() == StorageClass::Integer
    }

    pub fn is_long_type(&self) -> bool {
        self.storage_class() == StorageClass::Long
    }

    pub fn is_double_type(&self) -> bool {
        self.storage_class() == StorageClass::Double
    }

    pub fn is_decimal_type(&self) -> bool {
        self.storage_class() == StorageClass::Decimal
    }

    pub fn is_string_type(&self) -> bool {
        self.storage_class() == StorageClass::String
    }

    pub fn is_boolean_type(&self) -> bool {
        self.storage_class() == StorageClass::Boolean
    }

    /// Whole-number types of either width.
    pub fn is_integral(&self) -> bool {
        self.is_integer_type() || self.is_long_type()
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Time | DataType::Timestamp)
    }

    /// Values of this type are rendered as quoted literals.
    pub fn is_quoted(&self) -> bool {
        self.is_string_type()
    }

    /// Declared domain of generated values.
    pub fn domain(&self) -> ValueDomain {
        match self {
            DataType::SmallInt => ValueDomain::Integer {
                min: i16::MIN.into(),
                max: i16::MAX.into(),
            },
            DataType::Integer => ValueDomain::Integer {
                min: i32::MIN.into(),
                max: i32::MAX.into(),
            },
            DataType::SmallSerial => ValueDomain::Integer {
                min: 0,
                max: i16::MAX.into(),
            },
            DataType::Serial => ValueDomain::Integer {
                min: 0,
                max: i32::MAX.into(),
            },
            DataType::BigInt => ValueDomain::Integer {
                min: i64::MIN,
                max: i64::MAX,
            },
            DataType::BigSerial => ValueDomain::Integer {
                min: 0,
                max: i64::MAX,
            },
            DataType::Real => ValueDomain::Float {
                max: f64::from(f32::MAX),
            },
            DataType::BigReal => ValueDomain::Float { max: f64::MAX },
            DataType::Decimal | DataType::Numeric => ValueDomain::Decimal {
                mantissa: DECIMAL_BOUND_MANTISSA,
                exponent: DECIMAL_BOUND_EXPONENT,
            },
            DataType::Str => ValueDomain::Text {
                length: TEXT_LENGTH,
                alphabet: IDENTIFIER_CHARSET,
            },
            DataType::Bytes => ValueDomain::Text {
                length: TEXT_LENGTH,
                alphabet: BIT_CHARSET,
            },
            DataType::Bool => ValueDomain::Boolean,
            DataType::Date => ValueDomain::Fixed(FIXED_DATE),
            DataType::Time => ValueDomain::Fixed(FIXED_TIME),
            DataType::Timestamp => ValueDomain::Fixed(FIXED_TIMESTAMP),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DataType::ALL
            .iter()
            .copied()
            .find(|dt| dt.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown data type: {}. Use one of: {}",
                    s,
                    DataType::ALL
                        .iter()
                        .map(|dt| dt.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.config_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_one_storage_class() {
        for dt in DataType::ALL {
            let flags = [
                dt.is_integer_type(),
                dt.is_long_type(),
                dt.is_double_type(),
                dt.is_decimal_type(),
                dt.is_string_type(),
                dt.is_boolean_type(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{dt}");
        }
    }

    #[test]
    fn test_parse_accepts_config_keys() {
        assert_eq!("SMALL_INT".parse::<DataType>().unwrap(), DataType::SmallInt);
        assert_eq!("big_real".parse::<DataType>().unwrap(), DataType::BigReal);
        assert!("varchar".parse::<DataType>().is_err());
    }

    #[test]
    fn test_serde_uses_config_keys() {
        let json = serde_json::to_string(&DataType::BigSerial).unwrap();
        assert_eq!(json, "\"BIG_SERIAL\"");
        let back: DataType = serde_json::from_str("\"timestamp\"").unwrap();
        assert_eq!(back, DataType::Timestamp);
    }
}
