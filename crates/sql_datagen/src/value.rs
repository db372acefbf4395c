//! Typed values and the per-storage-class generators.

use crate::data_type::{
    DataType, StorageClass, DECIMAL_BOUND_EXPONENT, DECIMAL_BOUND_MANTISSA, FIXED_DATE,
    FIXED_TIME, FIXED_TIMESTAMP, TEXT_LENGTH,
};
use crate::error::{Error, Result};
use crate::random::{random_bit_string, random_identifier};
use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, TimeDelta};
use num_bigint::BigInt;
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

/// Mantissa bits of an `f64` in `[0, 1)`; decimal draws use the same granularity.
const UNIT_BITS: u32 = 53;

/// A single generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    Long(i64),
    Double(f64),
    Decimal(BigDecimal),
    Str(String),
    Bool(bool),
}

impl SqlValue {
    /// SQL literal text. Identical for every dialect.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Long(n) => n.to_string(),
            SqlValue::Double(n) => format!("{:e}", n),
            SqlValue::Decimal(d) => plain_decimal(d),
            SqlValue::Str(s) => format!("'{}'", escape_string(s)),
            SqlValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    pub fn storage_class(&self) -> StorageClass {
        match self {
            SqlValue::Int(_) => StorageClass::Integer,
            SqlValue::Long(_) => StorageClass::Long,
            SqlValue::Double(_) => StorageClass::Double,
            SqlValue::Decimal(_) => StorageClass::Decimal,
            SqlValue::Str(_) => StorageClass::String,
            SqlValue::Bool(_) => StorageClass::Boolean,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Digits of a whole-number decimal without exponent notation.
fn plain_decimal(d: &BigDecimal) -> String {
    let (digits, _) = d.with_scale(0).as_bigint_and_exponent();
    digits.to_string()
}

/// One generated column, stored in its native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<i32>),
    Long(Vec<i64>),
    Double(Vec<f64>),
    Decimal(Vec<BigDecimal>),
    String(Vec<String>),
    Boolean(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Long(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Decimal(v) => v.len(),
            ColumnData::String(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_class(&self) -> StorageClass {
        match self {
            ColumnData::Integer(_) => StorageClass::Integer,
            ColumnData::Long(_) => StorageClass::Long,
            ColumnData::Double(_) => StorageClass::Double,
            ColumnData::Decimal(_) => StorageClass::Decimal,
            ColumnData::String(_) => StorageClass::String,
            ColumnData::Boolean(_) => StorageClass::Boolean,
        }
    }

    pub fn get(&self, row: usize) -> Option<SqlValue> {
        match self {
            ColumnData::Integer(v) => v.get(row).map(|n| SqlValue::Int(*n)),
            ColumnData::Long(v) => v.get(row).map(|n| SqlValue::Long(*n)),
            ColumnData::Double(v) => v.get(row).map(|n| SqlValue::Double(*n)),
            ColumnData::Decimal(v) => v.get(row).cloned().map(SqlValue::Decimal),
            ColumnData::String(v) => v.get(row).cloned().map(SqlValue::Str),
            ColumnData::Boolean(v) => v.get(row).map(|b| SqlValue::Bool(*b)),
        }
    }
}

/// Source of `DATE`, `TIME` and `TIMESTAMP` values.
pub trait TemporalSource: Send + Sync + fmt::Debug {
    fn date(&self, rng: &mut dyn RngCore) -> String;
    fn time(&self, rng: &mut dyn RngCore) -> String;
    fn timestamp(&self, rng: &mut dyn RngCore) -> String;
}

/// Always returns the same literal per temporal type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTemporal;

impl TemporalSource for FixedTemporal {
    fn date(&self, _rng: &mut dyn RngCore) -> String {
        FIXED_DATE.to_string()
    }

    fn time(&self, _rng: &mut dyn RngCore) -> String {
        FIXED_TIME.to_string()
    }

    fn timestamp(&self, _rng: &mut dyn RngCore) -> String {
        FIXED_TIMESTAMP.to_string()
    }
}

/// Uniform over whole seconds of a caller-supplied window, plus uniform
/// milliseconds for `TIME` values.
#[derive(Debug, Clone, Copy)]
pub struct RandomTemporal {
    start: NaiveDateTime,
    span_seconds: i64,
}

impl RandomTemporal {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidArgument(format!(
                "temporal window end {end} precedes start {start}"
            )));
        }
        Ok(Self {
            start,
            span_seconds: (end - start).num_seconds(),
        })
    }

    fn instant(&self, rng: &mut dyn RngCore) -> NaiveDateTime {
        let offset = rng.random_range(0..=self.span_seconds);
        self.start + TimeDelta::seconds(offset)
    }
}

impl TemporalSource for RandomTemporal {
    fn date(&self, rng: &mut dyn RngCore) -> String {
        self.instant(rng).format("%Y-%m-%d").to_string()
    }

    fn time(&self, rng: &mut dyn RngCore) -> String {
        let instant = self.instant(rng);
        let millis: u32 = rng.random_range(0..1000);
        format!("{}.{:03}", instant.format("%H:%M:%S"), millis)
    }

    fn timestamp(&self, rng: &mut dyn RngCore) -> String {
        self.instant(rng).format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Generates values for a [`DataType`], one storage class at a time.
#[derive(Debug, Clone)]
pub struct ValueGenerator {
    temporal: Arc<dyn TemporalSource>,
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self {
            temporal: Arc::new(FixedTemporal),
        }
    }
}

impl ValueGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temporal(temporal: Arc<dyn TemporalSource>) -> Self {
        Self { temporal }
    }

    fn expect_class(data_type: DataType, requested: StorageClass) -> Result<()> {
        if data_type.storage_class() != requested {
            return Err(Error::TypeMismatch {
                data_type,
                requested,
            });
        }
        Ok(())
    }

    pub fn integer<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<i32> {
        Self::expect_class(data_type, StorageClass::Integer)?;
        let value = match data_type {
            DataType::SmallInt => i32::from(rng.random::<i16>()),
            DataType::Integer => rng.random::<i32>(),
            // i16::MIN / i32::MIN have no positive counterpart and map to 0
            DataType::SmallSerial => i32::from(rng.random::<i16>().checked_abs().unwrap_or(0)),
            DataType::Serial => rng.random::<i32>().checked_abs().unwrap_or(0),
            _ => unreachable!("storage class checked above"),
        };
        Ok(value)
    }

    pub fn long<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<i64> {
        Self::expect_class(data_type, StorageClass::Long)?;
        let value = match data_type {
            DataType::BigInt => rng.random::<i64>(),
            DataType::BigSerial => rng.random::<i64>().checked_abs().unwrap_or(0),
            _ => unreachable!("storage class checked above"),
        };
        Ok(value)
    }

    pub fn double<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<f64> {
        Self::expect_class(data_type, StorageClass::Double)?;
        // 2u - 1 spans [-1, 1) without computing MAX - MIN, which overflows
        let unit = 2.0 * rng.random::<f64>() - 1.0;
        let value = match data_type {
            DataType::Real => (f64::from(f32::MAX) * unit) as f32 as f64,
            DataType::BigReal => f64::MAX * unit,
            _ => unreachable!("storage class checked above"),
        };
        Ok(value)
    }

    /// `low + range * u` with `low = -5e53`, `range = 1e54` and `u` a uniform
    /// 53-bit fraction, computed exactly.
    pub fn decimal<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<BigDecimal> {
        Self::expect_class(data_type, StorageClass::Decimal)?;
        let low = BigDecimal::new(BigInt::from(-DECIMAL_BOUND_MANTISSA), -DECIMAL_BOUND_EXPONENT);
        let range = BigDecimal::new(
            BigInt::from(2 * DECIMAL_BOUND_MANTISSA),
            -DECIMAL_BOUND_EXPONENT,
        );
        // m / 2^53 == m * 5^53 / 10^53
        let m: u64 = rng.random_range(0..(1u64 << UNIT_BITS));
        let unit = BigDecimal::new(
            BigInt::from(m) * BigInt::from(5u32).pow(UNIT_BITS),
            i64::from(UNIT_BITS),
        );
        Ok((low + range * unit).with_scale(0))
    }

    pub fn string<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<String> {
        Self::expect_class(data_type, StorageClass::String)?;
        let mut rng = rng;
        match data_type {
            DataType::Str => random_identifier(TEXT_LENGTH, rng),
            DataType::Bytes => random_bit_string(TEXT_LENGTH, rng),
            DataType::Date => Ok(self.temporal.date(&mut rng)),
            DataType::Time => Ok(self.temporal.time(&mut rng)),
            DataType::Timestamp => Ok(self.temporal.timestamp(&mut rng)),
            _ => unreachable!("storage class checked above"),
        }
    }

    pub fn boolean<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<bool> {
        Self::expect_class(data_type, StorageClass::Boolean)?;
        Ok(rng.random_bool(0.5))
    }

    /// One value of `data_type`, dispatched on its storage class.
    pub fn value<R: Rng + ?Sized>(&self, data_type: DataType, rng: &mut R) -> Result<SqlValue> {
        Ok(match data_type.storage_class() {
            StorageClass::Integer => SqlValue::Int(self.integer(data_type, rng)?),
            StorageClass::Long => SqlValue::Long(self.long(data_type, rng)?),
            StorageClass::Double => SqlValue::Double(self.double(data_type, rng)?),
            StorageClass::Decimal => SqlValue::Decimal(self.decimal(data_type, rng)?),
            StorageClass::String => SqlValue::Str(self.string(data_type, rng)?),
            StorageClass::Boolean => SqlValue::Bool(self.boolean(data_type, rng)?),
        })
    }

    /// `row_count` independent values of `data_type`.
    pub fn column<R: Rng + ?Sized>(
        &self,
        row_count: usize,
        data_type: DataType,
        rng: &mut R,
    ) -> Result<ColumnData> {
        Ok(match data_type.storage_class() {
            StorageClass::Integer => ColumnData::Integer(
                (0..row_count)
                    .map(|_| self.integer(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
            StorageClass::Long => ColumnData::Long(
                (0..row_count)
                    .map(|_| self.long(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
            StorageClass::Double => ColumnData::Double(
                (0..row_count)
                    .map(|_| self.double(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
            StorageClass::Decimal => ColumnData::Decimal(
                (0..row_count)
                    .map(|_| self.decimal(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
            StorageClass::String => ColumnData::String(
                (0..row_count)
                    .map(|_| self.string(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
            StorageClass::Boolean => ColumnData::Boolean(
                (0..row_count)
                    .map(|_| self.boolean(data_type, rng))
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

/// `row_count` values of `data_type` with the default (fixed temporal) generator.
pub fn generate_column<R: Rng + ?Sized>(
    row_count: usize,
    data_type: DataType,
    rng: &mut R,
) -> Result<ColumnData> {
    ValueGenerator::default().column(row_count, data_type, rng)
}
