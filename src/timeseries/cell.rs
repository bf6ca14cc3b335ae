use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, TimeZone, Utc};

use super::{
    error::{CellError, Result},
    DISPLAY_TRUNCATE_CHARS,
};

/// Which of the value slots of a [`Cell`] is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Text,
    Integer,
    Float,
    Timestamp,
    Boolean,
    /// SQL NULL. Only produced when decoding a wire cell that carries no value.
    Unset,
}

#[derive(Debug, Clone)]
enum Payload {
    Unset,
    Varchar(Vec<u8>),
    SInt64(i64),
    Double(f64),
    Timestamp(i64),
    Boolean(bool),
}

/// One column value of a time-series row.
///
/// A cell holds exactly one of five kinds of value: text, a signed 64-bit
/// integer, a double, an epoch-millisecond timestamp or a boolean. It is
/// immutable once built.
///
/// The accessors (`long`, `double`, `varchar_value`, ...) never look at the
/// kind. Reading a slot the cell does not hold returns that slot's default
/// (`0`, `0.0`, `false`, empty text), so callers that branch on the value type
/// must use the `has_*` predicates or [`Cell::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    payload: Payload,
}

impl Cell {
    /// A text cell holding the UTF-8 bytes of `value`.
    pub fn new_varchar(value: impl Into<String>) -> Self {
        Self::with(Payload::Varchar(value.into().into_bytes()))
    }

    /// A text cell holding `value` byte for byte.
    ///
    /// The bytes are not validated. Invalid UTF-8 is kept as is and only
    /// replaced with U+FFFD when the cell is read as a string or displayed.
    pub fn new_binary(value: impl Into<Vec<u8>>) -> Self {
        Self::with(Payload::Varchar(value.into()))
    }

    pub fn new_sint64(value: i64) -> Self {
        Self::with(Payload::SInt64(value))
    }

    pub fn new_double(value: f64) -> Self {
        Self::with(Payload::Double(value))
    }

    pub fn new_boolean(value: bool) -> Self {
        Self::with(Payload::Boolean(value))
    }

    /// A timestamp cell holding the instant of `value` in epoch milliseconds.
    pub fn new_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        Self::new_timestamp(value.timestamp_millis())
    }

    /// A timestamp cell from raw epoch milliseconds, without any calendar
    /// or time zone conversion.
    pub fn new_timestamp(raw_millis: i64) -> Self {
        Self::with(Payload::Timestamp(raw_millis))
    }

    /// Builds a cell from an input that may be absent.
    ///
    /// ```
    /// use riak_ts_cell::{Cell, CellError};
    ///
    /// let name: Option<&str> = None;
    /// assert!(matches!(Cell::from_nullable(name), Err(CellError::InvalidArgument(_))));
    /// assert!(Cell::from_nullable(Some("sensor-1")).unwrap().has_varchar_value());
    /// ```
    pub fn from_nullable<T: Nullable>(value: Option<T>) -> Result<Self> {
        match value {
            Some(v) => Ok(v.into()),
            None => Err(CellError::invalid_argument(T::NULL_MESSAGE)),
        }
    }

    pub(crate) fn unset() -> Self {
        Self::with(Payload::Unset)
    }

    fn with(payload: Payload) -> Self {
        Cell { payload }
    }

    pub fn kind(&self) -> CellKind {
        match self.payload {
            Payload::Unset => CellKind::Unset,
            Payload::Varchar(_) => CellKind::Text,
            Payload::SInt64(_) => CellKind::Integer,
            Payload::Double(_) => CellKind::Float,
            Payload::Timestamp(_) => CellKind::Timestamp,
            Payload::Boolean(_) => CellKind::Boolean,
        }
    }

    pub fn has_varchar_value(&self) -> bool {
        self.kind() == CellKind::Text
    }

    pub fn has_long(&self) -> bool {
        self.kind() == CellKind::Integer
    }

    pub fn has_double(&self) -> bool {
        self.kind() == CellKind::Float
    }

    pub fn has_timestamp(&self) -> bool {
        self.kind() == CellKind::Timestamp
    }

    pub fn has_boolean(&self) -> bool {
        self.kind() == CellKind::Boolean
    }

    /// True for a cell decoded from a wire cell that carried no value.
    pub fn is_null(&self) -> bool {
        self.kind() == CellKind::Unset
    }

    pub fn varchar_as_utf8_string(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.varchar_value())
    }

    pub fn varchar_value(&self) -> &[u8] {
        match &self.payload {
            Payload::Varchar(bytes) => bytes,
            _ => &[],
        }
    }

    pub fn long(&self) -> i64 {
        match self.payload {
            Payload::SInt64(v) => v,
            _ => 0,
        }
    }

    pub fn double(&self) -> f64 {
        match self.payload {
            Payload::Double(v) => v,
            _ => 0.0,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self.payload {
            Payload::Timestamp(v) => v,
            _ => 0,
        }
    }

    pub fn boolean(&self) -> bool {
        match self.payload {
            Payload::Boolean(v) => v,
            _ => false,
        }
    }

    /// The timestamp slot as a UTC date/time, `None` if it is outside the
    /// range chrono can represent.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp())
    }
}

/// Inputs that a caller may not have, rejected with
/// [`CellError::InvalidArgument`] by [`Cell::from_nullable`] when absent.
///
/// Integers, doubles and booleans always have a value and so are not
/// `Nullable`.
pub trait Nullable: Into<Cell> {
    const NULL_MESSAGE: &'static str;
}

impl Nullable for String {
    const NULL_MESSAGE: &'static str = "String value cannot be NULL.";
}

impl<'a> Nullable for &'a str {
    const NULL_MESSAGE: &'static str = "String value cannot be NULL.";
}

impl Nullable for Vec<u8> {
    const NULL_MESSAGE: &'static str = "Binary value cannot be NULL.";
}

impl<'a> Nullable for &'a [u8] {
    const NULL_MESSAGE: &'static str = "Binary value cannot be NULL.";
}

impl<Tz: TimeZone> Nullable for DateTime<Tz> {
    const NULL_MESSAGE: &'static str = "Date object for timestamp value cannot be NULL.";
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::new_varchar(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::new_varchar(value)
    }
}

impl From<Vec<u8>> for Cell {
    fn from(value: Vec<u8>) -> Self {
        Cell::new_binary(value)
    }
}

impl From<&[u8]> for Cell {
    fn from(value: &[u8]) -> Self {
        Cell::new_binary(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::new_sint64(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::new_double(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::new_boolean(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Cell {
    fn from(value: DateTime<Tz>) -> Self {
        Cell::new_datetime(&value)
    }
}

// Doubles compare by bit pattern with every NaN folded into one, so `Cell`
// can be `Eq` and `Hash`. `0.0` and `-0.0` are different cells.
fn double_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Unset, Payload::Unset) => true,
            (Payload::Varchar(a), Payload::Varchar(b)) => a == b,
            (Payload::SInt64(a), Payload::SInt64(b)) => a == b,
            (Payload::Double(a), Payload::Double(b)) => double_bits(*a) == double_bits(*b),
            (Payload::Timestamp(a), Payload::Timestamp(b)) => a == b,
            (Payload::Boolean(a), Payload::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Payload::Unset => {}
            Payload::Varchar(v) => v.hash(state),
            Payload::SInt64(v) => v.hash(state),
            Payload::Double(v) => double_bits(*v).hash(state),
            Payload::Timestamp(v) => v.hash(state),
            Payload::Boolean(v) => v.hash(state),
        }
    }
}

// Same layout as the time-series protocol's reference client: plain decimal
// with at least one fractional digit inside [1e-3, 1e7), `1.0E20` style
// outside it, and `NaN`/`Infinity`/`-Infinity` for non-finite values.
fn display_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{value:?}");
    }
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cell{{ ")?;
        match &self.payload {
            Payload::Varchar(_) => {
                let text = self.varchar_as_utf8_string();
                match text.char_indices().nth(DISPLAY_TRUNCATE_CHARS) {
                    Some((cut, _)) => write!(f, "{}...", &text[..cut])?,
                    None => write!(f, "{text}")?,
                }
            }
            Payload::SInt64(v) => write!(f, "{v}")?,
            Payload::Double(v) => write!(f, "{}", display_double(*v))?,
            Payload::Timestamp(v) => write!(f, "{v}")?,
            Payload::Boolean(v) => write!(f, "{v}")?,
            Payload::Unset => {}
        }
        write!(f, " }}")
    }
}
