use prost::Message;
use tracing::{debug, trace, warn};

use super::{
    cell::{Cell, CellKind},
    error::{CellError, Result},
};

/// A single cell as carried by the time-series protocol.
///
/// Every field is optional on the wire. A well-formed message sets at most
/// one of them; none set means NULL.
#[derive(Clone, PartialEq, Message)]
pub struct TsCell {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub varchar_value: Option<Vec<u8>>,
    #[prost(sint64, optional, tag = "2")]
    pub sint64_value: Option<i64>,
    #[prost(sint64, optional, tag = "3")]
    pub timestamp_value: Option<i64>,
    #[prost(bool, optional, tag = "4")]
    pub boolean_value: Option<bool>,
    #[prost(double, optional, tag = "5")]
    pub double_value: Option<f64>,
}

impl TsCell {
    pub fn field_count(&self) -> usize {
        [
            self.varchar_value.is_some(),
            self.sint64_value.is_some(),
            self.timestamp_value.is_some(),
            self.boolean_value.is_some(),
            self.double_value.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

impl Cell {
    pub fn to_wire(&self) -> TsCell {
        let mut wire = TsCell::default();
        match self.kind() {
            CellKind::Text => wire.varchar_value = Some(self.varchar_value().to_vec()),
            CellKind::Integer => wire.sint64_value = Some(self.long()),
            CellKind::Timestamp => wire.timestamp_value = Some(self.timestamp()),
            CellKind::Boolean => wire.boolean_value = Some(self.boolean()),
            CellKind::Float => wire.double_value = Some(self.double()),
            CellKind::Unset => {}
        }
        trace!(kind = ?self.kind(), "encoded cell");
        wire
    }

    /// Decodes a wire cell, mapping a message with no value to the NULL cell
    /// instead of failing.
    pub fn from_wire_nullable(wire: &TsCell) -> Cell {
        if wire.is_empty() {
            trace!("decoded NULL cell");
            return Cell::unset();
        }
        decode_present(wire)
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        self.to_wire().encode_to_vec()
    }

    /// Decodes protobuf bytes of a `TsCell`. An empty message is an error.
    pub fn decode(bytes: &[u8]) -> Result<Cell> {
        let wire = TsCell::decode(bytes)?;
        Cell::try_from(&wire)
    }

    pub fn decode_nullable(bytes: &[u8]) -> Result<Cell> {
        let wire = TsCell::decode(bytes)?;
        Ok(Cell::from_wire_nullable(&wire))
    }
}

// Caller guarantees at least one field is present.
fn decode_present(wire: &TsCell) -> Cell {
    if wire.field_count() > 1 {
        warn!(
            fields = wire.field_count(),
            "wire cell carries more than one value, keeping the first by precedence"
        );
    }
    let cell = if let Some(v) = wire.boolean_value {
        Cell::new_boolean(v)
    } else if let Some(v) = wire.double_value {
        Cell::new_double(v)
    } else if let Some(v) = wire.sint64_value {
        Cell::new_sint64(v)
    } else if let Some(v) = wire.timestamp_value {
        Cell::new_timestamp(v)
    } else if let Some(v) = &wire.varchar_value {
        Cell::new_binary(v.clone())
    } else {
        Cell::unset()
    };
    trace!(kind = ?cell.kind(), "decoded cell");
    cell
}

impl TryFrom<&TsCell> for Cell {
    type Error = CellError;

    fn try_from(wire: &TsCell) -> Result<Self> {
        if wire.is_empty() {
            debug!("rejecting wire cell with no value");
            return Err(CellError::invalid_argument("Unknown PB Cell encountered."));
        }
        Ok(decode_present(wire))
    }
}

impl TryFrom<TsCell> for Cell {
    type Error = CellError;

    fn try_from(wire: TsCell) -> Result<Self> {
        Cell::try_from(&wire)
    }
}

impl From<&Cell> for TsCell {
    fn from(cell: &Cell) -> Self {
        cell.to_wire()
    }
}

impl From<Cell> for TsCell {
    fn from(cell: Cell) -> Self {
        cell.to_wire()
    }
}
