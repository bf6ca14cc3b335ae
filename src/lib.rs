//! Time-series cell values and their wire representation.

pub mod timeseries;

pub use timeseries::{
    cell::{Cell, CellKind, Nullable},
    error::{CellError, Result},
    wire::TsCell,
};
