//! Input/output module
//!
//! - `normalize`: lenient parsing of spreadsheet-style amount cells
//! - `replay`: batch replay of an operations CSV and balance output

pub mod normalize;
pub mod replay;

pub use normalize::{normalize, parse_money, RawAmount};
pub use replay::{process, OpsReader, Operation};
