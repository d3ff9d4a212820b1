pub mod column;
pub mod table;

pub use column::{AppendOrderError, Column, EventColumn, GapColumn, LabelColumn};
pub use table::{ColumnTable, TableBuilder};
