//! Layout and rendering of the column table into text rows.

pub mod grid;
pub mod layout;

pub use grid::{render_row, render_rows};
pub use layout::{Layout, column_width, format_cell, gap_span};

use syncline_protocol::Timeline;
use thiserror::Error;

use crate::format::FormatOptions;
use crate::merge::{OrderingError, merge_timelines};
use crate::model::{AppendOrderError, ColumnTable};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("ordering: {0}")]
    Ordering(#[from] OrderingError),
    #[error("append order: {0}")]
    AppendOrder(#[from] AppendOrderError),
}

/// Render `timelines` as one aligned grid, one line per timeline.
///
/// The same input and options always produce the same text. Any ordering
/// problem fails the whole render; there is no partial output.
pub fn render_timelines<L, E>(
    timelines: &[Timeline<L, E>],
    options: &FormatOptions<'_, L, E>,
) -> Result<String, RenderError> {
    let items = merge_timelines(timelines)?;
    let table = ColumnTable::build(timelines, &items)?;
    let layout = Layout::resolve(&table, options);
    tracing::debug!(
        timelines = timelines.len(),
        items = items.len(),
        columns = table.len(),
        "laid out synchronized timeline"
    );
    Ok(render_rows(&layout, options).join("\n"))
}
