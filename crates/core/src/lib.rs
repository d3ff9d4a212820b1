//! Renders several independently time-stamped timelines into one aligned
//! text grid, so that events at the same instant line up across rows.
//!
//! ```text
//!              source: --a--b-c--d----e
//! source subscription:      ^--------<
//!              result: -------c--d-----
//! ```
//!
//! The pipeline is: [`merge`] the timelines into one ordered stream, build the
//! [`model::ColumnTable`], fix column widths, then render row by row.

pub mod format;
pub mod input;
pub mod merge;
pub mod model;
pub mod render;

pub use format::{FormatOptions, GridStyle};
pub use render::{RenderError, render_timelines};
