use super::layout::{Layout, format_cell};
use crate::format::FormatOptions;

/// Every timeline's line, in input order.
pub fn render_rows<L, E>(
    layout: &Layout<'_, '_, L, E>,
    options: &FormatOptions<'_, L, E>,
) -> Vec<String> {
    (0..layout.timeline_count())
        .map(|timeline| render_row(layout, timeline, options))
        .collect()
}

/// Walk the columns left to right. A cell that covers several columns makes
/// the row skip the ones it already drew.
pub fn render_row<L, E>(
    layout: &Layout<'_, '_, L, E>,
    timeline: usize,
    options: &FormatOptions<'_, L, E>,
) -> String {
    let mut line = String::new();
    let mut pending = 0usize;
    for index in 0..layout.columns().len() {
        if pending == 0 {
            let (consumed, chunk) = format_cell(layout, index, timeline, options);
            line.push_str(&chunk);
            pending = consumed;
        }
        pending = pending.saturating_sub(1);
    }
    line
}
