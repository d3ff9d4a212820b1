use crate::format::{FormatOptions, text_width};
use crate::model::{Column, ColumnTable};

/// A column table with every column's width fixed.
#[derive(Debug)]
pub struct Layout<'t, 'a, L, E> {
    table: &'t ColumnTable<'a, L, E>,
    widths: Vec<usize>,
}

impl<'t, 'a, L, E> Layout<'t, 'a, L, E> {
    /// Measure each column once, left to right.
    pub fn resolve(table: &'t ColumnTable<'a, L, E>, options: &FormatOptions<'_, L, E>) -> Self {
        let widths = table
            .columns()
            .iter()
            .map(|column| column_width(column, options))
            .collect();
        Self { table, widths }
    }

    pub fn timeline_count(&self) -> usize {
        self.table.timeline_count()
    }

    pub fn columns(&self) -> &'t [Column<'a, L, E>] {
        self.table.columns()
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn width(&self, index: usize) -> usize {
        self.widths.get(index).copied().unwrap_or(0)
    }
}

/// Intrinsic width of a column: the widest thing any timeline puts in it.
pub fn column_width<L, E>(column: &Column<'_, L, E>, options: &FormatOptions<'_, L, E>) -> usize {
    match column {
        Column::Label(labels) => labels
            .labels
            .iter()
            .map(|label| text_width(&options.label(label, None)))
            .max()
            .unwrap_or(0),
        Column::Event(events) => events
            .payloads()
            .map(|payload| text_width(&options.event(payload, None)))
            .max()
            .unwrap_or(0),
        Column::Gap(gap) => text_width(&options.time(gap.duration, gap.any_active(), None)),
    }
}

/// Render one row's cell starting at column `start`.
///
/// Returns how many columns the cell covers together with its text. Label and
/// event cells cover exactly their own column; gap cells go through
/// [`gap_span`].
pub fn format_cell<L, E>(
    layout: &Layout<'_, '_, L, E>,
    start: usize,
    timeline: usize,
    options: &FormatOptions<'_, L, E>,
) -> (usize, String) {
    let width = layout.width(start);
    match layout.columns().get(start) {
        Some(Column::Label(labels)) => {
            let text = labels
                .labels
                .get(timeline)
                .map(|label| options.label(label, Some(width)))
                .unwrap_or_default();
            (1, text)
        }
        Some(Column::Event(events)) => {
            let text = match events.payload(timeline) {
                Some(payload) => options.event(payload, Some(width)),
                None => options.blank(width),
            };
            (1, text)
        }
        Some(Column::Gap(gap)) => {
            gap_span(layout, start, timeline, gap.is_active(timeline), options)
        }
        None => (1, String::new()),
    }
}

/// Per-row lookahead from the gap column at `start`.
///
/// Walks forward over gap columns with the same activity for `timeline` and
/// over event columns where `timeline` has nothing, summing their widths and
/// the gaps' durations, and renders the whole run as one chunk. Rows starting
/// at the same column may cover different numbers of columns.
pub fn gap_span<L, E>(
    layout: &Layout<'_, '_, L, E>,
    start: usize,
    timeline: usize,
    active: bool,
    options: &FormatOptions<'_, L, E>,
) -> (usize, String) {
    let mut consumed = 0;
    let mut duration = 0;
    let mut required = 0;

    let columns = layout.columns().iter().zip(layout.widths()).skip(start);
    for (column, width) in columns {
        match column {
            Column::Gap(gap) if gap.is_active(timeline) == active => duration += gap.duration,
            Column::Event(events) if events.payload(timeline).is_none() => {}
            _ => break,
        }
        required += width;
        consumed += 1;
    }

    (consumed, options.time(duration, active, Some(required)))
}
