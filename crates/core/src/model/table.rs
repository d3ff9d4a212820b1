use syncline_protocol::{TimePoint, Timeline};

use super::column::{AppendOrderError, Column, EventColumn, GapColumn, LabelColumn};
use crate::merge::{ItemKind, MergedItem};

/// The columns of one render, left to right, starting with the label column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTable<'a, L, E> {
    timelines: usize,
    columns: Vec<Column<'a, L, E>>,
}

impl<'a, L, E> ColumnTable<'a, L, E> {
    /// Build the table from the merged stream of `timelines`.
    pub fn build(
        timelines: &'a [Timeline<L, E>],
        items: &[MergedItem<'a, E>],
    ) -> Result<Self, AppendOrderError> {
        let mut builder = TableBuilder::new(timelines);
        for item in items {
            builder.apply(item)?;
        }
        Ok(builder.finish())
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines
    }

    pub fn columns(&self) -> &[Column<'a, L, E>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Single forward pass that turns merged items into columns.
///
/// Tracks the last instant a gap was closed at and each timeline's current
/// activity. The newest event column stays pending until something else is
/// appended; it is the only column that can still receive payloads.
#[derive(Debug)]
pub struct TableBuilder<'a, L, E> {
    columns: Vec<Column<'a, L, E>>,
    active: Vec<bool>,
    last_time: TimePoint,
    pending: Option<EventColumn<'a, E>>,
}

impl<'a, L, E> TableBuilder<'a, L, E> {
    pub fn new(timelines: &'a [Timeline<L, E>]) -> Self {
        let labels = timelines.iter().map(|timeline| &timeline.label).collect();
        Self {
            columns: vec![Column::Label(LabelColumn { labels })],
            active: timelines.iter().map(Timeline::is_active_at_start).collect(),
            last_time: TimePoint::ZERO,
            pending: None,
        }
    }

    pub fn apply(&mut self, item: &MergedItem<'a, E>) -> Result<(), AppendOrderError> {
        if item.time.time > self.last_time.time {
            let duration = item.time.time - self.last_time.time;
            tracing::trace!(duration, at = %item.time, "gap column");
            self.flush();
            self.columns.push(Column::Gap(GapColumn {
                duration,
                active: self.active.clone(),
            }));
            self.last_time = item.time;
        }

        match item.kind {
            ItemKind::Activate => self.set_active(item.timeline, true),
            ItemKind::Deactivate => self.set_active(item.timeline, false),
            ItemKind::Event(payload) => {
                let time = item.time.time;
                let reusable = self
                    .pending
                    .as_ref()
                    .is_some_and(|column| column.accepts(time, item.timeline));
                if !reusable {
                    self.flush();
                    tracing::trace!(time, timeline = item.timeline, "event column");
                }
                let timelines = self.active.len();
                self.pending
                    .get_or_insert_with(|| EventColumn::new(time, timelines))
                    .insert(item.timeline, payload)?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> ColumnTable<'a, L, E> {
        self.flush();
        ColumnTable {
            timelines: self.active.len(),
            columns: self.columns,
        }
    }

    fn flush(&mut self) {
        if let Some(column) = self.pending.take() {
            self.columns.push(Column::Event(column));
        }
    }

    fn set_active(&mut self, timeline: usize, active: bool) {
        if let Some(flag) = self.active.get_mut(timeline) {
            *flag = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_timelines;

    fn build<'a>(timelines: &'a [Timeline<&'a str, &'a str>]) -> ColumnTable<'a, &'a str, &'a str> {
        let items = merge_timelines(timelines).unwrap();
        ColumnTable::build(timelines, &items).unwrap()
    }

    fn shape(table: &ColumnTable<'_, &str, &str>) -> Vec<String> {
        table
            .columns()
            .iter()
            .map(|column| match column {
                Column::Label(_) => "L".to_string(),
                Column::Gap(gap) => {
                    let flags: String = gap
                        .active
                        .iter()
                        .map(|&active| if active { 'T' } else { 'F' })
                        .collect();
                    format!("G{}{flags}", gap.duration)
                }
                Column::Event(event) => {
                    let cells: Vec<&str> = (0..table.timeline_count())
                        .map(|t| event.payload(t).copied().unwrap_or("_"))
                        .collect();
                    format!("E[{}]", cells.join(","))
                }
            })
            .collect()
    }

    #[test]
    fn idle_timeline_has_only_labels() {
        let timelines = vec![Timeline::new("stream")];
        let table = build(&timelines);
        assert_eq!(shape(&table), ["L"]);
    }

    #[test]
    fn same_time_events_share_a_column_across_timelines() {
        let timelines = vec![
            Timeline::new("stream 1")
                .with_event(2, "a")
                .with_event((2, 2), "ab")
                .with_event((4, 1), "c"),
            Timeline::new("stream 2")
                .with_event((2, 1), "d")
                .with_event((2, 2), "e")
                .with_event(4, "f"),
        ];
        let table = build(&timelines);
        assert_eq!(
            shape(&table),
            [
                "L",
                "G2TT",
                "E[a,d]",
                "E[ab,e]",
                "G2TT",
                "E[_,f]",
                "E[c,_]"
            ]
        );
    }

    #[test]
    fn same_timeline_twice_opens_a_new_column() {
        let timelines = vec![Timeline::new("label").with_event(0, "a").with_event(0, "b")];
        assert_eq!(shape(&build(&timelines)), ["L", "E[a]", "E[b]"]);
    }

    #[test]
    fn activation_window_snapshots_into_gaps() {
        let timelines = vec![
            Timeline::new("stream 1")
                .starting_at(50)
                .with_event(50, "^")
                .with_event(100, "<"),
            Timeline::new("stream 2").ending_at(80),
        ];
        assert_eq!(
            shape(&build(&timelines)),
            ["L", "G50FT", "E[^,_]", "G30TT", "G20TF", "E[<,_]"]
        );
    }

    #[test]
    fn lower_timeline_at_same_time_opens_new_column() {
        let timelines = vec![Timeline::new("a"), Timeline::new("b")];
        let (x, y) = ("x", "y");
        let mut builder = TableBuilder::new(&timelines);
        builder
            .apply(&MergedItem {
                timeline: 1,
                time: TimePoint::at(3),
                kind: ItemKind::Event(&x),
            })
            .unwrap();
        builder
            .apply(&MergedItem {
                timeline: 0,
                time: TimePoint::at(3),
                kind: ItemKind::Event(&y),
            })
            .unwrap();
        let table = builder.finish();
        assert_eq!(table.len(), 4);
    }
}
