//! Merge stage: expands every timeline into its own ordered list of items and
//! interleaves those lists into one chronological stream.

use std::cmp::Ordering;

use syncline_protocol::{TimePoint, Timeline};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("timeline {timeline}: event at {time} comes after {previous}")]
pub struct OrderingError {
    pub timeline: usize,
    pub previous: TimePoint,
    pub time: TimePoint,
}

/// What a merged item does to its timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind<'a, E> {
    Activate,
    Deactivate,
    Event(&'a E),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedItem<'a, E> {
    pub timeline: usize,
    pub time: TimePoint,
    pub kind: ItemKind<'a, E>,
}

/// K-way merge over individually ordered sources.
///
/// Each call to `next` yields the smallest head according to `compare`; on
/// ties the source with the lowest index wins. Items of one source keep their
/// relative order, so a source that is not ordered shows up as a regression
/// in the merged output rather than being re-sorted.
pub struct MergeOrdered<I: Iterator, F> {
    sources: Vec<I>,
    heads: Vec<Option<I::Item>>,
    compare: F,
}

pub fn merge_ordered<I, F>(sources: impl IntoIterator<Item = I>, compare: F) -> MergeOrdered<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    let mut sources: Vec<I> = sources.into_iter().collect();
    let heads = sources.iter_mut().map(Iterator::next).collect();
    MergeOrdered {
        sources,
        heads,
        compare,
    }
}

impl<I, F> Iterator for MergeOrdered<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best: Option<usize> = None;
        for (index, head) in self.heads.iter().enumerate() {
            let Some(candidate) = head else {
                continue;
            };
            let replace = match best.and_then(|b| self.heads[b].as_ref()) {
                Some(current) => (self.compare)(candidate, current) == Ordering::Less,
                None => true,
            };
            if replace {
                best = Some(index);
            }
        }

        let index = best?;
        let item = self.heads[index].take();
        self.heads[index] = self.sources[index].next();
        item
    }
}

/// The ordered item list of one timeline.
///
/// Real events keep their declared order. The activation marker (only when the
/// timeline does not start active) and the deactivation marker (only when an
/// end time is set) are slotted in after every event whose time is less than
/// or equal to theirs.
pub fn expand_timeline<L, E>(index: usize, timeline: &Timeline<L, E>) -> Vec<MergedItem<'_, E>> {
    let mut markers = Vec::with_capacity(2);
    if let Some(start) = timeline.start_time
        && !timeline.is_active_at_start()
    {
        markers.push(MergedItem {
            timeline: index,
            time: start,
            kind: ItemKind::Activate,
        });
    }
    if let Some(end) = timeline.end_time {
        markers.push(MergedItem {
            timeline: index,
            time: end,
            kind: ItemKind::Deactivate,
        });
    }
    markers.sort_by_key(|marker| marker.time);

    let mut items = Vec::with_capacity(timeline.events.len() + markers.len());
    let mut markers = markers.into_iter().peekable();
    for event in &timeline.events {
        while let Some(marker) = markers.next_if(|marker| marker.time < event.time) {
            items.push(marker);
        }
        items.push(MergedItem {
            timeline: index,
            time: event.time,
            kind: ItemKind::Event(&event.payload),
        });
    }
    items.extend(markers);
    items
}

/// Merge all timelines into one stream ordered by time point, then by
/// timeline index.
///
/// Every item is checked against the item emitted just before it, across all
/// timelines; a regression fails the whole merge.
pub fn merge_timelines<L, E>(
    timelines: &[Timeline<L, E>],
) -> Result<Vec<MergedItem<'_, E>>, OrderingError> {
    let lists = timelines
        .iter()
        .enumerate()
        .map(|(index, timeline)| expand_timeline(index, timeline).into_iter());

    let mut merged = Vec::new();
    let mut previous: Option<TimePoint> = None;
    for item in merge_ordered(lists, |left, right| left.time.cmp(&right.time)) {
        if let Some(previous) = previous
            && item.time < previous
        {
            tracing::debug!(timeline = item.timeline, %previous, time = %item.time, "event order regressed");
            return Err(OrderingError {
                timeline: item.timeline,
                previous,
                time: item.time,
            });
        }
        previous = Some(item.time);
        merged.push(item);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(items: &[MergedItem<'_, &str>]) -> Vec<String> {
        items
            .iter()
            .map(|item| {
                let what = match item.kind {
                    ItemKind::Activate => "+".to_string(),
                    ItemKind::Deactivate => "-".to_string(),
                    ItemKind::Event(payload) => (*payload).to_string(),
                };
                format!("{}:{}@{}", item.timeline, what, item.time)
            })
            .collect()
    }

    #[test]
    fn merge_ordered_prefers_lowest_source_on_ties() {
        let merged: Vec<(usize, u32)> = merge_ordered(
            vec![
                vec![(0, 1), (0, 3)].into_iter(),
                vec![(1, 1), (1, 2)].into_iter(),
            ],
            |a, b| a.1.cmp(&b.1),
        )
        .collect();
        assert_eq!(merged, [(0, 1), (1, 1), (1, 2), (0, 3)]);
    }

    #[test]
    fn merge_ordered_handles_empty_sources() {
        let merged: Vec<u32> =
            merge_ordered(vec![Vec::new().into_iter(), vec![4].into_iter()], u32::cmp).collect();
        assert_eq!(merged, [4]);
        let none: Vec<u32> = merge_ordered(Vec::<std::vec::IntoIter<u32>>::new(), u32::cmp).collect();
        assert!(none.is_empty());
    }

    #[test]
    fn markers_follow_events_at_the_same_time() {
        let timeline = Timeline::new("sub")
            .starting_at((4, 1))
            .ending_at(10)
            .with_event((4, 1), "^")
            .with_event(10, "<");
        let items = expand_timeline(1, &timeline);
        assert_eq!(
            describe(&items),
            ["1:^@4.1", "1:+@4.1", "1:<@10.0", "1:-@10.0"]
        );
    }

    #[test]
    fn active_timeline_gets_no_activation_marker() {
        let timeline = Timeline::new("s").starting_at(0).with_event(3, "a");
        assert_eq!(describe(&expand_timeline(0, &timeline)), ["0:a@3.0"]);
    }

    #[test]
    fn merges_by_time_point_then_timeline() {
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
        let items = merge_timelines(&timelines).unwrap();
        assert_eq!(
            describe(&items),
            ["0:a@2.0", "1:d@2.1", "0:ab@2.2", "1:e@2.2", "1:f@4.0", "0:c@4.1"]
        );
    }

    #[test]
    fn unordered_timeline_is_rejected() {
        let timelines = vec![Timeline::new("s").with_event(5, "a").with_event(3, "b")];
        let err = merge_timelines(&timelines).unwrap_err();
        assert_eq!(
            err,
            OrderingError {
                timeline: 0,
                previous: TimePoint::at(5),
                time: TimePoint::at(3),
            }
        );
    }

    #[test]
    fn regression_across_timelines_is_rejected() {
        let timelines = vec![
            Timeline::new("a").with_event(1, "x").with_event(8, "y").with_event(2, "z"),
            Timeline::new("b").with_event(5, "w"),
        ];
        let err = merge_timelines(&timelines).unwrap_err();
        assert_eq!(err.timeline, 0);
        assert_eq!(err.previous, TimePoint::at(8));
        assert_eq!(err.time, TimePoint::at(2));
    }

    #[test]
    fn empty_input_merges_to_nothing() {
        let timelines: Vec<Timeline<&str, &str>> = vec![Timeline::new("idle")];
        assert!(merge_timelines(&timelines).unwrap().is_empty());
    }
}
