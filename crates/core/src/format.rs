//! Cell formatting: fill characters, default formatters, and caller overrides.
//!
//! All widths are counted in `char`s.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Characters written by the marker around a contracted gap, besides the
/// duration itself (`---~` and `~---`).
pub const MARKER_OVERHEAD: u64 = 8;

/// Fill characters and the long-gap threshold used by the default formatters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    /// Fill for elapsed active time and for extending event cells.
    pub time_padding: char,
    /// Fill for event cells of timelines that had nothing at that instant.
    pub order_padding: char,
    /// Fill used to right-align labels.
    pub label_padding: char,
    /// Without a width to fit, active gaps longer than this are contracted.
    pub contract_after: u64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            time_padding: '-',
            order_padding: ' ',
            label_padding: ' ',
            contract_after: 10,
        }
    }
}

pub type LabelFormatter<'a, L> = Box<dyn Fn(&L, Option<usize>) -> String + 'a>;
pub type EventFormatter<'a, E> = Box<dyn Fn(&E, Option<usize>) -> String + 'a>;
pub type TimeFormatter<'a> = Box<dyn Fn(u64, bool, Option<usize>) -> String + 'a>;

type Describe<'a, T> = Box<dyn Fn(&T) -> String + 'a>;

/// How labels, payloads and elapsed time turn into text.
///
/// Each formatter receives the width it has to fill, or `None` while column
/// widths are being measured. A custom formatter replaces only its own piece;
/// the others keep the defaults.
pub struct FormatOptions<'a, L, E> {
    pub style: GridStyle,
    describe_label: Describe<'a, L>,
    describe_event: Describe<'a, E>,
    format_label: Option<LabelFormatter<'a, L>>,
    format_event: Option<EventFormatter<'a, E>>,
    format_time: Option<TimeFormatter<'a>>,
}

impl<'a, L, E> FormatOptions<'a, L, E> {
    /// Options for labels and payloads without a `Display` impl; the
    /// `describe_*` functions supply the text the default formatters decorate.
    pub fn new(
        describe_label: impl Fn(&L) -> String + 'a,
        describe_event: impl Fn(&E) -> String + 'a,
    ) -> Self {
        Self {
            style: GridStyle::default(),
            describe_label: Box::new(describe_label),
            describe_event: Box::new(describe_event),
            format_label: None,
            format_event: None,
            format_time: None,
        }
    }

    pub fn with_style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label_formatter(
        mut self,
        format: impl Fn(&L, Option<usize>) -> String + 'a,
    ) -> Self {
        self.format_label = Some(Box::new(format));
        self
    }

    pub fn with_event_formatter(
        mut self,
        format: impl Fn(&E, Option<usize>) -> String + 'a,
    ) -> Self {
        self.format_event = Some(Box::new(format));
        self
    }

    pub fn with_time_formatter(
        mut self,
        format: impl Fn(u64, bool, Option<usize>) -> String + 'a,
    ) -> Self {
        self.format_time = Some(Box::new(format));
        self
    }

    pub fn label(&self, label: &L, required: Option<usize>) -> String {
        match &self.format_label {
            Some(format) => format(label, required),
            None => default_label(&(self.describe_label)(label), required, &self.style),
        }
    }

    pub fn event(&self, event: &E, required: Option<usize>) -> String {
        match &self.format_event {
            Some(format) => format(event, required),
            None => default_event(&(self.describe_event)(event), required, &self.style),
        }
    }

    pub fn time(&self, duration: u64, active: bool, required: Option<usize>) -> String {
        match &self.format_time {
            Some(format) => format(duration, active, required),
            None => default_time(duration, active, required, &self.style),
        }
    }

    /// An event cell for a timeline with nothing at that instant.
    pub fn blank(&self, width: usize) -> String {
        fill(self.style.order_padding, width)
    }
}

impl<'a, L: Display + 'a, E: Display + 'a> Default for FormatOptions<'a, L, E> {
    fn default() -> Self {
        Self::new(L::to_string, E::to_string)
    }
}

/// `text: `, left-padded to `required`.
pub fn default_label(text: &str, required: Option<usize>, style: &GridStyle) -> String {
    let label = format!("{text}: ");
    let missing = required.unwrap_or(0).saturating_sub(text_width(&label));
    let mut padded = fill(style.label_padding, missing);
    padded.push_str(&label);
    padded
}

/// Single characters as-is, anything else in parentheses; right-padded to
/// `required`.
pub fn default_event(text: &str, required: Option<usize>, style: &GridStyle) -> String {
    let mut event = if text_width(text) == 1 {
        text.to_string()
    } else {
        format!("({text})")
    };
    let missing = required.unwrap_or(0).saturating_sub(text_width(&event));
    event.push_str(&fill(style.time_padding, missing));
    event
}

/// Elapsed time: blanks while inactive, otherwise a dash fill, or a
/// `---~N~---` marker when the interval is too long to draw to scale.
///
/// The marker shows `duration - 8` and is centred in `required` when there is
/// room, with the odd fill character going to the right.
pub fn default_time(
    duration: u64,
    active: bool,
    required: Option<usize>,
    style: &GridStyle,
) -> String {
    let required = required.filter(|&width| width > 0);
    if !active {
        return fill(' ', required.unwrap_or(0));
    }

    let pad = style.time_padding;
    let contract = match required {
        None => duration > style.contract_after,
        Some(width) => (width as u64) < duration,
    };
    if contract {
        let marker = format!(
            "{pad}{pad}{pad}~{}~{pad}{pad}{pad}",
            duration.saturating_sub(MARKER_OVERHEAD)
        );
        let marker_width = text_width(&marker);
        if (marker_width as u64) < duration {
            return match required {
                Some(width) if width > marker_width => {
                    let extra = width - marker_width;
                    let left = extra / 2;
                    format!("{}{marker}{}", fill(pad, left), fill(pad, extra - left))
                }
                _ => marker,
            };
        }
    }

    let width = required.unwrap_or_else(|| usize::try_from(duration).unwrap_or(usize::MAX));
    fill(pad, width)
}

pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn fill(c: char, width: usize) -> String {
    std::iter::repeat_n(c, width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> GridStyle {
        GridStyle::default()
    }

    #[test]
    fn label_is_right_aligned() {
        assert_eq!(default_label("stream", None, &style()), "stream: ");
        assert_eq!(default_label("stream", Some(15), &style()), "       stream: ");
        assert_eq!(default_label("stream", Some(3), &style()), "stream: ");
    }

    #[test]
    fn event_wraps_longer_text() {
        assert_eq!(default_event("a", None, &style()), "a");
        assert_eq!(default_event("ab", None, &style()), "(ab)");
        assert_eq!(default_event("", None, &style()), "()");
        assert_eq!(default_event("e", Some(4), &style()), "e---");
    }

    #[test]
    fn short_gaps_draw_to_scale() {
        assert_eq!(default_time(10, true, None, &style()), "----------");
        assert_eq!(default_time(2, true, Some(3), &style()), "---");
        assert_eq!(default_time(4, false, Some(5), &style()), "     ");
        assert_eq!(default_time(50, false, None, &style()), "");
    }

    #[test]
    fn long_gap_contracts() {
        assert_eq!(default_time(50, true, None, &style()), "---~42~---");
        assert_eq!(default_time(49, true, Some(10), &style()), "---~41~---");
        assert_eq!(default_time(11, true, None, &style()), "---~3~---");
    }

    #[test]
    fn contracted_marker_is_centred() {
        assert_eq!(
            default_time(50, true, Some(20), &style()),
            "--------~42~--------"
        );
        assert_eq!(
            default_time(80, true, Some(21), &style()),
            "--------~72~---------"
        );
    }

    #[test]
    fn zero_width_counts_as_unconstrained() {
        assert_eq!(
            default_time(50, true, Some(0), &style()),
            default_time(50, true, None, &style())
        );
    }

    #[test]
    fn threshold_is_configurable() {
        let eager = GridStyle {
            contract_after: 4,
            ..GridStyle::default()
        };
        // Still drawn to scale: the marker would not be shorter.
        assert_eq!(default_time(9, true, None, &eager), "---------");
        assert_eq!(default_time(12, true, None, &eager), "---~4~---");
    }

    #[test]
    fn style_controls_fill_characters() {
        let dotted = GridStyle {
            time_padding: '.',
            order_padding: '_',
            label_padding: '>',
            ..GridStyle::default()
        };
        let options: FormatOptions<'_, &str, &str> = FormatOptions::default().with_style(dotted);
        assert_eq!(options.time(3, true, None), "...");
        assert_eq!(options.blank(2), "__");
        assert_eq!(options.label(&"s", Some(5)), ">>s: ");
        assert_eq!(options.event(&"xy", Some(6)), "(xy)..");
    }

    #[test]
    fn custom_formatter_overrides_only_its_piece() {
        let options: FormatOptions<'_, &str, u32> =
            FormatOptions::default().with_event_formatter(|n, _| format!("#{n}"));
        assert_eq!(options.event(&7, None), "#7");
        assert_eq!(options.label(&"s", None), "s: ");
        assert_eq!(options.time(3, true, None), "---");
    }

    #[test]
    fn describe_functions_serve_types_without_display() {
        struct Tick(u8);
        let options = FormatOptions::new(
            |label: &Tick| format!("t{}", label.0),
            |event: &Tick| event.0.to_string(),
        );
        assert_eq!(options.label(&Tick(1), None), "t1: ");
        assert_eq!(options.event(&Tick(12), None), "(12)");
    }

    #[test]
    fn style_deserializes_with_defaults() {
        let style: GridStyle = serde_json::from_str(r#"{ "contract_after": 20 }"#).unwrap();
        assert_eq!(style.contract_after, 20);
        assert_eq!(style.time_padding, '-');
    }
}
