//! Tick label formatting and multi-line wrapping.
//!
//! Widths are estimated from a measured character size when the host can
//! supply one; an unmeasurable layout degrades to a fixed default estimate
//! rather than failing.

use chrono::DateTime;

/// Estimated size of one character of tick text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CharSize {
    /// Conservative estimate used when text cannot be measured.
    fn default() -> Self {
        Self {
            width: 5.5,
            height: 11.5,
        }
    }
}

/// Fixed label-width budget for vertical (perpendicular) axes.
pub const VERTICAL_LABEL_BUDGET_PX: f64 = 95.0;
/// Fixed label-width budget for horizontal edge axes.
pub const HORIZONTAL_LABEL_BUDGET_PX: f64 = 110.0;
/// Breathing room subtracted from the inter-tick spacing on category axes.
const CATEGORY_SPACING_MARGIN_PX: f64 = 12.0;

/// What a tick value means, for label formatting.
#[derive(Debug, Clone, Copy)]
pub enum TickTextSource<'a> {
    Number,
    /// chrono format string applied to unix seconds.
    Time(&'a str),
    /// Category labels indexed by tick value.
    Categories(&'a [String]),
}

/// Formats one tick value.
#[must_use]
pub fn format_tick(source: TickTextSource<'_>, value: f64) -> String {
    match source {
        TickTextSource::Number => format_number(value),
        TickTextSource::Time(format) => DateTime::from_timestamp(value as i64, 0)
            .map(|datetime| datetime.format(format).to_string())
            .unwrap_or_else(|| format_number(value)),
        TickTextSource::Categories(categories) => {
            let index = value.round();
            if index >= 0.0 && (index as usize) < categories.len() {
                categories[index as usize].clone()
            } else {
                String::new()
            }
        }
    }
}

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Maximum label width for one axis configuration.
///
/// Category axes derive it from the inter-tick pixel spacing; horizontal and
/// vertical axes use fixed budgets; an explicit override wins.
#[must_use]
pub fn max_label_width(
    horizontal: bool,
    is_category: bool,
    tick_spacing_px: f64,
    width_override: Option<f64>,
) -> f64 {
    if let Some(width) = width_override
        && width.is_finite()
        && width > 0.0
    {
        return width;
    }
    if !horizontal {
        return VERTICAL_LABEL_BUDGET_PX;
    }
    if is_category && tick_spacing_px.is_finite() && tick_spacing_px > 0.0 {
        return (tick_spacing_px - CATEGORY_SPACING_MARGIN_PX).max(1.0);
    }
    HORIZONTAL_LABEL_BUDGET_PX
}

/// Greedy line wrap: split at the last whitespace boundary still fitting the
/// width, falling back to a hard character split when no whitespace fits.
#[must_use]
pub fn wrap_label(text: &str, max_width_px: f64, char_size: CharSize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let max_chars = if char_size.width > 0.0 && max_width_px.is_finite() && max_width_px > 0.0 {
        ((max_width_px / char_size.width).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();
    while rest.len() > max_chars {
        let window = &rest[..max_chars];
        let split_at = window
            .iter()
            .rposition(|character| character.is_whitespace())
            // Hard split when no whitespace fits inside the budget.
            .unwrap_or(max_chars);
        let line: String = rest[..split_at].iter().collect();
        let skip = if split_at < rest.len() && rest[split_at].is_whitespace() {
            split_at + 1
        } else {
            split_at
        };
        lines.push(line);
        rest.drain(..skip);
        if lines.len() > 32 {
            // Pathological budgets stop wrapping instead of spinning.
            break;
        }
    }
    lines.push(rest.iter().collect());
    lines
}
