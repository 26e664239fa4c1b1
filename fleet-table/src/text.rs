//! Fixed-width text rendering of a [`ViewModel`].

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::column::ColumnWidth;
use crate::view::{HeaderCell, Layout, RowAction, ViewModel};

const GUTTER: usize = 3;
const SEPARATOR: &str = "  ";
const INDENT: &str = "      ";

/// Options for [`render_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    /// Total width in terminal columns.
    pub width: usize,
    /// Position of the highlighted row on the current page.
    pub cursor: Option<usize>,
    /// Draw a caret after the search term.
    pub search_focused: bool,
}

impl TextOptions {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            cursor: None,
            search_focused: false,
        }
    }
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Cut `s` to at most `max_width` columns, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - 1;
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push('…');
    result
}

/// Truncate or right-pad `s` to exactly `width` columns.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let mut fitted = truncate_to_width(s, width);
    let fitted_width = display_width(&fitted);
    fitted.extend(std::iter::repeat_n(' ', width.saturating_sub(fitted_width)));
    fitted
}

/// Distribute `available` columns over the headers.
///
/// Fixed columns get their width; flex columns share what is left by weight,
/// each getting at least one column. The last flex column takes the
/// rounding remainder.
pub fn column_widths(headers: &[HeaderCell], available: usize) -> Vec<usize> {
    let fixed: usize = headers
        .iter()
        .map(|h| match h.width {
            ColumnWidth::Fixed(n) => usize::from(n),
            ColumnWidth::Flex(_) => 0,
        })
        .sum();
    let total_weight: usize = headers
        .iter()
        .map(|h| match h.width {
            ColumnWidth::Flex(weight) => usize::from(weight.max(1)),
            ColumnWidth::Fixed(_) => 0,
        })
        .sum();
    let last_flex = headers
        .iter()
        .rposition(|h| matches!(h.width, ColumnWidth::Flex(_)));

    let remaining = available.saturating_sub(fixed);
    let mut handed_out = 0;

    headers
        .iter()
        .enumerate()
        .map(|(i, h)| match h.width {
            ColumnWidth::Fixed(n) => usize::from(n),
            ColumnWidth::Flex(weight) => {
                let share = if Some(i) == last_flex {
                    remaining.saturating_sub(handed_out)
                } else {
                    remaining * usize::from(weight.max(1)) / total_weight.max(1)
                };
                handed_out += share;
                share.max(1)
            }
        })
        .collect()
}

fn actions_text(actions: &[RowAction]) -> String {
    actions
        .iter()
        .map(|a| format!("[{}]", a.label))
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(SEPARATOR)
}

/// Lay out a view model as lines of at most `options.width` columns.
///
/// Layout, top to bottom: search line (when searchable), header, rule, one
/// line per row (plus secondary fields and actions under expanded rows),
/// rule, summary and pagination line.
pub fn render_lines<K>(view: &ViewModel<K>, options: &TextOptions) -> Vec<String> {
    let width = options.width;
    let mut lines = Vec::new();

    if let Some(search) = &view.search {
        let caret = if options.search_focused { "▏" } else { "" };
        let mut line = format!("Search: {}{}", search.term, caret);
        if view.active_filters > 0 {
            line.push_str(&format!("  [{} filter(s)]", view.active_filters));
        }
        lines.push(truncate_to_width(&line, width));
    }

    let actions_width = match view.layout {
        Layout::Wide => view
            .rows
            .iter()
            .map(|row| display_width(&actions_text(&row.actions)))
            .max()
            .unwrap_or(0),
        Layout::Compact => 0,
    };
    let separators = display_width(SEPARATOR) * view.headers.len().saturating_sub(1);
    let actions_slot = if actions_width > 0 {
        actions_width + display_width(SEPARATOR)
    } else {
        0
    };
    let available = width
        .saturating_sub(GUTTER)
        .saturating_sub(separators)
        .saturating_sub(actions_slot);
    let widths = column_widths(&view.headers, available);

    let header = join_cells(view.headers.iter().zip(&widths).map(|(h, &w)| {
        let label = match h.sort {
            Some(direction) => format!("{} {}", h.label, direction.indicator()),
            None => h.label.clone(),
        };
        fit_to_width(&label, w)
    }));
    lines.push(truncate_to_width(
        &format!("{}{}", " ".repeat(GUTTER), header.trim_end()),
        width,
    ));
    lines.push("─".repeat(width));

    for (position, row) in view.rows.iter().enumerate() {
        let cursor = if options.cursor == Some(position) { '>' } else { ' ' };
        let marker = match (row.expandable, row.expanded) {
            (true, true) => '▾',
            (true, false) => '▸',
            (false, _) => ' ',
        };

        let mut line = format!(
            "{}{} {}",
            cursor,
            marker,
            join_cells(
                row.cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| fit_to_width(&cell.display(), w))
            )
        );
        if view.layout == Layout::Wide && !row.actions.is_empty() {
            line.push_str(SEPARATOR);
            line.push_str(&actions_text(&row.actions));
        }
        lines.push(truncate_to_width(line.trim_end(), width));

        if row.expanded {
            for field in &row.secondary {
                let text = format!("{}{}: {}", INDENT, field.label, field.cell.display());
                lines.push(truncate_to_width(&text, width));
            }
            if !row.actions.is_empty() {
                let text = format!("{}{}", INDENT, actions_text(&row.actions));
                lines.push(truncate_to_width(&text, width));
            }
        }
    }

    lines.push("─".repeat(width));

    let mut footer = view.summary.to_string();
    if let Some(controls) = &view.pagination {
        let prev = if controls.prev_enabled { "‹ prev" } else { "      " };
        let next = if controls.next_enabled { "next ›" } else { "      " };
        footer.push_str(&format!(
            "   {}  Page {} of {}  {}",
            prev, controls.page, controls.total_pages, next
        ));
    }
    lines.push(truncate_to_width(footer.trim_end(), width));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Ford Ranger", 6), "Ford …");
        assert_eq!(truncate_to_width("Ford", 6), "Ford");
    }

    #[test]
    fn fit_pads_to_width() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(display_width(&fit_to_width("日本語", 4)), 4);
    }
}
