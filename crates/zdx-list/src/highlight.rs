//! Cell-level highlight rendering and selected-text extraction.
//!
//! The requested span is drawn cell by cell. On every row the styled run is
//! cut back to the last cell with visible content, so a selection never
//! bleeds over padding that only exists to fill out short lines.

use std::ops::Range;

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Text;

use crate::buffer::CellGrid;
use crate::item::Insets;
use crate::mouse::{END_OF_LINE, ItemSpan};

/// Applies `style_fn` to the cells of `content` covered by `span`.
///
/// `content` is drawn into a scratch grid `width` cells wide. Only cells
/// inside `paintable` are restyled; pass `None` to allow the whole grid.
pub fn render_with_highlight(
    content: &Text<'_>,
    width: u16,
    span: ItemSpan,
    paintable: Option<Rect>,
    style_fn: &dyn Fn(Style) -> Style,
) -> Text<'static> {
    let mut grid = CellGrid::from_text(content, width);
    let paintable = paintable.map_or(grid.area(), |area| area.intersection(grid.area()));
    for (row, cols) in highlighted_rows(&grid, span) {
        grid.restyle(row, cols, paintable, style_fn);
    }
    grid.into_text()
}

/// Plain text of `content` covered by `span`, clipped the same way the
/// renderer clips. Rows are joined with `'\n'`.
pub fn selected_text(content: &Text<'_>, width: u16, span: ItemSpan) -> String {
    let grid = CellGrid::from_text(content, width);
    let last_row = span.end_row.min(usize::from(grid.height()).saturating_sub(1));
    if grid.height() == 0 || span.start_row > last_row {
        return String::new();
    }

    let mut rows = Vec::with_capacity(last_row - span.start_row + 1);
    for row in span.start_row..=last_row {
        let text = clip_row(&grid, span, row)
            .map(|(y, cols)| grid.row_symbols(y, cols))
            .unwrap_or_default();
        rows.push(text);
    }
    rows.join("\n")
}

/// Rows of `grid` touched by `span`, each with its clipped column range.
fn highlighted_rows(grid: &CellGrid, span: ItemSpan) -> Vec<(u16, Range<u16>)> {
    let height = usize::from(grid.height());
    if height == 0 {
        return Vec::new();
    }
    let last_row = span.end_row.min(height - 1);
    (span.start_row..=last_row)
        .filter_map(|row| clip_row(grid, span, row))
        .collect()
}

fn clip_row(grid: &CellGrid, span: ItemSpan, row: usize) -> Option<(u16, Range<u16>)> {
    let (start, end) = span.cols_for_row(row)?;
    let row = u16::try_from(row).ok()?;
    let line_len = usize::from(grid.width());
    let end = if end == END_OF_LINE { line_len } else { end.min(line_len) };
    let start = start.min(end);
    if start == end {
        return None;
    }
    let cols = to_u16(start)..to_u16(end);
    grid.clip_to_content(row, cols).map(|cols| (row, cols))
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl ItemSpan {
    /// Maps a span in framed-block coordinates onto the unframed content
    /// (`content_height` rows) the frame was drawn around.
    ///
    /// Points on the frame snap inward: a start above the content begins at
    /// its first cell, an end below it runs through its last row. Returns
    /// `None` when the span misses the content entirely.
    pub fn to_content(self, insets: Insets, content_height: usize) -> Option<Self> {
        if content_height == 0 {
            return None;
        }
        let top = usize::from(insets.top);
        let left = usize::from(insets.left);

        let (start_row, start_col) = if self.start_row < top {
            (0, 0)
        } else {
            (self.start_row - top, self.start_col.saturating_sub(left))
        };
        if start_row >= content_height || self.end_row < top {
            return None;
        }

        let (end_row, end_col) = if self.end_row - top >= content_height {
            (content_height - 1, END_OF_LINE)
        } else if self.end_col == END_OF_LINE {
            (self.end_row - top, END_OF_LINE)
        } else {
            (self.end_row - top, self.end_col.saturating_sub(left))
        };

        Some(Self {
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};
    use ratatui::text::Line;

    use super::*;
    use crate::buffer::plain_text;

    fn reverse(style: Style) -> Style {
        style.add_modifier(Modifier::REVERSED)
    }

    /// Column indices on `row` whose style carries REVERSED.
    fn reversed_cols(text: &Text<'_>, row: usize) -> Vec<usize> {
        let mut cols = Vec::new();
        let mut x = 0;
        for span in &text.lines[row].spans {
            for _ in span.content.chars() {
                if span.style.add_modifier.contains(Modifier::REVERSED) {
                    cols.push(x);
                }
                x += 1;
            }
        }
        cols
    }

    #[test]
    fn test_rest_of_line_stops_at_last_character() {
        // A 40-column line whose real content ends at column 10.
        let line = format!("{:<40}", "0123456789");
        let content = Text::from(line);
        let out = render_with_highlight(&content, 40, ItemSpan::full(1), None, &reverse);
        assert_eq!(reversed_cols(&out, 0), (0..10).collect::<Vec<_>>());
        assert_eq!(plain_text(&out).len(), 40);
    }

    #[test]
    fn test_blank_row_gets_no_style() {
        let content = Text::from(vec![Line::from("ab"), Line::from("    "), Line::from("cd")]);
        let out = render_with_highlight(&content, 10, ItemSpan::full(3), None, &reverse);
        assert_eq!(reversed_cols(&out, 0), vec![0, 1]);
        assert!(reversed_cols(&out, 1).is_empty());
        assert_eq!(reversed_cols(&out, 2), vec![0, 1]);
    }

    #[test]
    fn test_partial_rows() {
        let content = Text::from(vec![Line::from("hello"), Line::from("world")]);
        let span = ItemSpan {
            start_row: 0,
            start_col: 2,
            end_row: 1,
            end_col: 3,
        };
        let out = render_with_highlight(&content, 10, span, None, &reverse);
        assert_eq!(reversed_cols(&out, 0), vec![2, 3, 4]);
        assert_eq!(reversed_cols(&out, 1), vec![0, 1, 2]);
        assert_eq!(selected_text(&content, 10, span), "llo\nwor");
    }

    #[test]
    fn test_empty_span_styles_nothing() {
        let content = Text::from("hello");
        let span = ItemSpan {
            start_row: 0,
            start_col: 2,
            end_row: 0,
            end_col: 2,
        };
        let out = render_with_highlight(&content, 10, span, None, &reverse);
        assert!(reversed_cols(&out, 0).is_empty());
    }

    #[test]
    fn test_paintable_area_excludes_cells() {
        let content = Text::from("abcdef");
        let paintable = Rect::new(2, 0, 2, 1);
        let out = render_with_highlight(&content, 6, ItemSpan::full(1), Some(paintable), &reverse);
        assert_eq!(reversed_cols(&out, 0), vec![2, 3]);
    }

    #[test]
    fn test_style_fn_sees_current_cell_style() {
        let content = Text::from(Line::styled("ab", Style::default().fg(Color::Green)));
        let out = render_with_highlight(
            &content,
            4,
            ItemSpan::full(1),
            None,
            &|s: Style| s.bg(Color::Blue),
        );
        let style = out.lines[0].spans[0].style;
        assert_eq!(style.fg, Some(Color::Green));
        assert_eq!(style.bg, Some(Color::Blue));
    }

    #[test]
    fn test_selected_text_trims_padding() {
        let content = Text::from(vec![Line::from("one   "), Line::from("two")]);
        assert_eq!(selected_text(&content, 10, ItemSpan::full(2)), "one\ntwo");
    }

    #[test]
    fn test_to_content_strips_frame() {
        let insets = Insets {
            left: 2,
            right: 2,
            top: 1,
            bottom: 1,
        };
        // Whole framed block (content 3 rows + 2 frame rows).
        assert_eq!(
            ItemSpan::full(5).to_content(insets, 3),
            Some(ItemSpan::full(3))
        );

        let span = ItemSpan {
            start_row: 1,
            start_col: 4,
            end_row: 2,
            end_col: 5,
        };
        assert_eq!(
            span.to_content(insets, 3),
            Some(ItemSpan {
                start_row: 0,
                start_col: 2,
                end_row: 1,
                end_col: 3,
            })
        );

        // Entirely on the bottom border.
        let span = ItemSpan {
            start_row: 4,
            start_col: 0,
            end_row: 4,
            end_col: 3,
        };
        assert_eq!(span.to_content(insets, 3), None);
    }
}
