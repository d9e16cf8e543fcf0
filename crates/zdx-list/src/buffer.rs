//! Bridge between styled text and the terminal cell grid.
//!
//! Highlighting and framing both work on individual cells, so content is
//! drawn into a scratch `Buffer`, mutated, and read back into `Text`.

use std::ops::Range;

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::item::FrameStyle;

/// A scratch cell grid holding one item's content.
///
/// Remembers how wide each drawn row was so reading it back doesn't pad
/// short lines out to the buffer width. Row alignment is kept aside and
/// reapplied on the way out, since rows are drawn flush left.
#[derive(Debug, Clone)]
pub struct CellGrid {
    buf: Buffer,
    row_widths: Vec<u16>,
    alignments: Vec<Option<Alignment>>,
}

impl CellGrid {
    /// Draws `text` into a fresh grid `width` cells wide and one row per line.
    pub fn from_text(text: &Text<'_>, width: u16) -> Self {
        let height = u16::try_from(text.lines.len()).unwrap_or(u16::MAX);
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        let mut row_widths = Vec::with_capacity(text.lines.len());
        let mut alignments = Vec::with_capacity(text.lines.len());
        for (y, line) in (0..height).zip(text.lines.iter()) {
            let line = styled_line(text.style, line);
            let (end_x, _) = buf.set_line(0, y, &line, width);
            row_widths.push(end_x);
            alignments.push(line.alignment.or(text.alignment));
        }
        Self {
            buf,
            row_widths,
            alignments,
        }
    }

    pub fn width(&self) -> u16 {
        self.buf.area.width
    }

    pub fn height(&self) -> u16 {
        self.buf.area.height
    }

    pub fn area(&self) -> Rect {
        self.buf.area
    }

    /// Width of the content drawn on `row`.
    pub fn row_width(&self, row: u16) -> u16 {
        self.row_widths
            .get(usize::from(row))
            .copied()
            .unwrap_or_default()
    }

    pub fn cell(&self, x: u16, y: u16) -> &Cell {
        &self.buf[(x, y)]
    }

    /// Trims `cols` on `row` so it ends at the last cell holding visible
    /// content. Returns `None` when the span only covers blank cells.
    pub fn clip_to_content(&self, row: u16, cols: Range<u16>) -> Option<Range<u16>> {
        if row >= self.height() {
            return None;
        }
        let end = cols.end.min(self.width());
        let start = cols.start.min(end);
        let last = (start..end)
            .rev()
            .find(|&x| is_content(self.cell(x, row).symbol()))?;
        Some(start..last + 1)
    }

    /// Applies `style_fn` to every cell of `cols` on `row` that lies inside
    /// `paintable`.
    pub fn restyle(
        &mut self,
        row: u16,
        cols: Range<u16>,
        paintable: Rect,
        style_fn: &dyn Fn(Style) -> Style,
    ) {
        if row < paintable.top() || row >= paintable.bottom() {
            return;
        }
        let start = cols.start.max(paintable.left());
        let end = cols.end.min(paintable.right());
        for x in start..end {
            restyle_cell(&mut self.buf[(x, row)], style_fn);
        }
    }

    /// Plain symbols of `cols` on `row`, skipping cells hidden behind wide
    /// glyphs.
    pub fn row_symbols(&self, row: u16, cols: Range<u16>) -> String {
        let mut out = String::new();
        let mut x = cols.start;
        while x < cols.end.min(self.width()) {
            let symbol = self.cell(x, row).symbol();
            out.push_str(symbol);
            x += symbol_width(symbol);
        }
        out
    }

    /// Reads the grid back into styled text, merging runs of equal style.
    pub fn into_text(self) -> Text<'static> {
        let mut lines = Vec::with_capacity(usize::from(self.height()));
        for y in 0..self.height() {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            let mut x = 0;
            while x < self.row_width(y) {
                let cell = self.cell(x, y);
                let style = cell_style(cell);
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push_str(cell.symbol());
                x += symbol_width(cell.symbol());
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            let mut line = Line::from(spans);
            line.alignment = self.alignments.get(usize::from(y)).copied().flatten();
            lines.push(line);
        }
        Text::from(lines)
    }
}

/// Wraps already-rendered content in a frame `width` cells wide.
///
/// The frame is drawn first and the content on top of it, clipped to the
/// frame's inner area. Aligned lines are placed within the inner area.
pub fn frame_text(content: &Text<'_>, frame: &FrameStyle, width: u16) -> Text<'static> {
    let insets = frame.insets();
    let content_height = u16::try_from(content.lines.len()).unwrap_or(u16::MAX);
    let height = content_height.saturating_add(insets.vertical());
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);

    let outer = area.inner(frame.margin);
    frame.block.clone().render(outer, &mut buf);
    let inner = frame.block.inner(outer);

    for (y, line) in (inner.top()..inner.bottom()).zip(content.lines.iter()) {
        let line = styled_line(content.style, line);
        let free = inner
            .width
            .saturating_sub(u16::try_from(line.width()).unwrap_or(u16::MAX));
        let indent = match line.alignment.or(content.alignment) {
            Some(Alignment::Center) => free / 2,
            Some(Alignment::Right) => free,
            _ => 0,
        };
        buf.set_line(inner.left() + indent, y, &line, inner.width - indent);
    }

    let rows = usize::from(height);
    CellGrid {
        buf,
        row_widths: vec![width; rows],
        alignments: vec![None; rows],
    }
    .into_text()
}

/// Joins the plain symbols of `text`, one row per line.
pub fn plain_text(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn styled_line<'a>(base: Style, line: &Line<'a>) -> Line<'a> {
    let mut line = line.clone();
    line.style = base.patch(line.style);
    line
}

fn is_content(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != " "
}

fn symbol_width(symbol: &str) -> u16 {
    u16::try_from(symbol.width()).unwrap_or(1).max(1)
}

/// Cell style with terminal-default colors mapped back to "unset", so text
/// read from the grid patches cleanly over a parent style.
fn cell_style(cell: &Cell) -> Style {
    let mut style = Style::default().add_modifier(cell.modifier);
    if cell.fg != Color::Reset {
        style = style.fg(cell.fg);
    }
    if cell.bg != Color::Reset {
        style = style.bg(cell.bg);
    }
    if cell.underline_color != Color::Reset {
        style = style.underline_color(cell.underline_color);
    }
    style
}

fn restyle_cell(cell: &mut Cell, style_fn: &dyn Fn(Style) -> Style) {
    let next = style_fn(cell_style(cell));
    cell.fg = next.fg.unwrap_or_default();
    cell.bg = next.bg.unwrap_or_default();
    cell.underline_color = next.underline_color.unwrap_or_default();
    cell.modifier = next.add_modifier.difference(next.sub_modifier);
}

#[cfg(test)]
mod tests {
    use ratatui::style::Modifier;
    use ratatui::widgets::{Block, Borders};

    use super::*;

    #[test]
    fn test_round_trip_keeps_row_widths() {
        let text = Text::from(vec![Line::from("ab"), Line::from("abcd")]);
        let grid = CellGrid::from_text(&text, 10);
        assert_eq!(grid.row_width(0), 2);
        assert_eq!(plain_text(&grid.into_text()), "ab\nabcd");
    }

    #[test]
    fn test_round_trip_merges_style_runs() {
        let red = Style::default().fg(Color::Red);
        let text = Text::from(Line::from(vec![
            Span::styled("ab", red),
            Span::styled("c", red),
            Span::raw("d"),
        ]));
        let out = CellGrid::from_text(&text, 10).into_text();
        let spans = &out.lines[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "abc");
        assert_eq!(spans[0].style, red);
        assert_eq!(spans[1].content, "d");
    }

    #[test]
    fn test_wide_glyph_read_back_once() {
        let text = Text::from("你a");
        let grid = CellGrid::from_text(&text, 10);
        assert_eq!(grid.row_width(0), 3);
        assert_eq!(grid.row_symbols(0, 0..3), "你a");
        assert_eq!(plain_text(&grid.into_text()), "你a");
    }

    #[test]
    fn test_clip_to_content_trims_trailing_blanks() {
        let text = Text::from("abc      ");
        let grid = CellGrid::from_text(&text, 20);
        assert_eq!(grid.clip_to_content(0, 0..20), Some(0..3));
        assert_eq!(grid.clip_to_content(0, 3..20), None);
        assert_eq!(grid.clip_to_content(5, 0..20), None);
    }

    #[test]
    fn test_restyle_respects_paintable_area() {
        let text = Text::from("abcdef");
        let mut grid = CellGrid::from_text(&text, 6);
        let paintable = Rect::new(1, 0, 3, 1);
        grid.restyle(0, 0..6, paintable, &|s: Style| s.add_modifier(Modifier::REVERSED));
        let reversed: Vec<bool> = (0..6)
            .map(|x| grid.cell(x, 0).modifier.contains(Modifier::REVERSED))
            .collect();
        assert_eq!(reversed, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn test_frame_text_draws_border_around_content() {
        let frame = FrameStyle::new(Block::default().borders(Borders::ALL));
        let out = frame_text(&Text::from("hi"), &frame, 6);
        assert_eq!(plain_text(&out), "┌────┐\n│hi  │\n└────┘");
    }

    #[test]
    fn test_round_trip_keeps_alignment_and_underline_color() {
        let underlined = Style::default()
            .add_modifier(Modifier::UNDERLINED)
            .underline_color(Color::Green);
        let text = Text::from(vec![
            Line::from(Span::styled("ab", underlined)).alignment(Alignment::Right),
            Line::from("cd"),
        ]);
        let out = CellGrid::from_text(&text, 10).into_text();
        assert_eq!(out.lines[0].alignment, Some(Alignment::Right));
        assert_eq!(out.lines[1].alignment, None);
        assert_eq!(out.lines[0].spans[0].style.underline_color, Some(Color::Green));
    }

    #[test]
    fn test_restyle_keeps_underline_color() {
        let text = Text::from(Span::styled("ab", Style::default().underline_color(Color::Green)));
        let mut grid = CellGrid::from_text(&text, 4);
        grid.restyle(0, 0..2, grid.area(), &|s: Style| s.add_modifier(Modifier::REVERSED));
        assert_eq!(grid.cell(0, 0).underline_color, Color::Green);
        assert!(grid.cell(0, 0).modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_frame_text_aligns_content_inside_border() {
        let frame = FrameStyle::new(Block::default().borders(Borders::ALL));
        let content = Text::from(Line::from("hi").alignment(Alignment::Right));
        let out = frame_text(&content, &frame, 6);
        assert_eq!(plain_text(&out), "┌────┐\n│  hi│\n└────┘");
    }
}
