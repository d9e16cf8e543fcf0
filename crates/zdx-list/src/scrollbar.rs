//! Scrollbar for the list with a stable thumb size.
//!
//! ratatui's built-in `Scrollbar` rounds both thumb ends separately, so the
//! thumb length wobbles as the view moves. Here the length is computed once
//! from the content/viewport ratio and only the position changes.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

/// Line-based view of the list's scroll state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// All item lines plus the gaps between items.
    pub total_lines: usize,
    /// Lines above the viewport top.
    pub offset: usize,
    /// Lines the viewport shows.
    pub viewport: usize,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    pub fn is_scrollable(&self) -> bool {
        self.total_lines > self.viewport
    }
}

/// Draws a one-column scrollbar on the right edge of its area.
#[derive(Debug, Clone)]
pub struct Scrollbar {
    metrics: ScrollMetrics,
    thumb_style: Style,
    track_style: Style,
}

impl Scrollbar {
    pub fn new(metrics: ScrollMetrics) -> Self {
        Self {
            metrics,
            thumb_style: Style::default(),
            track_style: Style::default(),
        }
    }

    #[must_use]
    pub fn thumb_style(mut self, style: Style) -> Self {
        self.thumb_style = style;
        self
    }

    #[must_use]
    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    /// Thumb `(start, len)` on a track of `track_len` cells.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_offset = self.metrics.max_offset();
        if track_len == 0 || max_offset == 0 {
            return None;
        }
        let viewport_len = self.metrics.viewport.min(track_len);

        // round(track_len * viewport_len / (total_lines - 1 + viewport_len))
        let denom = self
            .metrics
            .total_lines
            .saturating_sub(1)
            .saturating_add(viewport_len) as u64;
        let thumb_len = if denom > 0 {
            let numerator = track_len as u64 * viewport_len as u64;
            (((numerator + denom / 2) / denom) as usize).clamp(1, track_len)
        } else {
            track_len
        };

        // Reaches the bottom of the track exactly at max offset.
        let available = track_len.saturating_sub(thumb_len);
        let offset = self.metrics.offset.min(max_offset);
        let thumb_start = (offset as u64 * available as u64 / max_offset as u64) as usize;
        Some((thumb_start, thumb_len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.metrics.is_scrollable() || area.width == 0 {
            return;
        }
        let Some((thumb_start, thumb_len)) = self.thumb(usize::from(area.height)) else {
            return;
        };

        let x = area.right() - 1;
        for (idx, y) in (area.top()..area.bottom()).enumerate() {
            let (symbol, style) = if (thumb_start..thumb_start + thumb_len).contains(&idx) {
                (THUMB_SYMBOL, self.thumb_style)
            } else {
                (TRACK_SYMBOL, self.track_style)
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}
