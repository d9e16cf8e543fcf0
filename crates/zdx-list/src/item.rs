//! Item capability traits and the stock text block.
//!
//! An item only has to know how to render itself at a given width. Focus
//! framing and highlight styling are optional capabilities queried at
//! render time; an item that doesn't expose them simply skips that step.

use ratatui::layout::{Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Block;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Per-cell style transform supplied by host theming.
pub type CellStyleFn = Box<dyn Fn(Style) -> Style>;

/// A renderable block in the list (message, tool call, attachment, ...).
pub trait Item {
    /// Renders the item's content at `width` columns.
    ///
    /// Must not fail: content producers degrade to plain text on error.
    fn render(&self, width: u16) -> Text<'static>;

    /// Focus framing capability, if the item supports it.
    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }

    /// Highlight styling capability, if the item supports it.
    fn as_highlightable(&self) -> Option<&dyn Highlightable> {
        None
    }
}

impl<T: Item + ?Sized> Item for Box<T> {
    fn render(&self, width: u16) -> Text<'static> {
        (**self).render(width)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        (**self).as_focusable()
    }

    fn as_highlightable(&self) -> Option<&dyn Highlightable> {
        (**self).as_highlightable()
    }
}

/// Items that draw a frame when selected in a focused list.
pub trait Focusable {
    fn focus_style(&self) -> FrameStyle;
    fn blur_style(&self) -> FrameStyle;
}

/// Items whose cells can be restyled by a mouse selection.
pub trait Highlightable {
    fn highlight_style(&self) -> CellStyleFn;
}

/// Distances from the outer edge of a framed item to its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Insets {
    pub fn horizontal(self) -> u16 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

/// Frame drawn around an item's content: outer margin, then the block's
/// borders/padding, with the block style applied to the framed area.
#[derive(Debug, Clone, Default)]
pub struct FrameStyle {
    pub block: Block<'static>,
    pub margin: Margin,
}

impl FrameStyle {
    pub fn new(block: Block<'static>) -> Self {
        Self {
            block,
            margin: Margin::new(0, 0),
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Total space the frame takes away from the content on each side.
    pub fn insets(&self) -> Insets {
        // Small enough that the probe area never gets clamped by `Rect::new`.
        let probe = Rect::new(0, 0, 200, 200);
        let inner = self.block.inner(probe.inner(self.margin));
        Insets {
            left: inner.x,
            right: probe.right().saturating_sub(inner.right()),
            top: inner.y,
            bottom: probe.bottom().saturating_sub(inner.bottom()),
        }
    }
}

/// A word-wrapped block of text with a single base style.
///
/// This is the stock item used by the pager and the tests: a prefix on the
/// first line (e.g. `"> "` for user turns), continuation lines indented to
/// line up with the content.
#[derive(Debug, Clone)]
pub struct TextItem {
    text: String,
    prefix: String,
    style: Style,
    prefix_style: Style,
    focus: Option<(FrameStyle, FrameStyle)>,
    highlight: Option<Style>,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prefix: String::new(),
            style: Style::default(),
            prefix_style: Style::default(),
            focus: None,
            highlight: None,
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>, style: Style) -> Self {
        self.prefix = prefix.into();
        self.prefix_style = style;
        self
    }

    /// Makes the item focusable with the given focused/blurred frames.
    #[must_use]
    pub fn focusable(mut self, focus: FrameStyle, blur: FrameStyle) -> Self {
        self.focus = Some((focus, blur));
        self
    }

    /// Makes the item highlightable; selected cells are patched with `style`.
    #[must_use]
    pub fn highlightable(mut self, style: Style) -> Self {
        self.highlight = Some(style);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Item for TextItem {
    fn render(&self, width: u16) -> Text<'static> {
        if self.text.is_empty() && self.prefix.is_empty() {
            return Text::default();
        }

        let prefix_width = self.prefix.width();
        let body_width = usize::from(width).saturating_sub(prefix_width).max(1);
        let indent = " ".repeat(prefix_width);

        let mut lines = Vec::new();
        for source_line in self.text.split('\n') {
            for chunk in wrap_line(source_line, body_width) {
                let lead = if lines.is_empty() {
                    Span::styled(self.prefix.clone(), self.prefix_style)
                } else {
                    Span::raw(indent.clone())
                };
                let mut spans = Vec::with_capacity(2);
                if prefix_width > 0 {
                    spans.push(lead);
                }
                spans.push(Span::styled(chunk, self.style));
                lines.push(Line::from(spans));
            }
        }
        Text::from(lines)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        self.focus.as_ref().map(|_| self as &dyn Focusable)
    }

    fn as_highlightable(&self) -> Option<&dyn Highlightable> {
        self.highlight.map(|_| self as &dyn Highlightable)
    }
}

impl Focusable for TextItem {
    fn focus_style(&self) -> FrameStyle {
        self.focus
            .as_ref()
            .map(|(focus, _)| focus.clone())
            .unwrap_or_default()
    }

    fn blur_style(&self) -> FrameStyle {
        self.focus
            .as_ref()
            .map(|(_, blur)| blur.clone())
            .unwrap_or_default()
    }
}

impl Highlightable for TextItem {
    fn highlight_style(&self) -> CellStyleFn {
        let patch = self.highlight.unwrap_or_default();
        Box::new(move |current: Style| current.patch(patch))
    }
}

/// Wraps a single source line at `width` display columns.
///
/// Breaks after whitespace when possible and falls back to breaking inside a
/// word that is wider than the whole line. Always yields at least one chunk,
/// so blank source lines survive as blank rows.
pub(crate) fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in line.split_word_bounds() {
        let word_width = word.width();

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if word.trim().is_empty() {
            // Whitespace at a break point is dropped.
            chunks.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }

        if !current.is_empty() && word_width <= width {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for grapheme in word.graphemes(true) {
            let grapheme_width = grapheme.width();
            if current_width + grapheme_width > width && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += grapheme_width;
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
