use ratatui::style::{Modifier, Style};
use ratatui::text::Text;
use zdx_list::{HighlightRange, ItemPoint, List, ScrollPosition, TextItem};

fn block(height: usize) -> TextItem {
    let text = (0..height)
        .map(|row| format!("line {row}"))
        .collect::<Vec<_>>()
        .join("\n");
    TextItem::new(text).highlightable(Style::default().add_modifier(Modifier::REVERSED))
}

fn list_of(heights: &[usize], gap: usize, viewport: u16) -> List<TextItem> {
    let mut list = List::new(heights.iter().map(|&h| block(h)).collect()).with_gap(gap);
    list.set_size(30, viewport);
    list
}

fn styled_cells(text: &Text<'_>) -> usize {
    text.lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|span| span.style.add_modifier.contains(Modifier::REVERSED))
        .map(|span| span.content.chars().count())
        .sum()
}

/// Lines from the scroll position to the end of the content.
fn remaining_lines(heights: &[usize], gap: usize, position: ScrollPosition) -> usize {
    let mut total = 0;
    for idx in position.offset_idx..heights.len() {
        total += heights[idx];
        if idx == position.offset_idx {
            total -= position.offset_line;
        }
        if idx + 1 < heights.len() {
            total += gap;
        }
    }
    total
}

const LAYOUTS: [&[usize]; 6] = [
    &[1],
    &[2, 3, 2],
    &[1, 1, 1, 1, 1, 1],
    &[5, 1, 7, 2],
    &[10],
    &[3, 0, 4, 1, 6, 2, 2],
];

const DELTAS: [isize; 12] = [1, 3, -2, 7, 1, -1, 20, -5, 2, -40, 4, 9];

#[test]
fn test_scroll_position_stays_valid() {
    for heights in LAYOUTS {
        for gap in 0..=3 {
            for viewport in 1..=8u16 {
                let mut list = list_of(heights, gap, viewport);
                for delta in DELTAS {
                    list.scroll_by(delta);
                    let position = list.position();
                    assert!(position.offset_idx < heights.len());
                    assert!(
                        position.offset_line <= heights[position.offset_idx],
                        "{heights:?} gap={gap} vh={viewport}: {position:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_bottom_and_top_are_idempotent() {
    for heights in LAYOUTS {
        for gap in 0..=3 {
            for viewport in 1..=8u16 {
                let mut list = list_of(heights, gap, viewport);

                list.scroll_to_bottom();
                let bottom = list.position();
                assert!(list.at_bottom());
                for n in [1, 2, 5, 100] {
                    list.scroll_by(n);
                    assert_eq!(list.position(), bottom, "{heights:?} gap={gap} vh={viewport}");
                }

                list.scroll_to_top();
                for n in [1, 2, 5, 100] {
                    list.scroll_by(-n);
                    assert_eq!(list.position(), ScrollPosition::default());
                }
            }
        }
    }
}

#[test]
fn test_render_fills_viewport_or_remaining_content() {
    for heights in LAYOUTS {
        for gap in 0..=2 {
            for viewport in 1..=8u16 {
                let mut list = list_of(heights, gap, viewport);
                for delta in DELTAS {
                    list.scroll_by(delta);
                    let expected =
                        remaining_lines(heights, gap, list.position()).min(usize::from(viewport));
                    assert_eq!(
                        list.render().lines.len(),
                        expected,
                        "{heights:?} gap={gap} vh={viewport} at {:?}",
                        list.position()
                    );
                }
            }
        }
    }
}

#[test]
fn test_bottom_scenario() {
    let mut list = list_of(&[2, 3, 2], 1, 5);
    list.scroll_to_bottom();
    assert_eq!(list.position(), ScrollPosition::new(1, 1));
    let rendered = list.render();
    assert_eq!(rendered.lines.len(), 5);
    let blank = rendered
        .lines
        .iter()
        .filter(|line| line.spans.is_empty())
        .count();
    assert_eq!(blank, 1);
}

#[test]
fn test_short_content_bottom_equals_top() {
    let mut list = list_of(&[1], 1, 10);
    list.scroll_to_bottom();
    assert_eq!(list.position(), ScrollPosition::new(0, 0));
    assert!(list.at_top());
}

#[test]
fn test_prepend_moves_first_item_and_offset() {
    let mut list = list_of(&[2, 2, 2, 2], 0, 3);
    list.scroll_by(3);
    let before = list.position();
    let first_text = list.item(0).map(|item| item.text().to_string());

    list.prepend_items(vec![TextItem::new("x"), TextItem::new("y"), TextItem::new("z")]);

    assert_eq!(list.position().offset_idx, before.offset_idx + 3);
    assert_eq!(list.position().offset_line, before.offset_line);
    assert_eq!(list.item(3).map(|item| item.text().to_string()), first_text);
}

#[test]
fn test_click_without_drag_styles_nothing() {
    let mut list = list_of(&[2, 3, 2], 1, 10);
    list.handle_mouse_down(3, 3);
    list.handle_mouse_up(3, 3);
    let range = list.highlight_range().expect("click leaves a range");
    assert_eq!(range.start, range.end);
    assert!(!list.has_highlight());
    assert_eq!(styled_cells(&list.render()), 0);
}

#[test]
fn test_forward_drag_scenario() {
    let range = HighlightRange::new(ItemPoint::new(0, 0, 2), ItemPoint::new(2, 1, 5));
    assert_eq!(range.start, ItemPoint::new(0, 0, 2));
    assert_eq!(range.end, ItemPoint::new(2, 1, 5));
}

#[test]
fn test_drag_direction_does_not_change_highlight() {
    // Rows: 0-1 item 0, 2 gap, 3-5 item 1, 6 gap, 7-8 item 2.
    let points = [(0, 0), (4, 1), (2, 3), (6, 5), (1, 8), (5, 7)];
    for &(ax, ay) in &points {
        for &(bx, by) in &points {
            let mut forward = list_of(&[2, 3, 2], 1, 10);
            forward.handle_mouse_down(ax, ay);
            forward.handle_mouse_up(bx, by);

            let mut backward = list_of(&[2, 3, 2], 1, 10);
            backward.handle_mouse_down(bx, by);
            backward.handle_mouse_up(ax, ay);

            assert_eq!(forward.highlight_range(), backward.highlight_range());
            assert_eq!(forward.highlighted_text(), backward.highlighted_text());
        }
    }
}

#[test]
fn test_rest_of_line_highlight_stops_at_content() {
    let mut list = List::new(vec![
        block(1),
        TextItem::new("0123456789")
            .highlightable(Style::default().add_modifier(Modifier::REVERSED)),
        block(1),
    ]);
    list.set_size(40, 5);
    // The middle item is covered through the end of its line.
    list.handle_mouse_down(0, 0);
    list.handle_mouse_up(3, 2);

    let rendered = list.render();
    let second = &rendered.lines[1];
    let styled: String = second
        .spans
        .iter()
        .filter(|span| span.style.add_modifier.contains(Modifier::REVERSED))
        .map(|span| span.content.as_ref())
        .collect();
    assert_eq!(styled, "0123456789");
}

#[test]
fn test_streaming_append_follows_bottom() {
    let mut list = list_of(&[3, 3], 1, 4);
    list.scroll_to_bottom();

    for round in 0..5 {
        let follow = list.at_bottom();
        list.append_items([block(round + 1)]);
        if follow {
            list.scroll_to_bottom();
        }
        assert!(list.at_bottom());
    }
}
