//! Transcript loading and item styling.
//!
//! A transcript is JSONL, one `{"role": ..., "text": ...}` object per line.
//! Blank lines are skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use serde::Deserialize;
use zdx_list::{FrameStyle, TextItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub role: Role,
    pub text: String,
}

/// Reads every entry of the transcript at `path`.
pub fn load(path: &Path) -> Result<Vec<Entry>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    parse(&contents).with_context(|| format!("Invalid transcript {}", path.display()))
}

pub fn parse(contents: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: Entry =
            serde_json::from_str(line).with_context(|| format!("line {}", idx + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Builds the list item for one transcript entry.
pub fn to_item(entry: &Entry) -> TextItem {
    let item = TextItem::new(entry.text.clone()).highlightable(highlight_style());
    match entry.role {
        Role::User => item
            .prefix(
                "│ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::ITALIC),
            )
            .focusable(focus_frame(Color::Green), blur_frame()),
        Role::Assistant => item.style(Style::default().fg(Color::White)),
        Role::System => item
            .prefix(
                "! ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().fg(Color::DarkGray)),
        Role::Tool => item
            .prefix(
                "$ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().fg(Color::DarkGray))
            .focusable(focus_frame(Color::Yellow), blur_frame()),
    }
}

fn highlight_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

fn focus_frame(color: Color) -> FrameStyle {
    FrameStyle::new(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color)),
    )
}

/// Unselected items sit flush; an empty frame keeps them unbordered.
fn blur_frame() -> FrameStyle {
    FrameStyle::default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;
    use zdx_list::Item;

    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let contents = r#"{"role":"user","text":"hi"}

{"role":"assistant","text":"hello\nthere"}
"#;
        let entries = parse(contents).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].text, "hello\nthere");
    }

    #[test]
    fn test_parse_reports_line_number() {
        let contents = "{\"role\":\"user\",\"text\":\"ok\"}\n{\"role\":\"robot\",\"text\":\"x\"}\n";
        let err = parse(contents).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.jsonl");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.jsonl"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        fs::write(&path, "{\"role\":\"tool\",\"text\":\"ls\"}\n").unwrap();
        let entries = load(&path).unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                role: Role::Tool,
                text: "ls".to_string(),
            }]
        );
    }

    #[test]
    fn test_roles_map_to_capabilities() {
        let entry = |role| Entry {
            role,
            text: "x".to_string(),
        };
        for role in [Role::User, Role::Tool] {
            let item = to_item(&entry(role));
            assert!(item.as_focusable().is_some());
            assert!(item.as_highlightable().is_some());
        }
        for role in [Role::Assistant, Role::System] {
            let item = to_item(&entry(role));
            assert!(item.as_focusable().is_none());
            assert!(item.as_highlightable().is_some());
        }
    }
}
