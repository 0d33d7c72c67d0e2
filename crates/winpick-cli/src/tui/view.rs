use std::collections::HashSet;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use winpick_core::selector::VisibleRow;
use winpick_core::{ActionId, Keymap, SelectorSession, StatusLevel};

const SELECTED_MARKER: &str = "\u{25B8}";
const MARK: &str = "*";

pub fn render(frame: &mut Frame, session: &SelectorSession) {
    let [header, list, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(query_line(session)), header);
    render_list(frame, list, session);
    frame.render_widget(Paragraph::new(footer_line(session)), footer);
}

fn query_line(session: &SelectorSession) -> Line<'static> {
    let query = session.query();
    let mode = if query.fuzzy { "fuzzy" } else { "substring" };

    Line::from(vec![
        Span::styled(
            session.source().name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " > ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(query.text.clone()),
        Span::styled(
            format!(
                "  {}/{} [{}]",
                session.match_count(),
                session.snapshot().len(),
                mode
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_list(frame: &mut Frame, area: Rect, session: &SelectorSession) {
    let height = area.height as usize;
    if height == 0 {
        return;
    }

    if session.match_count() == 0 {
        let line = Line::from(Span::styled(
            "No matches",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let offset = scroll_offset(session.cursor(), height);
    let lines: Vec<Line> = session
        .visible_rows()
        .skip(offset)
        .take(height)
        .map(|visible| Line::from(row_spans(&visible)))
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// First row to draw so that `cursor` stays inside a list of `height` rows.
fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 || cursor < height {
        0
    } else {
        cursor + 1 - height
    }
}

/// Styled spans for one row: selection and mark gutter, then the row text
/// with matched characters highlighted and the class column dimmed.
fn row_spans(visible: &VisibleRow<'_>) -> Vec<Span<'static>> {
    let background = if visible.selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let gutter = format!(
        "{}{} ",
        if visible.selected { SELECTED_MARKER } else { " " },
        if visible.marked { MARK } else { " " }
    );
    let mut spans = vec![Span::styled(
        gutter,
        background.fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )];

    let text = visible.row.text();
    let matched: HashSet<usize> = visible.positions.iter().copied().collect();
    let class_offset = visible.row.class_offset().unwrap_or(usize::MAX);

    let style_at = |index: usize| {
        if matched.contains(&index) {
            background.fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if index >= class_offset {
            background.fg(Color::Blue)
        } else {
            background
        }
    };

    let mut current = String::new();
    let mut current_style = style_at(0);

    for (index, character) in text.chars().enumerate() {
        let style = style_at(index);
        if style != current_style && !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), current_style));
        }
        current_style = style;
        current.push(character);
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, current_style));
    }

    spans
}

fn footer_line(session: &SelectorSession) -> Line<'static> {
    match session.status() {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => Color::Green,
                StatusLevel::Warning => Color::Yellow,
            };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
        None => {
            let marked = session.marked_count();
            let mut hints = key_hints(session.source().keymap());
            if marked > 0 {
                hints = format!("{} marked  {}", marked, hints);
            }
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        }
    }
}

fn key_hints(keymap: &Keymap) -> String {
    let mut hints: Vec<String> = ActionId::ALL
        .iter()
        .filter_map(|action| {
            keymap
                .keys_for(*action)
                .first()
                .map(|key| format!("{} {}", key, action))
        })
        .collect();
    hints.push("tab mark".to_string());
    hints.push("esc cancel".to_string());
    hints.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use winpick_core::{DisplayRow, WindowId};

    fn row(detail: bool) -> DisplayRow {
        DisplayRow {
            title: "Inbox ".to_string(),
            class_name: "Mail".to_string(),
            source_id: WindowId(1),
            detail,
        }
    }

    fn texts(spans: &[Span<'_>]) -> Vec<String> {
        spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn matched_characters_get_their_own_spans() {
        let row = row(false);
        let positions = [0, 1];
        let visible = VisibleRow {
            row: &row,
            positions: &positions,
            selected: false,
            marked: false,
        };

        let spans = row_spans(&visible);

        assert_eq!(texts(&spans), vec!["   ", "In", "box "]);
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn class_column_is_a_separate_span() {
        let row = row(true);
        let visible = VisibleRow {
            row: &row,
            positions: &[],
            selected: true,
            marked: true,
        };

        let spans = row_spans(&visible);

        assert_eq!(texts(&spans), vec!["\u{25B8}* ", "Inbox   ", "Mail"]);
        assert_eq!(spans[2].style.fg, Some(Color::Blue));
        assert_eq!(spans[2].style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(12, 5), 8);
    }

    #[test]
    fn hints_list_the_first_key_of_each_action() {
        let hints = key_hints(&Keymap::window_defaults());

        assert!(hints.starts_with("enter switch  C-o switch-other-window"));
        assert!(hints.contains("M-D kill"));
        assert!(hints.ends_with("esc cancel"));
    }
}
