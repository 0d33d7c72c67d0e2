use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{DisplayConfig, TitleWidth};
use crate::domain::{DisplayRow, WindowEntry};

/// Rows of one formatting pass together with the width they were laid out at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBatch {
    pub rows: Vec<DisplayRow>,
    pub width: usize,
}

#[derive(Debug, Clone)]
pub struct CandidateFormatter {
    end_marker: String,
}

impl CandidateFormatter {
    pub fn new(end_marker: impl Into<String>) -> Self {
        Self {
            end_marker: end_marker.into(),
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.end_marker.clone())
    }

    pub fn resolve_width(&self, entries: &[WindowEntry], policy: TitleWidth) -> usize {
        match policy {
            TitleWidth::Fixed(columns) => columns,
            TitleWidth::Auto => entries
                .iter()
                .map(|entry| sanitize(&entry.title).width())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn format(&self, entries: &[WindowEntry], policy: TitleWidth, detail: bool) -> FormattedBatch {
        let width = self.resolve_width(entries, policy);
        FormattedBatch {
            rows: self.format_with_width(entries, width, detail),
            width,
        }
    }

    /// Lays rows out at an already resolved width.
    pub fn format_with_width(
        &self,
        entries: &[WindowEntry],
        width: usize,
        detail: bool,
    ) -> Vec<DisplayRow> {
        entries
            .iter()
            .map(|entry| DisplayRow {
                title: self.fit_title(&entry.title, width),
                class_name: entry.class_name.clone(),
                source_id: entry.id,
                detail,
            })
            .collect()
    }

    /// Truncates or pads `title` to exactly `width` display columns.
    pub fn fit_title(&self, title: &str, width: usize) -> String {
        let title = sanitize(title);
        let title_width = title.width();

        if title_width <= width {
            return pad(title, width - title_width);
        }

        let marker_width = self.end_marker.width();
        let (fitted, used) = if marker_width < width {
            let (mut body, used) = take_columns(&title, width - marker_width);
            body.push_str(&self.end_marker);
            (body, used + marker_width)
        } else {
            take_columns(&title, width)
        };

        pad(fitted, width - used)
    }
}

impl Default for CandidateFormatter {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

fn sanitize(title: &str) -> String {
    title
        .chars()
        .map(|character| if character.is_control() { ' ' } else { character })
        .collect()
}

fn take_columns(text: &str, columns: usize) -> (String, usize) {
    let mut taken = String::new();
    let mut used = 0;

    for character in text.chars() {
        let character_width = character.width().unwrap_or(0);
        if used + character_width > columns {
            break;
        }
        taken.push(character);
        used += character_width;
    }

    (taken, used)
}

fn pad(mut text: String, columns: usize) -> String {
    text.extend(std::iter::repeat(' ').take(columns));
    text
}
