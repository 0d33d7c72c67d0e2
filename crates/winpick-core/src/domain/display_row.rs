use super::WindowId;

const CLASS_SEPARATOR: &str = "  ";

/// Rendered projection of a [`super::WindowEntry`]. Never mutated; a refresh
/// produces new rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub title: String,
    pub class_name: String,
    pub source_id: WindowId,
    pub detail: bool,
}

impl DisplayRow {
    pub fn class_label(&self) -> Option<&str> {
        self.detail.then_some(self.class_name.as_str())
    }

    /// Full row text as matched and drawn.
    pub fn text(&self) -> String {
        match self.class_label() {
            Some(class_name) => format!("{}{}{}", self.title, CLASS_SEPARATOR, class_name),
            None => self.title.clone(),
        }
    }

    /// Char index where the class label starts in [`DisplayRow::text`].
    pub fn class_offset(&self) -> Option<usize> {
        self.class_label()
            .map(|_| self.title.chars().count() + CLASS_SEPARATOR.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(detail: bool) -> DisplayRow {
        DisplayRow {
            title: "Inbox     ".to_string(),
            class_name: "Thunderbird".to_string(),
            source_id: WindowId(7),
            detail,
        }
    }

    #[test]
    fn text_appends_class_only_in_detail_mode() {
        assert_eq!(row(true).text(), "Inbox       Thunderbird");
        assert_eq!(row(false).text(), "Inbox     ");
    }

    #[test]
    fn class_offset_points_past_separator() {
        let detailed = row(true);
        let offset = detailed.class_offset().unwrap();

        let class_part: String = detailed.text().chars().skip(offset).collect();
        assert_eq!(class_part, "Thunderbird");
        assert_eq!(row(false).class_offset(), None);
    }
}
