use anyhow::Result;
use serde::Serialize;
use winpick_core::{CandidateFormatter, Config, WindowEntry, WindowSource};

use crate::services::Services;

#[derive(Serialize)]
struct WindowOutput {
    id: String,
    title: String,
    class: String,
    current: bool,
    focus_rank: u32,
}

impl From<&WindowEntry> for WindowOutput {
    fn from(entry: &WindowEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title.clone(),
            class: entry.class_name.clone(),
            current: entry.is_current,
            focus_rank: entry.last_focus_rank,
        }
    }
}

pub fn execute(config: &Config, class: Option<&str>, json: bool, detail: bool) -> Result<()> {
    let services = Services::connect(config)?;
    let entries = collect(&services.window_source(config), class)?;

    if json {
        print_json(&entries)?;
    } else {
        for line in render_rows(config, &entries, detail) {
            println!("{}", line);
        }
    }

    Ok(())
}

fn collect(source: &WindowSource, class: Option<&str>) -> Result<Vec<WindowEntry>> {
    let entries = match class {
        Some(class_name) => source.list_class(class_name)?,
        None => source.list(None)?,
    };
    Ok(entries)
}

fn render_rows(config: &Config, entries: &[WindowEntry], detail: bool) -> Vec<String> {
    let formatter = CandidateFormatter::from_config(&config.display);
    formatter
        .format(entries, config.display.title_width, detail)
        .rows
        .iter()
        .map(|row| row.text())
        .collect()
}

fn print_json(entries: &[WindowEntry]) -> Result<()> {
    let output: Vec<WindowOutput> = entries.iter().map(WindowOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use winpick_core::testing::StubWindowManager;
    use winpick_core::TitleWidth;

    fn source() -> WindowSource {
        WindowSource::new(Arc::new(StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "Inbox", "Thunderbird").with_rank(2),
            WindowEntry::new(2, "GitHub - Mozilla Firefox", "Firefox").current(),
            WindowEntry::new(3, "Rust docs - Mozilla Firefox", "Firefox").with_rank(1),
        ])))
    }

    fn narrow_config() -> Config {
        let mut config = Config::default();
        config.display.title_width = TitleWidth::Fixed(12);
        config
    }

    #[test]
    fn rows_are_padded_and_truncated_to_the_title_width() {
        let entries = collect(&source(), None).unwrap();

        let rows = render_rows(&narrow_config(), &entries, false);

        assert_eq!(
            rows,
            vec!["Inbox       ", "Rust docs...", "GitHub - ..."]
        );
    }

    #[test]
    fn detail_rows_append_the_class() {
        let entries = collect(&source(), Some("thunderbird")).unwrap();

        let rows = render_rows(&narrow_config(), &entries, true);

        assert_eq!(rows, vec!["Inbox         Thunderbird"]);
    }

    #[test]
    fn json_output_uses_hex_ids() {
        let entries = collect(&source(), Some("firefox")).unwrap();
        let output: Vec<WindowOutput> = entries.iter().map(WindowOutput::from).collect();

        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json[0]["id"], "0x00000003");
        assert_eq!(json[1]["current"], true);
    }
}
