use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Picker controls that are not keymap actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Cancel,
    Next,
    Previous,
    First,
    Last,
    ToggleMark,
    MarkAll,
    DeleteChar,
    ClearQuery,
    ToggleFuzzy,
    Insert(char),
}

/// Emacs style name of a key press: `enter`, `C-o`, `M-D`, `C-M-x`, `S-up`.
///
/// Shift is folded into printable characters, so Alt+Shift+d is `M-D`.
pub fn key_name(event: &KeyEvent) -> Option<String> {
    let base = match event.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(character) => character.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(number) => format!("f{}", number),
        _ => return None,
    };

    let mut name = String::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("C-");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("M-");
    }
    let printable = matches!(event.code, KeyCode::Char(character) if character != ' ');
    if event.modifiers.contains(KeyModifiers::SHIFT) && !printable {
        name.push_str("S-");
    }
    name.push_str(&base);

    Some(name)
}

pub fn control_for(event: &KeyEvent) -> Option<Control> {
    let control = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        KeyCode::Esc => Some(Control::Cancel),
        KeyCode::Char('g' | 'c') if control => Some(Control::Cancel),
        KeyCode::Down => Some(Control::Next),
        KeyCode::Char('n') if control => Some(Control::Next),
        KeyCode::Up => Some(Control::Previous),
        KeyCode::Char('p') if control => Some(Control::Previous),
        KeyCode::Home | KeyCode::PageUp => Some(Control::First),
        KeyCode::End | KeyCode::PageDown => Some(Control::Last),
        KeyCode::Tab => Some(Control::ToggleMark),
        KeyCode::Char('a') if control => Some(Control::MarkAll),
        KeyCode::Backspace => Some(Control::DeleteChar),
        KeyCode::Char('u') if control => Some(Control::ClearQuery),
        KeyCode::Char('s') if control => Some(Control::ToggleFuzzy),
        KeyCode::Char(character) if !control && !alt => Some(Control::Insert(character)),
        _ => None,
    }
}

/// Whether the key always leaves the picker, whatever the keymap says.
pub fn is_cancel(event: &KeyEvent) -> bool {
    matches!(control_for(event), Some(Control::Cancel))
}
