use std::collections::HashMap;

use winpick_core::Placement;
use x11rb::protocol::xproto::{Atom, Window};

/// `WM_CLASS` holds `instance\0class\0`; the class part is preferred.
pub(super) fn parse_wm_class(value: &[u8]) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let parts: Vec<&str> = std::str::from_utf8(value)
        .ok()?
        .split('\0')
        .filter(|s| !s.is_empty())
        .collect();

    parts.get(1).or(parts.first()).map(|s| s.to_string())
}

/// `_NET_CLIENT_LIST_STACKING` is bottom to top; the top window is the most
/// recently raised and gets rank 0.
pub(super) fn focus_ranks(stacking: &[Window]) -> HashMap<Window, u32> {
    stacking
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, window)| (*window, rank as u32))
        .collect()
}

/// Windows without `_NET_WM_WINDOW_TYPE` are treated as normal windows.
pub(super) fn is_switchable(window_types: &[Atom], switchable: &[Atom]) -> bool {
    window_types.is_empty() || window_types.iter().any(|kind| switchable.contains(kind))
}

/// Desktop a window is moved to before activation. Only `OtherWindow`
/// moves it, onto the current desktop. `OtherFrame` leaves it on its own
/// desktop and the window manager switches the view there on activation.
pub(super) fn placement_desktop(placement: Placement, current_desktop: Option<u32>) -> Option<u32> {
    match placement {
        Placement::OtherWindow => current_desktop,
        Placement::Current | Placement::OtherFrame => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_other_window_moves_to_the_current_desktop() {
        assert_eq!(placement_desktop(Placement::OtherWindow, Some(3)), Some(3));
        assert_eq!(placement_desktop(Placement::OtherWindow, None), None);
        assert_eq!(placement_desktop(Placement::Current, Some(3)), None);
    }

    #[test]
    fn other_frame_never_changes_the_window_desktop() {
        assert_eq!(placement_desktop(Placement::OtherFrame, Some(1)), None);
        assert_eq!(placement_desktop(Placement::OtherFrame, None), None);
    }

    #[test]
    fn wm_class_prefers_class_over_instance() {
        assert_eq!(
            parse_wm_class(b"navigator\0Firefox\0"),
            Some("Firefox".to_string())
        );
    }

    #[test]
    fn wm_class_falls_back_to_instance() {
        assert_eq!(parse_wm_class(b"xterm\0"), Some("xterm".to_string()));
        assert_eq!(parse_wm_class(b""), None);
    }

    #[test]
    fn top_of_stack_has_rank_zero() {
        let ranks = focus_ranks(&[10, 20, 30]);

        assert_eq!(ranks[&30], 0);
        assert_eq!(ranks[&20], 1);
        assert_eq!(ranks[&10], 2);
    }

    #[test]
    fn untyped_windows_are_switchable() {
        assert!(is_switchable(&[], &[1, 2]));
        assert!(is_switchable(&[7, 2], &[1, 2]));
        assert!(!is_switchable(&[7], &[1, 2]));
    }
}
