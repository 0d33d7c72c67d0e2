use serde::{Deserialize, Serialize};

/// Where a focused or launched window should end up relative to the user's
/// current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placement {
    #[default]
    Current,
    OtherWindow,
    OtherFrame,
}

impl Placement {
    pub fn for_other_window(other_window: bool) -> Self {
        if other_window {
            Placement::OtherWindow
        } else {
            Placement::Current
        }
    }
}
