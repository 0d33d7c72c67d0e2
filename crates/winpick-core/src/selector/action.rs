use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::{Placement, WindowEntry, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionId {
    Switch,
    SwitchOtherWindow,
    SwitchOtherFrame,
    Kill,
    ToggleDetailMode,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action: {name}")]
pub struct UnknownActionError {
    pub name: String,
}

impl ActionId {
    pub const ALL: [ActionId; 5] = [
        ActionId::Switch,
        ActionId::SwitchOtherWindow,
        ActionId::SwitchOtherFrame,
        ActionId::Kill,
        ActionId::ToggleDetailMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Switch => "switch",
            ActionId::SwitchOtherWindow => "switch-other-window",
            ActionId::SwitchOtherFrame => "switch-other-frame",
            ActionId::Kill => "kill",
            ActionId::ToggleDetailMode => "toggle-detail-mode",
        }
    }
}

impl std::str::FromStr for ActionId {
    type Err = UnknownActionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .into_iter()
            .find(|action| action.as_str() == name.trim())
            .ok_or_else(|| UnknownActionError {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an action asks the session to do. Handlers stay pure; the session
/// executes effects against the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Focus { id: WindowId, placement: Placement },
    Close { ids: Vec<WindowId> },
    ToggleDetailMode,
    Nothing,
}

pub type ActionHandler = Box<dyn Fn(&[WindowEntry]) -> Effect>;

pub struct Action {
    handler: ActionHandler,
    /// Persistent actions keep the session open and refresh the list.
    pub persistent: bool,
}

impl Action {
    pub fn run(&self, selection: &[WindowEntry]) -> Effect {
        (self.handler)(selection)
    }
}

#[derive(Default)]
pub struct ActionSet {
    actions: BTreeMap<ActionId, Action>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        id: ActionId,
        persistent: bool,
        handler: impl Fn(&[WindowEntry]) -> Effect + 'static,
    ) -> Self {
        self.actions.insert(
            id,
            Action {
                handler: Box::new(handler),
                persistent,
            },
        );
        self
    }

    pub fn window_defaults() -> Self {
        Self::new()
            .register(ActionId::Switch, false, |selection| {
                focus_first(selection, Placement::Current)
            })
            .register(ActionId::SwitchOtherWindow, false, |selection| {
                focus_first(selection, Placement::OtherWindow)
            })
            .register(ActionId::SwitchOtherFrame, false, |selection| {
                focus_first(selection, Placement::OtherFrame)
            })
            .register(ActionId::Kill, true, |selection| Effect::Close {
                ids: selection.iter().map(|entry| entry.id).collect(),
            })
            .register(ActionId::ToggleDetailMode, true, |_| Effect::ToggleDetailMode)
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(&id)
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }
}

fn focus_first(selection: &[WindowEntry], placement: Placement) -> Effect {
    selection
        .first()
        .map(|entry| Effect::Focus {
            id: entry.id,
            placement,
        })
        .unwrap_or(Effect::Nothing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_roundtrip() {
        for action in ActionId::ALL {
            assert_eq!(action.as_str().parse::<ActionId>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_name_is_rejected() {
        let error = "explode".parse::<ActionId>().unwrap_err();

        assert_eq!(error.name, "explode");
    }

    #[test]
    fn switch_focuses_first_selected_window() {
        let actions = ActionSet::window_defaults();
        let selection = vec![WindowEntry::new(4, "a", "A"), WindowEntry::new(5, "b", "B")];

        let effect = actions.get(ActionId::SwitchOtherFrame).unwrap().run(&selection);

        assert_eq!(
            effect,
            Effect::Focus {
                id: WindowId(4),
                placement: Placement::OtherFrame
            }
        );
    }

    #[test]
    fn kill_closes_every_selected_window_and_is_persistent() {
        let actions = ActionSet::window_defaults();
        let selection = vec![WindowEntry::new(4, "a", "A"), WindowEntry::new(5, "b", "B")];

        let kill = actions.get(ActionId::Kill).unwrap();

        assert!(kill.persistent);
        assert_eq!(
            kill.run(&selection),
            Effect::Close {
                ids: vec![WindowId(4), WindowId(5)]
            }
        );
    }

    #[test]
    fn switch_with_empty_selection_does_nothing() {
        let actions = ActionSet::window_defaults();

        let effect = actions.get(ActionId::Switch).unwrap().run(&[]);

        assert_eq!(effect, Effect::Nothing);
    }
}
