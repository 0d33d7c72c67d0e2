use std::collections::{BTreeMap, HashMap};

use super::action::{ActionId, UnknownActionError};

/// A key chord in `C-`/`M-`/`S-` prefix notation, e.g. `enter`, `C-o`, `M-D`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub key: String,
    pub action: ActionId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<String, ActionId>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings every source inherits.
    pub fn base() -> Self {
        Self::new().with("enter", ActionId::Switch)
    }

    /// Base bindings plus the window specific ones.
    pub fn window_defaults() -> Self {
        Self::base().overlay(
            Self::new()
                .with("C-o", ActionId::SwitchOtherWindow)
                .with("C-f", ActionId::SwitchOtherFrame)
                .with("M-D", ActionId::Kill)
                .with("C-t", ActionId::ToggleDetailMode),
        )
    }

    pub fn with(mut self, key: &str, action: ActionId) -> Self {
        self.bind(key, action);
        self
    }

    pub fn bind(&mut self, key: &str, action: ActionId) {
        self.bindings.insert(key.trim().to_string(), action);
    }

    /// Adds `other`'s bindings, replacing ours on conflicting keys.
    pub fn overlay(mut self, other: Keymap) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Layers `key = "action-name"` entries from the configuration.
    pub fn apply_names(&mut self, entries: &HashMap<String, String>) -> Result<(), UnknownActionError> {
        for (key, name) in entries {
            let action = name.parse::<ActionId>()?;
            self.bind(key, action);
        }
        Ok(())
    }

    pub fn action_for(&self, key: &str) -> Option<ActionId> {
        self.bindings.get(key).copied()
    }

    pub fn bindings(&self) -> Vec<ActionBinding> {
        self.bindings
            .iter()
            .map(|(key, action)| ActionBinding {
                key: key.clone(),
                action: *action,
            })
            .collect()
    }

    pub fn keys_for(&self, action: ActionId) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_extend_base_bindings() {
        let keymap = Keymap::window_defaults();

        assert_eq!(keymap.action_for("enter"), Some(ActionId::Switch));
        assert_eq!(keymap.action_for("C-o"), Some(ActionId::SwitchOtherWindow));
        assert_eq!(keymap.action_for("C-f"), Some(ActionId::SwitchOtherFrame));
        assert_eq!(keymap.action_for("M-D"), Some(ActionId::Kill));
        assert_eq!(keymap.action_for("C-t"), Some(ActionId::ToggleDetailMode));
        assert_eq!(keymap.action_for("x"), None);
    }

    #[test]
    fn configured_names_override_defaults() {
        let mut keymap = Keymap::window_defaults();
        let entries = HashMap::from([
            ("C-k".to_string(), "kill".to_string()),
            ("C-o".to_string(), "switch-other-frame".to_string()),
        ]);

        keymap.apply_names(&entries).unwrap();

        assert_eq!(keymap.action_for("C-k"), Some(ActionId::Kill));
        assert_eq!(keymap.action_for("C-o"), Some(ActionId::SwitchOtherFrame));
        assert_eq!(keymap.action_for("M-D"), Some(ActionId::Kill));
    }

    #[test]
    fn unknown_configured_action_is_an_error() {
        let mut keymap = Keymap::base();
        let entries = HashMap::from([("C-x".to_string(), "launch-rockets".to_string())]);

        let result = keymap.apply_names(&entries);

        assert!(result.is_err());
    }

    #[test]
    fn keys_for_lists_every_binding_of_an_action() {
        let keymap = Keymap::window_defaults().with("C-k", ActionId::Kill);

        assert_eq!(keymap.keys_for(ActionId::Kill), vec!["C-k", "M-D"]);
    }
}
