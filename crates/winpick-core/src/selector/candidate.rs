use thiserror::Error;

use crate::config::{Config, TitleWidth};
use crate::domain::WindowEntry;
use crate::formatter::CandidateFormatter;
use crate::ports::WindowManagerError;
use crate::source::WindowSource;

use super::action::{ActionId, ActionSet, UnknownActionError};
use super::keymap::Keymap;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("key {key} is bound to {action}, which has no handler")]
    UnboundAction { key: String, action: ActionId },

    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),
}

/// Candidates, formatter, actions and keymap of one selector source.
pub struct CandidateSource {
    name: String,
    windows: WindowSource,
    formatter: CandidateFormatter,
    width: TitleWidth,
    detail_mode: bool,
    scope: Option<String>,
    actions: ActionSet,
    keymap: Keymap,
}

impl CandidateSource {
    pub fn builder(windows: WindowSource) -> CandidateSourceBuilder {
        CandidateSourceBuilder::new(windows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn windows(&self) -> &WindowSource {
        &self.windows
    }

    pub fn formatter(&self) -> &CandidateFormatter {
        &self.formatter
    }

    pub fn width(&self) -> TitleWidth {
        self.width
    }

    pub fn detail_mode(&self) -> bool {
        self.detail_mode
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn candidates(&self) -> Result<Vec<WindowEntry>, WindowManagerError> {
        match &self.scope {
            Some(class_name) => self.windows.list_class(class_name),
            None => self.windows.list(None),
        }
    }
}

pub struct CandidateSourceBuilder {
    name: String,
    windows: WindowSource,
    formatter: CandidateFormatter,
    width: TitleWidth,
    detail_mode: bool,
    scope: Option<String>,
    actions: ActionSet,
    keymap: Keymap,
}

impl CandidateSourceBuilder {
    pub fn new(windows: WindowSource) -> Self {
        Self {
            name: "Windows".to_string(),
            windows,
            formatter: CandidateFormatter::default(),
            width: TitleWidth::default(),
            detail_mode: true,
            scope: None,
            actions: ActionSet::window_defaults(),
            keymap: Keymap::window_defaults(),
        }
    }

    /// Display settings and keymap overrides from the configuration.
    pub fn configured(mut self, config: &Config) -> Result<Self, SourceError> {
        self.formatter = CandidateFormatter::from_config(&config.display);
        self.width = config.display.title_width;
        self.detail_mode = config.display.detail_mode;
        self.keymap.apply_names(&config.keymap)?;
        Ok(self)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn formatter(mut self, formatter: CandidateFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn width(mut self, width: TitleWidth) -> Self {
        self.width = width;
        self
    }

    pub fn detail_mode(mut self, detail_mode: bool) -> Self {
        self.detail_mode = detail_mode;
        self
    }

    /// Restricts candidates to one window class. Scoped sources show a
    /// single class, so the class column is turned off.
    pub fn scope(mut self, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        self.name = class_name.clone();
        self.scope = Some(class_name);
        self.detail_mode = false;
        self
    }

    pub fn actions(mut self, actions: ActionSet) -> Self {
        self.actions = actions;
        self
    }

    pub fn keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn build(self) -> Result<CandidateSource, SourceError> {
        if let Some(binding) = self
            .keymap
            .bindings()
            .into_iter()
            .find(|binding| !self.actions.contains(binding.action))
        {
            return Err(SourceError::UnboundAction {
                key: binding.key,
                action: binding.action,
            });
        }

        Ok(CandidateSource {
            name: self.name,
            windows: self.windows,
            formatter: self.formatter,
            width: self.width,
            detail_mode: self.detail_mode,
            scope: self.scope,
            actions: self.actions,
            keymap: self.keymap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubWindowManager;
    use crate::selector::Effect;
    use std::sync::Arc;

    fn windows() -> WindowSource {
        WindowSource::new(Arc::new(StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "web", "Firefox"),
            WindowEntry::new(2, "shell", "Alacritty"),
        ])))
    }

    #[test]
    fn default_source_builds() {
        let source = CandidateSource::builder(windows()).build().unwrap();

        assert_eq!(source.name(), "Windows");
        assert!(source.detail_mode());
        assert_eq!(source.candidates().unwrap().len(), 2);
    }

    #[test]
    fn keymap_without_handler_is_rejected_at_build_time() {
        let actions = ActionSet::new().register(ActionId::Switch, false, |_| Effect::Nothing);

        let result = CandidateSource::builder(windows())
            .actions(actions)
            .keymap(Keymap::window_defaults())
            .build();

        assert!(matches!(result, Err(SourceError::UnboundAction { .. })));
    }

    #[test]
    fn scoped_source_lists_one_class_without_detail() {
        let source = CandidateSource::builder(windows())
            .scope("firefox")
            .build()
            .unwrap();

        let candidates = source.candidates().unwrap();

        assert!(!source.detail_mode());
        assert_eq!(source.scope(), Some("firefox"));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].class_name, "Firefox");
    }

    #[test]
    fn configured_keymap_with_unknown_action_fails() {
        let mut config = Config::default();
        config
            .keymap
            .insert("C-x".to_string(), "self-destruct".to_string());

        let result = CandidateSource::builder(windows()).configured(&config);

        assert!(matches!(result, Err(SourceError::UnknownAction(_))));
    }
}
