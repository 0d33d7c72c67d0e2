use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::SourceConfig;
use crate::domain::WindowEntry;
use crate::ports::{WindowManager, WindowManagerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingPolicy {
    /// Move the focused window to the end so repeated invocations cycle
    /// through the other windows first.
    pub current_last: bool,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self { current_last: true }
    }
}

#[derive(Clone)]
pub struct WindowSource {
    manager: Arc<dyn WindowManager>,
    policy: OrderingPolicy,
    excluded_classes: Vec<String>,
}

impl WindowSource {
    pub fn new(manager: Arc<dyn WindowManager>) -> Self {
        Self {
            manager,
            policy: OrderingPolicy::default(),
            excluded_classes: Vec::new(),
        }
    }

    pub fn from_config(manager: Arc<dyn WindowManager>, config: &SourceConfig) -> Self {
        let mut excluded_classes: Vec<String> = config
            .exclude_classes
            .iter()
            .map(|class| class.to_lowercase())
            .collect();
        excluded_classes.sort();

        Self {
            manager,
            policy: OrderingPolicy {
                current_last: config.current_last,
            },
            excluded_classes,
        }
    }

    pub fn with_policy(mut self, policy: OrderingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn manager(&self) -> &Arc<dyn WindowManager> {
        &self.manager
    }

    pub fn list(
        &self,
        filter: Option<&dyn Fn(&WindowEntry) -> bool>,
    ) -> Result<Vec<WindowEntry>, WindowManagerError> {
        let snapshot = self.manager.enumerate()?;
        let total = snapshot.len();

        let mut entries: Vec<WindowEntry> = snapshot
            .into_iter()
            .filter(|entry| !self.is_excluded(entry))
            .filter(|entry| filter.map_or(true, |predicate| predicate(entry)))
            .collect();

        if self.policy.current_last {
            move_current_last(&mut entries);
        }

        debug!(total, listed = entries.len(), "window snapshot taken");
        Ok(entries)
    }

    pub fn list_class(&self, class_name: &str) -> Result<Vec<WindowEntry>, WindowManagerError> {
        self.list(Some(&|entry: &WindowEntry| entry.has_class(class_name)))
    }

    /// Windows of one class, ignoring `exclude_classes`. Exclusion only
    /// hides windows from the picker; focusing a class must still find them.
    pub fn list_class_unfiltered(
        &self,
        class_name: &str,
    ) -> Result<Vec<WindowEntry>, WindowManagerError> {
        let mut entries: Vec<WindowEntry> = self
            .manager
            .enumerate()?
            .into_iter()
            .filter(|entry| entry.has_class(class_name))
            .collect();

        if self.policy.current_last {
            move_current_last(&mut entries);
        }

        debug!(class = class_name, listed = entries.len(), "class snapshot taken");
        Ok(entries)
    }

    fn is_excluded(&self, entry: &WindowEntry) -> bool {
        let excluded = self
            .excluded_classes
            .binary_search(&entry.class_name.to_lowercase())
            .is_ok();
        if excluded {
            trace!(window = %entry.id, class = %entry.class_name, "window class excluded");
        }
        excluded
    }
}

/// Moves the current entry to the end when there is more than one entry.
pub fn move_current_last(entries: &mut Vec<WindowEntry>) {
    if entries.len() < 2 {
        return;
    }

    if let Some(position) = entries.iter().position(|entry| entry.is_current) {
        let current = entries.remove(position);
        entries.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubWindowManager;
    use std::collections::HashSet;

    fn ids(entries: &[WindowEntry]) -> Vec<u32> {
        entries.iter().map(|entry| entry.id.0).collect()
    }

    #[test]
    fn current_window_is_moved_last() {
        let manager = StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "mail", "Thunderbird"),
            WindowEntry::new(2, "web", "Firefox").current(),
            WindowEntry::new(3, "shell", "Alacritty"),
        ]);
        let source = WindowSource::new(Arc::new(manager));

        let entries = source.list(None).unwrap();

        assert_eq!(ids(&entries), vec![1, 3, 2]);
        assert!(entries.last().unwrap().is_current);
    }

    #[test]
    fn single_entry_is_not_reordered() {
        let mut entries = vec![WindowEntry::new(9, "only", "Xterm").current()];

        move_current_last(&mut entries);

        assert_eq!(ids(&entries), vec![9]);
    }

    #[test]
    fn natural_order_is_kept_without_current_window() {
        let mut entries = vec![
            WindowEntry::new(3, "c", "C"),
            WindowEntry::new(1, "a", "A"),
            WindowEntry::new(2, "b", "B"),
        ];

        move_current_last(&mut entries);

        assert_eq!(ids(&entries), vec![3, 1, 2]);
    }

    #[test]
    fn policy_can_disable_reordering() {
        let manager = StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "web", "Firefox").current(),
            WindowEntry::new(2, "shell", "Alacritty"),
        ]);
        let source = WindowSource::new(Arc::new(manager))
            .with_policy(OrderingPolicy { current_last: false });

        let entries = source.list(None).unwrap();

        assert_eq!(ids(&entries), vec![1, 2]);
    }

    #[test]
    fn filter_is_applied_before_reordering() {
        let manager = StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "web one", "Firefox").current(),
            WindowEntry::new(2, "shell", "Alacritty"),
            WindowEntry::new(3, "web two", "firefox"),
        ]);
        let source = WindowSource::new(Arc::new(manager));

        let entries = source.list_class("FIREFOX").unwrap();

        assert_eq!(ids(&entries), vec![3, 1]);
    }

    #[test]
    fn excluded_classes_are_dropped() {
        let manager = StubWindowManager::with_windows(vec![
            WindowEntry::new(1, "bar", "Polybar"),
            WindowEntry::new(2, "shell", "Alacritty"),
        ]);
        let config = SourceConfig {
            current_last: true,
            exclude_classes: HashSet::from(["polybar".to_string()]),
        };
        let source = WindowSource::from_config(Arc::new(manager), &config);

        let entries = source.list(None).unwrap();

        assert_eq!(ids(&entries), vec![2]);
        assert_eq!(ids(&source.list_class_unfiltered("polybar").unwrap()), vec![1]);
    }

    #[test]
    fn enumeration_errors_are_propagated() {
        let manager = StubWindowManager::unavailable();
        let source = WindowSource::new(Arc::new(manager));

        let result = source.list(None);

        assert!(matches!(result, Err(WindowManagerError::Unavailable { .. })));
    }
}
