use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LaunchConfig;
use crate::domain::{Placement, StatusMessage, WindowId};
use crate::ports::{ProcessLauncher, SessionGuard, StatusReporter, WindowManagerError};
use crate::source::WindowSource;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("class name must not be empty")]
    EmptyClass,

    #[error("failed to list windows: {0}")]
    Windows(#[from] WindowManagerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRequest {
    pub class_name: String,
    pub program: Option<String>,
    pub other_window: bool,
}

impl SwitchRequest {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            program: None,
            other_window: false,
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn other_window(mut self, other_window: bool) -> Self {
        self.other_window = other_window;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// A selector session is active elsewhere; nothing was done.
    Skipped,
    /// The focused window already has the class: the caller should open a
    /// selector scoped to it.
    OpenScopedSelector { class_name: String },
    Focused { id: WindowId, placement: Placement },
    /// The window disappeared between listing and focusing.
    Stale { id: WindowId },
    Launched { program: String },
    LaunchFailed { program: String },
}

/// Focuses a window of a class, or launches the program for it.
pub struct ClassSwitcher {
    windows: WindowSource,
    launcher: Arc<dyn ProcessLauncher>,
    guard: Arc<dyn SessionGuard>,
    reporter: Option<Arc<dyn StatusReporter>>,
    launch: LaunchConfig,
}

impl ClassSwitcher {
    pub fn new(
        windows: WindowSource,
        launcher: Arc<dyn ProcessLauncher>,
        guard: Arc<dyn SessionGuard>,
    ) -> Self {
        Self {
            windows,
            launcher,
            guard,
            reporter: None,
            launch: LaunchConfig::default(),
        }
    }

    pub fn with_launch_config(mut self, launch: LaunchConfig) -> Self {
        self.launch = launch;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn switch_to_class(&self, request: &SwitchRequest) -> Result<SwitchOutcome, SwitchError> {
        let class_name = request.class_name.trim();
        if class_name.is_empty() {
            return Err(SwitchError::EmptyClass);
        }

        if self.guard.is_active() {
            debug!(class = class_name, "selector session active, switch skipped");
            return Ok(SwitchOutcome::Skipped);
        }

        let windows = self.windows.list_class_unfiltered(class_name)?;

        if windows.iter().any(|entry| entry.is_current) {
            debug!(class = class_name, count = windows.len(), "already on class, opening scoped selector");
            return Ok(SwitchOutcome::OpenScopedSelector {
                class_name: class_name.to_string(),
            });
        }

        let placement = Placement::for_other_window(request.other_window);

        if let Some(target) = windows.iter().min_by_key(|entry| entry.last_focus_rank) {
            return Ok(self.focus(target.id, placement));
        }

        let program = request
            .program
            .clone()
            .unwrap_or_else(|| self.launch.program_for(class_name));
        Ok(self.launch(program, placement))
    }

    fn focus(&self, id: WindowId, placement: Placement) -> SwitchOutcome {
        match self.windows.manager().focus(id, placement) {
            Ok(()) => {
                info!(window = %id, ?placement, "focused window");
                SwitchOutcome::Focused { id, placement }
            }
            Err(error) => {
                warn!(%error, window = %id, "focus failed");
                self.report(StatusMessage::warning(format!(
                    "Could not focus window {}: {}",
                    id, error
                )));
                SwitchOutcome::Stale { id }
            }
        }
    }

    fn launch(&self, program: String, placement: Placement) -> SwitchOutcome {
        if placement != Placement::Current {
            if let Err(error) = self.windows.manager().prepare_placement(placement) {
                warn!(%error, ?placement, "failed to prepare placement, launching in place");
            }
        }

        match self.launcher.spawn(&program) {
            Ok(()) => {
                info!(%program, "launched program");
                SwitchOutcome::Launched { program }
            }
            Err(error) => {
                warn!(%error, %program, "launch failed");
                self.report(StatusMessage::warning(format!("Could not launch {}: {}", program, error)));
                SwitchOutcome::LaunchFailed { program }
            }
        }
    }

    fn report(&self, message: StatusMessage) {
        if let Some(reporter) = &self.reporter {
            reporter.report(&message);
        }
    }
}
