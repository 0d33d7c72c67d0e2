use std::sync::Arc;

use anyhow::Result;
use winpick_adapters::{CommandLauncher, SocketSessionGuard};
use winpick_core::{
    CandidateSource, ClassSwitcher, Config, ProcessLauncher, SelectorSession, SessionGuard,
    SkimCandidateMatcher, StatusReporter, WindowManager, WindowSource,
};

use crate::reporter;

/// Adapters shared by the commands.
#[derive(Clone)]
pub struct Services {
    pub windows: Arc<dyn WindowManager>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub guard: Arc<dyn SessionGuard>,
    pub reporter: Arc<dyn StatusReporter>,
    /// Used while the picker owns the terminal.
    pub picker_reporter: Arc<dyn StatusReporter>,
}

impl Services {
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self {
            windows: connect_window_manager()?,
            launcher: Arc::new(CommandLauncher::new()),
            guard: Arc::new(SocketSessionGuard::new()),
            reporter: reporter::from_config(&config.status),
            picker_reporter: Arc::new(reporter::for_picker(&config.status)),
        })
    }

    pub fn window_source(&self, config: &Config) -> WindowSource {
        WindowSource::from_config(Arc::clone(&self.windows), &config.source)
    }

    pub fn switcher(&self, config: &Config) -> ClassSwitcher {
        ClassSwitcher::new(
            self.window_source(config),
            Arc::clone(&self.launcher),
            Arc::clone(&self.guard),
        )
        .with_launch_config(config.launch.clone())
        .with_reporter(Arc::clone(&self.reporter))
    }

    pub fn selector(&self, source: CandidateSource) -> SelectorSession {
        SelectorSession::new(
            source,
            Box::new(SkimCandidateMatcher::new()),
            Arc::clone(&self.guard),
        )
        .with_reporter(Arc::clone(&self.picker_reporter))
    }
}

#[cfg(target_os = "linux")]
fn connect_window_manager() -> Result<Arc<dyn WindowManager>> {
    use anyhow::Context;

    let manager = winpick_adapters::X11WindowManager::new()
        .context("cannot connect to the X11 display")?;
    Ok(Arc::new(manager))
}

#[cfg(not(target_os = "linux"))]
fn connect_window_manager() -> Result<Arc<dyn WindowManager>> {
    anyhow::bail!("winpick needs an X11 window manager, which is only supported on Linux")
}
