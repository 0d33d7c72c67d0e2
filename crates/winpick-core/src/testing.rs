//! In-memory implementations of the ports, shared by the unit tests of
//! every winpick crate.

use std::sync::Mutex;

use crate::domain::{Placement, StatusMessage, WindowEntry, WindowId};
use crate::ports::{
    LaunchError, ProcessLauncher, StatusReporter, WindowManager, WindowManagerError,
};

/// In-memory window manager. Focus and close requests mutate the stored
/// windows so follow-up enumerations observe them.
#[derive(Default)]
pub struct StubWindowManager {
    windows: Mutex<Vec<WindowEntry>>,
    unavailable: bool,
    focused: Mutex<Vec<(WindowId, Placement)>>,
    prepared: Mutex<Vec<Placement>>,
    closed: Mutex<Vec<WindowId>>,
}

impl StubWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows(windows: Vec<WindowEntry>) -> Self {
        let stub = Self::new();
        stub.given_windows(windows);
        stub
    }

    /// Every enumeration fails as if no display were reachable.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn given_windows(&self, windows: Vec<WindowEntry>) {
        *self.windows.lock().unwrap() = windows;
    }

    /// Simulates a window closed by someone else.
    pub fn remove_window(&self, id: WindowId) {
        self.windows.lock().unwrap().retain(|entry| entry.id != id);
    }

    pub fn window_ids(&self) -> Vec<u32> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.id.0)
            .collect()
    }

    pub fn focused(&self) -> Vec<(WindowId, Placement)> {
        self.focused.lock().unwrap().clone()
    }

    pub fn focused_ids(&self) -> Vec<(u32, Placement)> {
        self.focused()
            .into_iter()
            .map(|(id, placement)| (id.0, placement))
            .collect()
    }

    pub fn prepared(&self) -> Vec<Placement> {
        self.prepared.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<WindowId> {
        self.closed.lock().unwrap().clone()
    }
}

impl WindowManager for StubWindowManager {
    fn enumerate(&self) -> Result<Vec<WindowEntry>, WindowManagerError> {
        if self.unavailable {
            return Err(WindowManagerError::Unavailable {
                message: "no display".to_string(),
            });
        }
        Ok(self.windows.lock().unwrap().clone())
    }

    fn focus(&self, id: WindowId, placement: Placement) -> Result<(), WindowManagerError> {
        let mut windows = self.windows.lock().unwrap();
        if !windows.iter().any(|entry| entry.id == id) {
            return Err(WindowManagerError::WindowGone { id });
        }

        for (rank, entry) in windows.iter_mut().enumerate() {
            entry.is_current = entry.id == id;
            entry.last_focus_rank = if entry.id == id { 0 } else { rank as u32 + 1 };
        }

        self.focused.lock().unwrap().push((id, placement));
        Ok(())
    }

    fn close(&self, ids: &[WindowId]) -> Result<usize, WindowManagerError> {
        let mut windows = self.windows.lock().unwrap();
        let mut closed = self.closed.lock().unwrap();
        let before = windows.len();

        windows.retain(|entry| {
            let closing = ids.contains(&entry.id);
            if closing {
                closed.push(entry.id);
            }
            !closing
        });

        Ok(before - windows.len())
    }

    fn prepare_placement(&self, placement: Placement) -> Result<(), WindowManagerError> {
        self.prepared.lock().unwrap().push(placement);
        Ok(())
    }
}

/// Records command lines instead of spawning them.
#[derive(Default)]
pub struct StubLauncher {
    spawned: Mutex<Vec<String>>,
    missing: bool,
}

impl StubLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every launch fails with [`LaunchError::NotFound`].
    pub fn missing_programs() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }
}

impl ProcessLauncher for StubLauncher {
    fn spawn(&self, program: &str) -> Result<(), LaunchError> {
        if program.trim().is_empty() {
            return Err(LaunchError::EmptyCommand);
        }

        if self.missing {
            return Err(LaunchError::NotFound {
                program: program.to_string(),
            });
        }

        self.spawned.lock().unwrap().push(program.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<StatusMessage>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, message: &StatusMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}
