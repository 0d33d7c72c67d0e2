mod process_launcher;
mod session_guard;
mod status_reporter;
mod window_manager;

pub use process_launcher::{LaunchError, ProcessLauncher};
pub use session_guard::{GuardError, LocalSessionGuard, SessionGuard, SessionLease};
pub use status_reporter::StatusReporter;
pub use window_manager::{WindowManager, WindowManagerError};
