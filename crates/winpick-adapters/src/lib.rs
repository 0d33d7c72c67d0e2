//! winpick adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! winpick-core: the X11 window manager, process launching, desktop
//! notifications and the cross-process session guard.

pub mod guard;
pub mod launcher;
#[cfg(target_os = "linux")]
pub mod notifier;
#[cfg(target_os = "linux")]
pub mod x11;

pub use guard::SocketSessionGuard;
pub use launcher::CommandLauncher;
#[cfg(target_os = "linux")]
pub use notifier::DesktopStatusReporter;
#[cfg(target_os = "linux")]
pub use x11::X11WindowManager;
