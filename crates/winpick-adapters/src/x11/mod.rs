mod properties;
mod window_manager;

pub use window_manager::X11WindowManager;
