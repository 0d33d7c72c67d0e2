use thiserror::Error;

use crate::domain::{Placement, WindowEntry, WindowId};

#[derive(Error, Debug)]
pub enum WindowManagerError {
    #[error("window manager unavailable: {message}")]
    Unavailable { message: String },

    #[error("window {id} no longer exists")]
    WindowGone { id: WindowId },

    #[error("window manager request failed: {message}")]
    Request { message: String },
}

pub trait WindowManager: Send + Sync {
    /// Point-in-time snapshot of the managed windows in natural order.
    fn enumerate(&self) -> Result<Vec<WindowEntry>, WindowManagerError>;

    fn focus(&self, id: WindowId, placement: Placement) -> Result<(), WindowManagerError>;

    /// Closes the windows that still exist and returns how many were closed.
    fn close(&self, ids: &[WindowId]) -> Result<usize, WindowManagerError>;

    /// Prepares the region a new window should appear in.
    fn prepare_placement(&self, _placement: Placement) -> Result<(), WindowManagerError> {
        Ok(())
    }
}
