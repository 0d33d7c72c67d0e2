mod display_row;
mod placement;
mod query;
mod session_info;
mod status;
mod window;

pub use display_row::DisplayRow;
pub use placement::Placement;
pub use query::FilterQuery;
pub use session_info::SessionInfo;
pub use status::{StatusLevel, StatusMessage};
pub use window::{WindowEntry, WindowId};
