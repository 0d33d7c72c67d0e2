mod action;
mod candidate;
mod keymap;
mod session;

pub use action::{Action, ActionId, ActionSet, Effect, UnknownActionError};
pub use candidate::{CandidateSource, CandidateSourceBuilder, SourceError};
pub use keymap::{ActionBinding, Keymap};
pub use session::{Selection, SelectorSession, SessionError, SessionState, VisibleRow};
