//! winpick core library
//!
//! Contains the window snapshot, formatting, matching, selector session and
//! class switching logic, plus the port definitions (traits) the adapters
//! implement. This crate has no knowledge of X11, terminals or sockets.

pub mod config;
pub mod domain;
pub mod formatter;
pub mod matcher;
pub mod ports;
pub mod selector;
pub mod source;
pub mod switcher;
pub mod testing;

pub use config::{
    BrowserConfig, Config, ConfigError, DisplayConfig, LaunchConfig, NotificationUrgency,
    SourceConfig, StatusConfig, TitleWidth,
};
pub use domain::{
    DisplayRow, FilterQuery, Placement, SessionInfo, StatusLevel, StatusMessage, WindowEntry,
    WindowId,
};
pub use formatter::{CandidateFormatter, FormattedBatch};
pub use matcher::{CandidateMatcher, MatchResult, SkimCandidateMatcher};
pub use ports::{
    GuardError, LaunchError, LocalSessionGuard, ProcessLauncher, SessionGuard, SessionLease,
    StatusReporter, WindowManager, WindowManagerError,
};
pub use selector::{
    ActionId, ActionSet, CandidateSource, Effect, Keymap, Selection, SelectorSession,
    SessionError, SessionState, SourceError,
};
pub use source::{OrderingPolicy, WindowSource};
pub use switcher::{ClassSwitcher, SwitchError, SwitchOutcome, SwitchRequest};
