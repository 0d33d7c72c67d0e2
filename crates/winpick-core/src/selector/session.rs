use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{DisplayRow, FilterQuery, SessionInfo, StatusMessage, WindowEntry, WindowId};
use crate::matcher::CandidateMatcher;
use crate::ports::{GuardError, SessionGuard, SessionLease, StatusReporter, WindowManagerError};

use super::action::{ActionId, Effect};
use super::candidate::CandidateSource;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a selector session is already active")]
    Conflict { active: Option<SessionInfo> },

    #[error("session was already opened")]
    AlreadyOpened,

    #[error("session is not open")]
    NotOpen,

    #[error("session guard failed: {message}")]
    Guard { message: String },

    #[error("failed to list windows: {0}")]
    Windows(#[from] WindowManagerError),
}

impl From<GuardError> for SessionError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Conflict { active } => SessionError::Conflict { active },
            GuardError::Unavailable { message } => SessionError::Guard { message },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Open,
    /// An action is being dispatched.
    Selecting,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(WindowEntry),
    Multi(Vec<WindowEntry>),
}

impl Selection {
    pub fn entries(&self) -> &[WindowEntry] {
        match self {
            Selection::Single(entry) => std::slice::from_ref(entry),
            Selection::Multi(entries) => entries,
        }
    }
}

/// A row as the frontend should draw it.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub row: &'a DisplayRow,
    pub positions: &'a [usize],
    pub selected: bool,
    pub marked: bool,
}

struct Candidate {
    index: usize,
    positions: Vec<usize>,
}

/// One interactive selection over a [`CandidateSource`].
///
/// Detail mode and the resolved title width live here and die with the
/// session.
pub struct SelectorSession {
    source: CandidateSource,
    matcher: Box<dyn CandidateMatcher>,
    guard: Arc<dyn SessionGuard>,
    reporter: Option<Arc<dyn StatusReporter>>,
    lease: Option<SessionLease>,
    state: SessionState,
    query: FilterQuery,
    detail_mode: bool,
    width: usize,
    snapshot: Vec<WindowEntry>,
    rows: Vec<DisplayRow>,
    candidates: Vec<Candidate>,
    cursor: usize,
    marked: BTreeSet<WindowId>,
    status: Option<StatusMessage>,
}

impl SelectorSession {
    pub fn new(
        source: CandidateSource,
        matcher: Box<dyn CandidateMatcher>,
        guard: Arc<dyn SessionGuard>,
    ) -> Self {
        let detail_mode = source.detail_mode();
        Self {
            source,
            matcher,
            guard,
            reporter: None,
            lease: None,
            state: SessionState::Idle,
            query: FilterQuery::default(),
            detail_mode,
            width: 0,
            snapshot: Vec::new(),
            rows: Vec::new(),
            candidates: Vec::new(),
            cursor: 0,
            marked: BTreeSet::new(),
            status: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn open(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyOpened);
        }

        let info = SessionInfo::new(self.source.scope().map(str::to_string));
        let lease = self.guard.try_acquire(info)?;

        if let Err(error) = self.refresh() {
            drop(lease);
            return Err(error);
        }

        self.lease = Some(lease);
        self.state = SessionState::Open;
        info!(source = self.source.name(), windows = self.snapshot.len(), "selector session opened");
        Ok(())
    }

    /// Takes a new snapshot and re-formats it with the source's width policy.
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        let keep = self.selected().map(|entry| entry.id);

        self.snapshot = self.source.candidates()?;
        let batch = self
            .source
            .formatter()
            .format(&self.snapshot, self.source.width(), self.detail_mode);
        self.rows = batch.rows;
        self.width = batch.width;

        let present: BTreeSet<WindowId> = self.snapshot.iter().map(|entry| entry.id).collect();
        self.marked.retain(|id| present.contains(id));

        self.refilter(keep);
        Ok(())
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, SessionState::Open | SessionState::Selecting) {
            debug!("selector session cancelled");
            self.state = SessionState::Cancelled;
            self.lease = None;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn detail_mode(&self) -> bool {
        self.detail_mode
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Drops the last status. Query edits and navigation call this so the
    /// footer goes back to the key hints.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn snapshot(&self) -> &[WindowEntry] {
        &self.snapshot
    }

    pub fn match_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.clear_status();
        self.query.text = text.into();
        self.requery();
    }

    pub fn push_query_char(&mut self, character: char) {
        self.clear_status();
        self.query.text.push(character);
        self.requery();
    }

    pub fn pop_query_char(&mut self) {
        self.clear_status();
        if self.query.text.pop().is_some() {
            self.requery();
        }
    }

    pub fn toggle_fuzzy(&mut self) {
        self.clear_status();
        self.query.fuzzy = !self.query.fuzzy;
        self.requery();
    }

    pub fn select_next(&mut self) {
        self.clear_status();
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.clear_status();
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.clear_status();
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.clear_status();
        self.cursor = self.candidates.len().saturating_sub(1);
    }

    /// Marks or unmarks the selected row and moves to the next one.
    pub fn toggle_mark(&mut self) {
        self.clear_status();
        let Some(id) = self.selected().map(|entry| entry.id) else {
            return;
        };
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
        self.select_next();
    }

    pub fn mark_all(&mut self) {
        self.clear_status();
        let visible: Vec<WindowId> = self
            .candidates
            .iter()
            .map(|candidate| self.snapshot[candidate.index].id)
            .collect();
        self.marked.extend(visible);
    }

    pub fn unmark_all(&mut self) {
        self.marked.clear();
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Flips the class column while keeping the width the rows were last
    /// laid out at, so the columns do not jump.
    pub fn toggle_detail_mode(&mut self) {
        let keep = self.selected().map(|entry| entry.id);

        self.detail_mode = !self.detail_mode;
        self.rows = self
            .source
            .formatter()
            .format_with_width(&self.snapshot, self.width, self.detail_mode);
        self.refilter(keep);

        debug!(detail_mode = self.detail_mode, "detail mode toggled");
    }

    pub fn selected(&self) -> Option<&WindowEntry> {
        self.candidates
            .get(self.cursor)
            .map(|candidate| &self.snapshot[candidate.index])
    }

    /// Marked windows in list order, or the selected window.
    pub fn selection(&self) -> Option<Selection> {
        if !self.marked.is_empty() {
            let entries: Vec<WindowEntry> = self
                .snapshot
                .iter()
                .filter(|entry| self.marked.contains(&entry.id))
                .cloned()
                .collect();
            return Some(Selection::Multi(entries));
        }

        self.selected().cloned().map(Selection::Single)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = VisibleRow<'_>> {
        self.candidates
            .iter()
            .enumerate()
            .map(move |(position, candidate)| {
                let row = &self.rows[candidate.index];
                VisibleRow {
                    row,
                    positions: &candidate.positions,
                    selected: position == self.cursor,
                    marked: self.marked.contains(&row.source_id),
                }
            })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Runs the action bound to `key`. Returns `false` for unbound keys.
    pub fn dispatch_key(&mut self, key: &str) -> Result<bool, SessionError> {
        match self.source.keymap().action_for(key) {
            Some(action) => {
                self.dispatch(action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn dispatch(&mut self, action_id: ActionId) -> Result<(), SessionError> {
        if self.state != SessionState::Open {
            return Err(SessionError::NotOpen);
        }

        let Some(selection) = self.selection() else {
            self.set_status(StatusMessage::warning("No window selected"));
            return Ok(());
        };

        let (effect, persistent) = match self.source.actions().get(action_id) {
            Some(action) => (action.run(selection.entries()), action.persistent),
            None => {
                warn!(action = %action_id, "action has no handler");
                return Ok(());
            }
        };

        debug!(action = %action_id, ?effect, "dispatching action");
        self.state = SessionState::Selecting;

        let touches_windows = matches!(effect, Effect::Focus { .. } | Effect::Close { .. });
        let succeeded = self.execute(effect);

        if persistent || !succeeded {
            self.state = SessionState::Open;
            if !touches_windows {
                return Ok(());
            }
            if let Err(error) = self.refresh() {
                warn!(%error, "failed to refresh window list after action");
                self.set_status(StatusMessage::warning(format!(
                    "Could not refresh windows: {}",
                    error
                )));
            }
        } else {
            self.state = SessionState::Completed;
            self.lease = None;
            info!(action = %action_id, "selector session completed");
        }

        Ok(())
    }

    fn execute(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::Focus { id, placement } => {
                match self.source.windows().manager().focus(id, placement) {
                    Ok(()) => true,
                    Err(WindowManagerError::WindowGone { id }) => {
                        self.set_status(StatusMessage::warning(format!(
                            "Window {} no longer exists",
                            id
                        )));
                        false
                    }
                    Err(error) => {
                        warn!(%error, window = %id, "focus failed");
                        self.set_status(StatusMessage::warning(format!(
                            "Could not focus window: {}",
                            error
                        )));
                        false
                    }
                }
            }
            Effect::Close { ids } => {
                let requested = ids.len();
                match self.source.windows().manager().close(&ids) {
                    Ok(closed) => {
                        self.set_status(kill_status(closed, requested));
                        self.unmark_all();
                        true
                    }
                    Err(error) => {
                        warn!(%error, requested, "close failed");
                        self.set_status(StatusMessage::warning(format!(
                            "Could not kill windows: {}",
                            error
                        )));
                        false
                    }
                }
            }
            Effect::ToggleDetailMode => {
                self.toggle_detail_mode();
                true
            }
            Effect::Nothing => true,
        }
    }

    fn set_status(&mut self, message: StatusMessage) {
        if let Some(reporter) = &self.reporter {
            reporter.report(&message);
        }
        self.status = Some(message);
    }

    fn requery(&mut self) {
        let keep = self.selected().map(|entry| entry.id);
        self.refilter(keep);
    }

    fn refilter(&mut self, keep: Option<WindowId>) {
        let texts: Vec<String> = self.rows.iter().map(DisplayRow::text).collect();

        self.candidates = self
            .matcher
            .rank(&self.query, &texts)
            .into_iter()
            .map(|(index, result)| Candidate {
                index,
                positions: result.positions,
            })
            .collect();

        self.cursor = keep
            .and_then(|id| {
                self.candidates
                    .iter()
                    .position(|candidate| self.snapshot[candidate.index].id == id)
            })
            .unwrap_or(0);
    }
}

/// Status for a kill that asked for `requested` windows and closed `closed`.
/// Fewer closed than requested means the snapshot was stale.
fn kill_status(closed: usize, requested: usize) -> StatusMessage {
    let plural = |count: usize| if count == 1 { "window" } else { "windows" };

    if closed == requested {
        StatusMessage::info(format!("Killed {} {}", closed, plural(closed)))
    } else if closed == 0 {
        StatusMessage::warning(format!(
            "Killed 0 of {} {}: already gone",
            requested,
            plural(requested)
        ))
    } else {
        StatusMessage::warning(format!(
            "Killed {} of {} {} ({} already gone)",
            closed,
            requested,
            plural(requested),
            requested - closed
        ))
    }
}
