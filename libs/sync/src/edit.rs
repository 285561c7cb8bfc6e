//! Edit guards: the arbitration between poll responses and user input.
//!
//! Each editable limit carries a tagged phase. While a field is being edited
//! or committed, incoming snapshots must not touch its displayed value; when
//! the edit finishes, exactly one commit request is produced and the server's
//! acknowledged value becomes authoritative again.
//!
//! ```text
//! Clean --focus gain--> Editing --focus loss--> Committing --response--> Clean
//! ```

use schedmon_types::{LimitKind, Scheduler};
use thiserror::Error;

/// Errors raised by guard transitions. All of these are resolved locally and
/// never reach the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// A commit for this field is still in flight; input stays disabled until
    /// the response resolves.
    #[error("{0} has an update in flight")]
    CommitInFlight(LimitKind),

    /// Focus was lost with nothing typed.
    #[error("no value entered for {0}")]
    EmptyValue(LimitKind),

    /// The pending text is not a base-10 number in range.
    #[error("'{value}' is not a valid value for {kind}")]
    InvalidNumber {
        kind: LimitKind,
        value: String,
    },

    /// The transition is not legal from the current phase.
    #[error("{0} is not being edited")]
    NotEditing(LimitKind),
}

/// Where a field is in its edit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPhase {
    /// Poll-synced; snapshots may update the displayed value.
    Clean,
    /// The user holds the field; `pending` shadows the server value.
    Editing { pending: String },
    /// One update request is in flight with `submitted`.
    Committing { submitted: u32 },
}

/// The single update request produced by a finished edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitRequest {
    pub kind: LimitKind,
    pub value: u32,
}

/// State machine for one editable limit.
#[derive(Debug, Clone)]
pub struct EditGuard {
    kind: LimitKind,
    /// Last value acknowledged by the server.
    value: u32,
    phase: EditPhase,
}

impl EditGuard {
    pub fn new(kind: LimitKind, initial: u32) -> Self {
        Self {
            kind,
            value: initial,
            phase: EditPhase::Clean,
        }
    }

    pub fn kind(&self) -> LimitKind {
        self.kind
    }

    pub fn phase(&self) -> &EditPhase {
        &self.phase
    }

    /// True while a snapshot must not overwrite the displayed value.
    pub fn is_dirty(&self) -> bool {
        !matches!(self.phase, EditPhase::Clean)
    }

    /// What the view shows right now: the pending text while editing,
    /// otherwise the last server value.
    pub fn display_value(&self) -> String {
        match &self.phase {
            EditPhase::Editing { pending } => pending.clone(),
            EditPhase::Committing { submitted } => submitted.to_string(),
            EditPhase::Clean => self.value.to_string(),
        }
    }

    /// Last server-acknowledged value.
    pub fn server_value(&self) -> u32 {
        self.value
    }

    /// Focus gain. Freezes the field against snapshots. Rejected while a
    /// commit is in flight; a repeated focus gain while editing is a no-op.
    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        match self.phase {
            EditPhase::Clean => {
                self.phase = EditPhase::Editing {
                    pending: self.value.to_string(),
                };
                Ok(())
            }
            EditPhase::Editing { .. } => Ok(()),
            EditPhase::Committing { .. } => Err(EditError::CommitInFlight(self.kind)),
        }
    }

    /// Value change while editing. Local only; no network.
    pub fn input(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        match &mut self.phase {
            EditPhase::Editing { pending } => {
                *pending = text.into();
                Ok(())
            }
            _ => Err(EditError::NotEditing(self.kind)),
        }
    }

    /// Focus loss. Parses the pending text (base 10, uniformly) and moves to
    /// `Committing`, yielding the one request to send. Invalid input is a
    /// validation failure: the guard falls back to `Clean` showing the last
    /// server value and nothing is sent.
    pub fn commit(&mut self) -> Result<CommitRequest, EditError> {
        let pending = match &self.phase {
            EditPhase::Editing { pending } => pending.trim().to_string(),
            _ => return Err(EditError::NotEditing(self.kind)),
        };

        if pending.is_empty() {
            self.phase = EditPhase::Clean;
            return Err(EditError::EmptyValue(self.kind));
        }

        match pending.parse::<u32>() {
            Ok(value) => {
                self.phase = EditPhase::Committing { submitted: value };
                Ok(CommitRequest {
                    kind: self.kind,
                    value,
                })
            }
            Err(_) => {
                self.phase = EditPhase::Clean;
                Err(EditError::InvalidNumber {
                    kind: self.kind,
                    value: pending,
                })
            }
        }
    }

    /// Commit acknowledged: adopt the server's authoritative value (it may
    /// have clamped or normalized the submitted one).
    pub fn resolve_ok(&mut self, server_value: u32) {
        self.value = server_value;
        self.phase = EditPhase::Clean;
    }

    /// Commit failed: back to `Clean` with the last known server value. The
    /// attempted edit is not retried.
    pub fn resolve_err(&mut self) {
        self.phase = EditPhase::Clean;
    }

    /// Apply a poll snapshot. Only a `Clean` field takes the value; while
    /// `Editing` the user's keystrokes win, and while `Committing` the commit
    /// response is authoritative.
    pub fn apply_snapshot(&mut self, value: u32) {
        if matches!(self.phase, EditPhase::Clean) {
            self.value = value;
        }
    }
}

/// The three limit guards of a scheduler detail view, keyed by [`LimitKind`].
#[derive(Debug, Clone)]
pub struct EditSet {
    processes: EditGuard,
    calcjobs: EditGuard,
    workflows: EditGuard,
}

impl EditSet {
    /// Guards seeded from the first scheduler snapshot.
    pub fn from_snapshot(snapshot: &Scheduler) -> Self {
        Self {
            processes: EditGuard::new(LimitKind::Processes, snapshot.max_processes),
            calcjobs: EditGuard::new(LimitKind::Calcjobs, snapshot.max_calcjobs),
            workflows: EditGuard::new(LimitKind::Workflows, snapshot.max_workflows),
        }
    }

    pub fn guard(&self, kind: LimitKind) -> &EditGuard {
        match kind {
            LimitKind::Processes => &self.processes,
            LimitKind::Calcjobs => &self.calcjobs,
            LimitKind::Workflows => &self.workflows,
        }
    }

    pub fn guard_mut(&mut self, kind: LimitKind) -> &mut EditGuard {
        match kind {
            LimitKind::Processes => &mut self.processes,
            LimitKind::Calcjobs => &mut self.calcjobs,
            LimitKind::Workflows => &mut self.workflows,
        }
    }

    /// Fan a scheduler snapshot out to all three guards. Dirty fields keep
    /// their pending values.
    pub fn apply_snapshot(&mut self, snapshot: &Scheduler) {
        for kind in LimitKind::ALL {
            self.guard_mut(kind).apply_snapshot(kind.value_of(snapshot));
        }
    }
}
