//! Per-screen state holders: roster, attendance and dashboard.
//!
//! Controllers own their transient state exclusively. Fetches are stamped with
//! a [`Ticket`]; finishing a fetch whose ticket has been superseded drops the
//! result, so a slow response can never overwrite a newer one.

use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldErrors;

pub mod attendance;
pub mod dashboard;
pub mod roster;

pub use attendance::AttendanceController;
pub use dashboard::DashboardController;
pub use roster::RosterController;

/// A failed fetch and an empty successful fetch are different states.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(StoreError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn settle(&mut self, result: Result<T, StoreError>) {
        *self = match result {
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed(err),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues tickets for one fetch slot; only the latest ticket is current.
#[derive(Debug, Default)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn next(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.0
    }
}

/// Outcome of a rejected form submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settles `state` with `result` if `ticket` is still current. Returns whether it was applied.
pub(crate) fn apply<T>(
    generation: &Generation,
    state: &mut LoadState<T>,
    ticket: Ticket,
    result: Result<T, StoreError>,
) -> bool {
    if !generation.is_current(ticket) {
        tracing::debug!(?ticket, "Dropping stale fetch result");
        return false;
    }
    state.settle(result);
    true
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
