//! In-process model of the console page.
//!
//! Several actions may be in flight at once. Each one takes a ticket when it
//! starts; a completed action only writes the form (or the result table) if
//! no action begun after it has written that area already.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::forms::inventory::FormState;
use crate::gateway::InventoryGateway;
use crate::services::flash::Flash;
use crate::services::inventory::{Action, ActionOutcome, DispatchOptions, FormEffect, dispatch};
use crate::services::results::ResultTable;

/// Position of an action in the order actions were begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Which parts of an outcome were written by [`Console::complete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub form: bool,
    pub results: bool,
}

/// Copy of the page state used for rendering.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ConsoleSnapshot {
    pub form: FormState,
    pub results: Option<ResultTable>,
}

#[derive(Debug, Default)]
struct ConsoleState {
    form: FormState,
    results: Option<ResultTable>,
    issued: u64,
    form_written: u64,
    results_written: u64,
}

/// Shared console page: form fields and the search results area.
#[derive(Debug, Default)]
pub struct Console {
    state: Mutex<ConsoleState>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start an action: the submitted fields become the current form and a new
    /// ticket is issued.
    pub fn begin(&self, submitted: FormState) -> Ticket {
        let mut state = self.lock();
        state.issued += 1;
        let ticket = state.issued;
        state.form = submitted;
        state.form_written = ticket;
        Ticket(ticket)
    }

    /// Apply the outcome of the action holding `ticket`, skipping every area
    /// a newer action has already written.
    pub fn complete(&self, ticket: Ticket, outcome: ActionOutcome) -> Applied {
        let mut state = self.lock();
        let mut applied = Applied::default();
        let Ticket(ticket) = ticket;

        match outcome.form {
            FormEffect::Keep => {}
            effect if ticket >= state.form_written => {
                match effect {
                    FormEffect::Fill(record) => state.form.fill(&record),
                    FormEffect::Clear => state.form.clear(),
                    FormEffect::Keep => {}
                }
                state.form_written = ticket;
                applied.form = true;
            }
            _ => log::debug!(
                "Discarding stale form update from ticket {ticket} (form written by {})",
                state.form_written
            ),
        }

        if let Some(table) = outcome.results {
            if ticket >= state.results_written {
                state.results = Some(table);
                state.results_written = ticket;
                applied.results = true;
            } else {
                log::debug!(
                    "Discarding stale results from ticket {ticket} (results written by {})",
                    state.results_written
                );
            }
        }

        applied
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.lock();
        ConsoleSnapshot {
            form: state.form.clone(),
            results: state.results.clone(),
        }
    }
}

/// Run one button press end to end and return the flash to show.
pub async fn run_action<G>(
    console: &Console,
    gateway: &G,
    action: Action,
    submitted: FormState,
    options: &DispatchOptions,
) -> Option<Flash>
where
    G: InventoryGateway + ?Sized,
{
    let ticket = console.begin(submitted.clone());
    let outcome = dispatch(gateway, action, &submitted, options).await;
    let flash = outcome.flash.clone();
    let applied = console.complete(ticket, outcome);
    log::debug!("Console action {action:?} applied: {applied:?}");
    flash
}
