//! Query lifecycle for a single conversation.
//!
//! ```text
//! Idle --submit--> Pending --resolve(Ok)--> Idle
//!                         \--resolve(Err)--> Idle
//! ```
//!
//! [`SessionController::begin_submit`] and [`SessionController::resolve`] are
//! the two halves of a cycle so a UI can release its borrow while the request
//! is in flight; [`SessionController::submit`] runs both around a
//! [`QueryService`] call.

use crate::api::{ChatError, QueryRequest, QueryResponse, QueryService};
use crate::transcript::Transcript;
use crate::types::{Citation, MessageId};
use tracing::{debug, warn};

pub const WELCOME_MESSAGE: &str = "Welcome to the Course Materials Assistant! I can help you with questions about courses, lessons and specific content. What would you like to know?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending { ticket: u64 },
}

/// A query that has been admitted and must be resolved with the same ticket.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingQuery {
    pub ticket: u64,
    pub request: QueryRequest,
}

pub struct SessionController {
    session_id: Option<String>,
    transcript: Transcript,
    phase: Phase,
    next_ticket: u64,
    welcome_text: String,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(WELCOME_MESSAGE)
    }
}

impl SessionController {
    pub fn new(welcome_text: impl Into<String>) -> Self {
        let welcome_text = welcome_text.into();
        Self {
            session_id: None,
            transcript: Transcript::with_welcome(&welcome_text),
            phase: Phase::Idle,
            next_ticket: 1,
            welcome_text,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// Admit a query: record the user message and loading placeholder and
    /// enter `Pending`. Returns `None` (and changes nothing) when a query is
    /// already pending or the text is blank.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingQuery> {
        let query = text.trim();
        if query.is_empty() || self.is_pending() {
            return None;
        }

        self.transcript.append_user(query);
        self.transcript.append_loading();

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.phase = Phase::Pending { ticket };
        debug!(ticket, "query pending");

        Some(PendingQuery {
            ticket,
            request: QueryRequest {
                query: query.to_string(),
                session_id: self.session_id.clone(),
            },
        })
    }

    /// Finish the cycle started by `begin_submit`. Outcomes for a ticket that
    /// is no longer pending (e.g. after the session was reset) are dropped.
    pub fn resolve(
        &mut self,
        ticket: u64,
        outcome: Result<QueryResponse, ChatError>,
    ) -> Option<MessageId> {
        if self.phase != (Phase::Pending { ticket }) {
            debug!(ticket, "discarding stale query outcome");
            return None;
        }

        self.transcript.remove_transient();
        let id = match outcome {
            Ok(response) => {
                if self.session_id.is_none() {
                    self.session_id = Some(response.session_id);
                }
                let citations = response.sources.into_iter().map(Citation::from).collect();
                self.transcript.append_assistant(response.answer, citations)
            }
            Err(err) => {
                warn!(ticket, "query failed: {err}");
                self.transcript
                    .append_assistant(format!("Error: {err}"), Vec::new())
            }
        };
        self.phase = Phase::Idle;
        Some(id)
    }

    /// Run a complete query cycle. Returns `false` if the query was not
    /// admitted.
    pub async fn submit<S>(&mut self, service: &S, text: &str) -> bool
    where
        S: QueryService + ?Sized,
    {
        let Some(pending) = self.begin_submit(text) else {
            return false;
        };
        let outcome = service.query(&pending.request).await;
        self.resolve(pending.ticket, outcome);
        true
    }

    /// Forget the session and show a fresh welcome. Any pending query is
    /// abandoned.
    pub fn start_new_session(&mut self) {
        self.session_id = None;
        self.phase = Phase::Idle;
        self.transcript.reset(&self.welcome_text);
    }

    /// Detach the held session id (if any) and reset to a fresh welcome.
    /// The caller deletes the returned id remotely on a best-effort basis.
    pub fn take_session_for_clear(&mut self) -> Option<String> {
        let previous = self.session_id.take();
        self.start_new_session();
        previous
    }

    /// Ask the service to drop the current session, then start a new one.
    /// Deletion failures are logged and never block the reset.
    pub async fn clear_session<S>(&mut self, service: &S)
    where
        S: QueryService + ?Sized,
    {
        if let Some(previous) = self.take_session_for_clear() {
            delete_session_best_effort(service, &previous).await;
        }
    }
}

pub async fn delete_session_best_effort<S>(service: &S, session_id: &str)
where
    S: QueryService + ?Sized,
{
    if let Err(err) = service.delete_session(session_id).await {
        warn!(session_id, "failed to clear session: {err}");
    }
}
