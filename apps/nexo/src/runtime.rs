//! # Fetch Runtime
//!
//! Drives a `Session` from a single task: every `Command::Fetch` becomes a
//! tokio task bounded by the request timeout, every `Command::Cancel`
//! aborts its task, and completions come back over a channel to the task
//! that owns the session.

use crate::client::NexoClient;
use nexo_core::{Command, FetchFailure, Renderer, Response, Session, Ticket};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Outcome of one fetch task.
#[derive(Debug)]
struct Completion {
    ticket: Ticket,
    outcome: Result<Response, FetchFailure>,
}

/// Owns a session and the fetch tasks it has in flight.
pub struct Runtime<R: Renderer> {
    session: Session<R>,
    client: NexoClient,
    timeout: Duration,
    tasks: BTreeMap<u64, AbortHandle>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<R: Renderer> Runtime<R> {
    #[must_use]
    pub fn new(session: Session<R>, client: NexoClient, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            client,
            timeout,
            tasks: BTreeMap::new(),
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<R> {
        &mut self.session
    }

    /// Number of fetch tasks still running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Start or abort tasks for every queued session command.
    pub fn dispatch(&mut self) {
        for command in self.session.drain_commands() {
            match command {
                Command::Fetch(ticket, request) => {
                    let client = self.client.clone();
                    let tx = self.tx.clone();
                    let timeout = self.timeout;
                    let id = ticket.id;

                    tracing::debug!(ticket = %ticket, request = %request.path(), "spawning fetch");
                    let handle = tokio::spawn(async move {
                        let outcome = match tokio::time::timeout(timeout, client.execute(&request)).await {
                            Ok(outcome) => outcome,
                            Err(_) => Err(FetchFailure::Timeout),
                        };
                        // The receiver only goes away with the runtime.
                        let _ = tx.send(Completion { ticket, outcome });
                    });
                    self.tasks.insert(id, handle.abort_handle());
                }
                Command::Cancel(ticket) => {
                    if let Some(handle) = self.tasks.remove(&ticket.id) {
                        tracing::debug!(ticket = %ticket, "aborting fetch");
                        handle.abort();
                    }
                }
            }
        }
    }

    /// Run until no fetch is in flight. Completions may queue follow-up
    /// requests (retries, gene names); those are awaited too.
    pub async fn settle(&mut self) {
        loop {
            self.dispatch();
            if self.tasks.is_empty() {
                break;
            }
            let Some(completion) = self.rx.recv().await else {
                break;
            };
            if self.tasks.remove(&completion.ticket.id).is_none() {
                tracing::debug!(ticket = %completion.ticket, "completion for aborted fetch");
            }
            self.session.complete(completion.ticket, completion.outcome);
        }
    }

    /// Abort every fetch and close the session.
    pub fn shutdown(&mut self) {
        for command in self.session.shutdown() {
            if let Command::Cancel(ticket) = command
                && let Some(handle) = self.tasks.remove(&ticket.id)
            {
                handle.abort();
            }
        }
        for (_, handle) in std::mem::take(&mut self.tasks) {
            handle.abort();
        }
        tracing::info!("runtime shut down");
    }
}

impl<R: Renderer> Drop for Runtime<R> {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}
