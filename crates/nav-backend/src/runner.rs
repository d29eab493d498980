//! Effect runner: performs the fetches a [`Session`] asks for.
//!
//! [`spawn`] runs each effect as its own task and delivers the resulting
//! event on a channel, which is how the TUI stays responsive while content
//! loads. [`settle`] runs effects one after another against a session until
//! nothing is left to do; headless mode and the integration tests use it.

use nav_core::{Backend, Effect, Event, Session, Tree};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Perform one effect and return the event that reports its outcome.
pub async fn execute<B: Backend>(backend: &B, effect: Effect) -> Event {
    match effect {
        Effect::SyncTree => Event::TreeSynced(Tree::sync(backend).await),
        Effect::FetchFragment { request, node_url } => Event::FragmentLoaded {
            request,
            result: backend.fetch_fragment(&node_url).await,
        },
    }
}

/// Start every effect on `handle` and send each result to `tx` as it
/// completes. Results may arrive in any order.
pub fn spawn<B: Backend>(
    handle: &Handle,
    backend: &Arc<B>,
    effects: Vec<Effect>,
    tx: &UnboundedSender<Event>,
) {
    for effect in effects {
        let backend = Arc::clone(backend);
        let tx = tx.clone();
        handle.spawn(async move {
            let event = execute(backend.as_ref(), effect).await;
            if tx.send(event).is_err() {
                tracing::debug!("runner: receiver gone, dropping event");
            }
        });
    }
}

/// Run `effects`, and everything they lead to, to completion.
pub async fn settle<B: Backend>(session: &mut Session, backend: &B, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let event = execute(backend, effect).await;
        queue.extend(session.dispatch(event));
    }
}
