//! Fans inbound messages out to tasks.
//!
//! With sequential chats enabled every chat gets one FIFO queue drained by a
//! single worker task, so two messages of the same chat never race on its
//! stored state. Workers retire after an idle period. Without it every
//! message gets its own task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::Orchestrator;
use crate::models::IncomingMessage;

type ChatQueues = Arc<Mutex<HashMap<i64, mpsc::UnboundedSender<IncomingMessage>>>>;

#[derive(Clone)]
pub struct Dispatcher {
    orchestrator: Arc<Orchestrator>,
    queues: ChatQueues,
}

impl Dispatcher {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            queues: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Hand a message off for processing without waiting for it.
    pub async fn dispatch(&self, message: IncomingMessage) {
        if !self.orchestrator.config().sequential_chats {
            let orchestrator = self.orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle(message).await });
            return;
        }

        let chat_id = message.chat_id;
        let mut queues = self.queues.lock().await;

        let message = match queues.get(&chat_id) {
            Some(tx) => match tx.send(message) {
                Ok(()) => return,
                // worker is gone, start a new one below
                Err(mpsc::error::SendError(message)) => message,
            },
            None => message,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // rx is alive, this cannot fail
        let _ = tx.send(message);
        queues.insert(chat_id, tx);
        drop(queues);

        debug!(chat_id, "Starting chat worker");
        tokio::spawn(run_chat_worker(
            chat_id,
            rx,
            self.orchestrator.clone(),
            self.queues.clone(),
        ));
    }

    /// Number of chats with a live worker.
    pub async fn active_chats(&self) -> usize {
        self.queues.lock().await.len()
    }
}

async fn run_chat_worker(
    chat_id: i64,
    mut rx: mpsc::UnboundedReceiver<IncomingMessage>,
    orchestrator: Arc<Orchestrator>,
    queues: ChatQueues,
) {
    let idle_timeout = orchestrator.config().chat_idle_timeout;

    loop {
        match tokio::time::timeout(idle_timeout, rx.recv()).await {
            Ok(Some(message)) => orchestrator.handle(message).await,
            Ok(None) => break,
            Err(_) => {
                // senders only push while holding the map lock, so an empty
                // queue checked under the lock stays empty once we are removed
                let mut queues = queues.lock().await;
                if rx.is_empty() {
                    queues.remove(&chat_id);
                    debug!(chat_id, "Chat worker idle, retiring");
                    break;
                }
            }
        }
    }
}
