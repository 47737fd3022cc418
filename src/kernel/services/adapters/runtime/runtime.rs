use super::message::AppMessage;
use crate::kernel::effect::{BackendRequest, RequestId};
use crate::kernel::services::ports::Backend;
use std::io;
use std::sync::mpsc::Sender;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    backend: Backend,
    tx: Sender<AppMessage>,
}

impl AsyncRuntime {
    pub fn new(backend: Backend, tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            backend,
            tx,
        })
    }

    /// Issues `request` and posts its response as [`AppMessage::Response`].
    pub fn execute(&self, id: RequestId, request: BackendRequest) {
        let tx = self.tx.clone();
        let future = request.send(&self.backend);
        let name = request.name();
        self.runtime.spawn(async move {
            let response = future.await;
            tracing::debug!(id = id.0, request = name, status = response.status, "backend response");
            if tx.send(AppMessage::Response { id, response }).is_err() {
                tracing::debug!(id = id.0, "response dropped, explorer gone");
            }
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/runtime.rs"]
mod tests;
