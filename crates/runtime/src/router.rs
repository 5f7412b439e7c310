//! Command routing for inbound requests.
//!
//! Handlers are registered once while the runtime is built; the router is
//! immutable afterwards and shared behind an `Arc`. A handler receives the
//! router so it can re-dispatch follow-up requests through the same path a
//! client request takes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{Command, Missing, Request, Result, RuntimeError};

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: Request, router: &RequestRouter) -> Result<()>;
}

#[derive(Default)]
pub struct RequestRouter {
    handlers: HashMap<Command, Arc<dyn RequestHandler>>,
}

impl RequestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `command`, replacing any earlier one.
    pub fn register(&mut self, command: Command, handler: Arc<dyn RequestHandler>) -> &mut Self {
        self.handlers.insert(command, handler);
        self
    }

    pub fn handles(&self, command: Command) -> bool {
        self.handlers.contains_key(&command)
    }

    /// Runs the handler registered for the request's command.
    pub async fn handle_local_request(&self, request: Request) -> Result<()> {
        let handler = self
            .handlers
            .get(&request.command)
            .cloned()
            .ok_or(RuntimeError::NotFound(Missing::Handler(request.command)))?;

        debug!(
            target: "runtime::router",
            command = %request.command,
            session = %request.session,
            "dispatching request"
        );
        handler.handle(request, self).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::api::ErrorCategory;
    use game_core::SessionId;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Request>>);

    #[async_trait]
    impl RequestHandler for Recorder {
        async fn handle(&self, request: Request, _router: &RequestRouter) -> Result<()> {
            self.0.lock().unwrap().push(request);
            Ok(())
        }
    }

    #[tokio::test]
    async fn routes_to_registered_handler() {
        let recorder = Arc::new(Recorder::default());
        let mut router = RequestRouter::new();
        router.register(Command::SparkTeleportUse, recorder.clone());

        let request = Request::new(Command::SparkTeleportUse, SessionId(1)).with("ID", 7u64);
        router.handle_local_request(request.clone()).await.unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec![request]);
    }

    #[tokio::test]
    async fn unknown_command_is_not_found() {
        let router = RequestRouter::new();
        let err = router
            .handle_local_request(Request::new(Command::ServerMessage, SessionId(1)))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
