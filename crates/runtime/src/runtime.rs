//! High-level runtime orchestrator.
//!
//! The runtime wires the repository, sessions, request router and zone
//! worker together and exposes a builder-based API for the server binary.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{ItemCatalog, ZoneEffects};

use crate::activation::{ActivationDispatcher, StrategyRegistry};
use crate::api::{BroadcastMessageSink, Command, Message, Request, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::repository::{InMemoryRepository, Repository};
use crate::router::{RequestHandler, RequestRouter};
use crate::session::SessionRegistry;
use crate::transaction::Store;
use crate::workers::{ChannelZoneEffects, Zone, ZoneEffect, ZoneHandle, ZoneWorker};

/// Main runtime that serves requests and ticks the zone.
///
/// Design: Runtime owns the zone worker; [`ZoneHandle`] is the cloneable
/// façade for talking to it.
pub struct Runtime {
    store: Store,
    sessions: Arc<SessionRegistry>,
    router: Arc<RequestRouter>,
    messages: BroadcastMessageSink,
    zone: ZoneHandle,
    zone_worker: JoinHandle<()>,
    zone_effects: Option<mpsc::Receiver<ZoneEffect>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Routes a client request to its handler.
    pub async fn handle_request(&self, request: Request) -> Result<()> {
        self.router.handle_local_request(request).await
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn zone(&self) -> ZoneHandle {
        self.zone.clone()
    }

    /// Subscribe to outbound messages.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<Message> {
        self.messages.subscribe()
    }

    /// Takes the receiving end of the zone effect channel.
    ///
    /// `None` if it was already taken or the runtime was built with a
    /// custom effect sink.
    pub fn take_zone_effects(&mut self) -> Option<mpsc::Receiver<ZoneEffect>> {
        self.zone_effects.take()
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        self.zone.shutdown().await?;
        self.zone_worker.await.map_err(RuntimeError::WorkerJoin)?;
        info!(target: "runtime", "runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn Repository>>,
    catalog: ItemCatalog,
    strategies: Option<StrategyRegistry>,
    handlers: Vec<(Command, Arc<dyn RequestHandler>)>,
    zone_effects: Option<Arc<dyn ZoneEffects + Send + Sync>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            catalog: ItemCatalog::default(),
            strategies: None,
            handlers: Vec::new(),
            zone_effects: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Backing store; an empty in-memory repository when not set.
    pub fn repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the activation strategies.
    ///
    /// If not provided, [`StrategyRegistry::standard`] is used.
    pub fn strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Register an extra request handler, e.g. the teleport service.
    pub fn handler(mut self, command: Command, handler: Arc<dyn RequestHandler>) -> Self {
        self.handlers.push((command, handler));
        self
    }

    /// Send zone effects to `effects` instead of the built-in channel.
    pub fn zone_effects(mut self, effects: Arc<dyn ZoneEffects + Send + Sync>) -> Self {
        self.zone_effects = Some(effects);
        self
    }

    /// Build the runtime and spawn the zone worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let config = self.config;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryRepository::default()));
        let store = Store::new(repository);
        let sessions = Arc::new(SessionRegistry::new());
        let messages = BroadcastMessageSink::new(config.message_buffer_size);

        let dispatcher = ActivationDispatcher::new(
            store.clone(),
            Arc::new(self.catalog),
            Arc::clone(&sessions),
            Arc::new(messages.clone()),
            self.strategies.unwrap_or_else(StrategyRegistry::standard),
            config.relog.clone(),
        );

        let mut router = RequestRouter::new();
        router.register(Command::UseRedeemableItem, Arc::new(dispatcher));
        for (command, handler) in self.handlers {
            router.register(command, handler);
        }

        let (effects, zone_effects): (Arc<dyn ZoneEffects + Send + Sync>, _) =
            match self.zone_effects {
                Some(effects) => (effects, None),
                None => {
                    let (tx, rx) = mpsc::channel(config.zone_effect_buffer_size);
                    (Arc::new(ChannelZoneEffects::new(tx)), Some(rx))
                }
            };

        let (command_tx, command_rx) = mpsc::channel(config.zone_command_buffer_size);
        let worker = ZoneWorker::new(
            Zone::new(&config.zone),
            command_rx,
            effects,
            config.tick_interval,
        );
        let zone_worker = tokio::spawn(worker.run());

        info!(
            target: "runtime",
            tick_interval = ?config.tick_interval,
            "runtime started"
        );

        Ok(Runtime {
            store,
            sessions,
            router: Arc::new(router),
            messages,
            zone: ZoneHandle::new(command_tx),
            zone_worker,
            zone_effects,
        })
    }
}
