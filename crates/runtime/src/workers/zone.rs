//! Zone worker that owns the units and hazard devices of one zone.
//!
//! The worker advances every device once per tick on a single task, so device
//! state needs no locking. Placement and unit updates arrive as commands
//! through a [`ZoneHandle`]; detonation effects leave through a
//! [`ZoneEffects`] sink without being awaited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use game_core::zone::{DeviceState, check_deployment};
use game_core::{
    Beam, DamageProfile, DeployError, DeploymentRules, DeviceTuning, EffectError, EntityId,
    HazardDevice, HazardDeviceController, Position, TickReport, UnitKind, UnitRegistry,
    ZoneConfig, ZoneEffects, ZoneUnit,
};

use crate::api::{Result, RuntimeError};

/// Units and devices of one zone plus the rules that govern them.
pub struct Zone {
    units: UnitRegistry,
    devices: Vec<HazardDevice>,
    rules: DeploymentRules,
    tuning: DeviceTuning,
    controller: HazardDeviceController,
}

impl Zone {
    pub fn new(config: &ZoneConfig) -> Self {
        Self {
            units: UnitRegistry::new(),
            devices: Vec::new(),
            rules: config.deployment,
            tuning: config.device.clone(),
            controller: HazardDeviceController::landmine(),
        }
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn devices(&self) -> &[HazardDevice] {
        &self.devices
    }

    pub fn upsert_unit(&mut self, unit: ZoneUnit) {
        self.units.upsert(unit);
    }

    pub fn remove_unit(&mut self, id: EntityId) -> Option<ZoneUnit> {
        self.units.remove(id)
    }

    pub fn check_deployment(&self, position: Position) -> std::result::Result<(), DeployError> {
        check_deployment(&self.rules, &self.units, position)
    }

    /// Places a land mine with the zone's device tuning.
    pub fn deploy(
        &mut self,
        id: EntityId,
        owner: Option<EntityId>,
        position: Position,
    ) -> std::result::Result<(), DeployError> {
        if self.devices.iter().any(|device| device.id == id) {
            return Err(DeployError::AlreadyDeployed { unit: id });
        }
        self.check_deployment(position)?;

        let mut device = HazardDevice::new(id, position, self.tuning.clone());
        device.owner = owner;
        self.units
            .upsert(ZoneUnit::new(id, UnitKind::ProximityDevice, position));
        self.devices.push(device);
        Ok(())
    }

    /// Advances every device by `elapsed` and removes the ones that died.
    pub fn update(&mut self, elapsed: Duration, effects: &dyn ZoneEffects) -> Vec<(EntityId, TickReport)> {
        let mut reports = Vec::with_capacity(self.devices.len());

        for device in &mut self.devices {
            let report = self.controller.tick(device, elapsed, &self.units, effects);
            log_report(device.id, &report);
            reports.push((device.id, report));
        }

        let units = &mut self.units;
        self.devices.retain(|device| {
            if device.is_dead() {
                units.remove(device.id);
                false
            } else {
                true
            }
        });

        reports
    }
}

fn log_report(device: EntityId, report: &TickReport) {
    if let Some(target) = report.detonated {
        info!(target: "runtime::zone", device = %device, target = %target, "device detonated");
    }
    if report.despawned {
        info!(target: "runtime::zone", device = %device, "device despawned");
    }
    for failure in &report.effect_failures {
        warn!(target: "runtime::zone", device = %device, error = %failure, "effect hand-off failed");
    }
}

/// Effect emitted by the zone for downstream processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEffect {
    Beam(Beam),
    AreaDamage(DamageProfile),
}

/// [`ZoneEffects`] sink feeding a bounded channel.
///
/// Never blocks: a full channel is reported as backpressure.
#[derive(Clone)]
pub struct ChannelZoneEffects {
    tx: mpsc::Sender<ZoneEffect>,
}

impl ChannelZoneEffects {
    pub fn new(tx: mpsc::Sender<ZoneEffect>) -> Self {
        Self { tx }
    }

    fn push(&self, effect: ZoneEffect) -> std::result::Result<(), EffectError> {
        self.tx.try_send(effect).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => EffectError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => EffectError::Closed,
        })
    }
}

impl ZoneEffects for ChannelZoneEffects {
    fn create_beam(&self, beam: Beam) -> std::result::Result<(), EffectError> {
        self.push(ZoneEffect::Beam(beam))
    }

    fn dispatch_aoe(&self, damage: DamageProfile) -> std::result::Result<(), EffectError> {
        self.push(ZoneEffect::AreaDamage(damage))
    }
}

/// Read-only view of a placed device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    pub id: EntityId,
    pub position: Position,
    pub state: DeviceState,
    pub despawn_remaining: Option<Duration>,
}

impl From<&HazardDevice> for DeviceSummary {
    fn from(device: &HazardDevice) -> Self {
        Self {
            id: device.id,
            position: device.position,
            state: device.state(),
            despawn_remaining: device.despawn_timer().map(|timer| timer.remaining()),
        }
    }
}

/// Commands accepted by the zone worker.
pub enum ZoneCommand {
    Deploy {
        id: EntityId,
        owner: Option<EntityId>,
        position: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    CheckDeployment {
        position: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    UpsertUnit(ZoneUnit),
    RemoveUnit(EntityId),
    /// Advance the zone by a fixed amount regardless of the timer.
    Step {
        elapsed: Duration,
        reply: oneshot::Sender<Vec<(EntityId, TickReport)>>,
    },
    Devices {
        reply: oneshot::Sender<Vec<DeviceSummary>>,
    },
    Shutdown,
}

/// Background task that ticks one zone.
pub struct ZoneWorker {
    zone: Zone,
    command_rx: mpsc::Receiver<ZoneCommand>,
    effects: Arc<dyn ZoneEffects + Send + Sync>,
    tick_interval: Option<Duration>,
}

impl ZoneWorker {
    pub fn new(
        zone: Zone,
        command_rx: mpsc::Receiver<ZoneCommand>,
        effects: Arc<dyn ZoneEffects + Send + Sync>,
        tick_interval: Option<Duration>,
    ) -> Self {
        Self {
            zone,
            command_rx,
            effects,
            tick_interval,
        }
    }

    /// Main worker loop; ends on shutdown or when every handle is dropped.
    pub async fn run(mut self) {
        let mut ticker = self.tick_interval.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    let now = Instant::now();
                    self.zone.update(now - last_tick, self.effects.as_ref());
                    last_tick = now;
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(ZoneCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
            }
        }

        debug!(target: "runtime::zone", "zone worker stopped");
    }

    fn handle_command(&mut self, cmd: ZoneCommand) {
        match cmd {
            ZoneCommand::Deploy {
                id,
                owner,
                position,
                reply,
            } => {
                let result = self.zone.deploy(id, owner, position).map_err(RuntimeError::from);
                match &result {
                    Ok(()) => info!(target: "runtime::zone", device = %id, "device deployed"),
                    Err(err) => debug!(target: "runtime::zone", device = %id, error = %err, "deployment refused"),
                }
                if reply.send(result).is_err() {
                    debug!(target: "runtime::zone", "Deploy reply channel closed (caller dropped)");
                }
            }
            ZoneCommand::CheckDeployment { position, reply } => {
                let result = self.zone.check_deployment(position).map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::zone", "CheckDeployment reply channel closed (caller dropped)");
                }
            }
            ZoneCommand::UpsertUnit(unit) => self.zone.upsert_unit(unit),
            ZoneCommand::RemoveUnit(id) => {
                self.zone.remove_unit(id);
            }
            ZoneCommand::Step { elapsed, reply } => {
                let reports = self.zone.update(elapsed, self.effects.as_ref());
                if reply.send(reports).is_err() {
                    debug!(target: "runtime::zone", "Step reply channel closed (caller dropped)");
                }
            }
            ZoneCommand::Devices { reply } => {
                let devices = self.zone.devices().iter().map(DeviceSummary::from).collect();
                if reply.send(devices).is_err() {
                    debug!(target: "runtime::zone", "Devices reply channel closed (caller dropped)");
                }
            }
            ZoneCommand::Shutdown => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Cloneable handle for sending commands to a zone worker.
#[derive(Clone)]
pub struct ZoneHandle {
    command_tx: mpsc::Sender<ZoneCommand>,
}

impl ZoneHandle {
    pub fn new(command_tx: mpsc::Sender<ZoneCommand>) -> Self {
        Self { command_tx }
    }

    async fn send(&self, cmd: ZoneCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Places a device after checking the separation rules.
    pub async fn deploy(
        &self,
        id: EntityId,
        owner: Option<EntityId>,
        position: Position,
    ) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(ZoneCommand::Deploy {
            id,
            owner,
            position,
            reply,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn check_deployment(&self, position: Position) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(ZoneCommand::CheckDeployment { position, reply })
            .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn upsert_unit(&self, unit: ZoneUnit) -> Result<()> {
        self.send(ZoneCommand::UpsertUnit(unit)).await
    }

    pub async fn remove_unit(&self, id: EntityId) -> Result<()> {
        self.send(ZoneCommand::RemoveUnit(id)).await
    }

    pub async fn step(&self, elapsed: Duration) -> Result<Vec<(EntityId, TickReport)>> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(ZoneCommand::Step { elapsed, reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn devices(&self) -> Result<Vec<DeviceSummary>> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(ZoneCommand::Devices { reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(ZoneCommand::Shutdown).await
    }
}
