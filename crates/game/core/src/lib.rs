//! Data model and zone simulation shared by the game server runtime.
//!
//! `game-core` defines items, containers, characters and the hazard-device
//! simulation as plain synchronous types. It performs no persistence and no
//! I/O: the runtime loads records into these types, mutates them inside a
//! transaction, and writes them back.
pub mod actor;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod container;
pub mod item;
pub mod state;
pub mod zone;

pub use actor::{Account, ActiveBoost, BoostSpec, Character, Robot, Tint};
pub use catalog::{ItemCatalog, ItemDefinition, ItemEffect, RewardEntry, RewardTable};
pub use combat::{DamageKind, DamageProfile};
pub use config::{BoundaryRule, DeploymentRules, DeviceTuning, ZoneConfig};
pub use container::{Container, ContainerError, ContainerInfo, ContainerKind, Unstacked};
pub use item::{Item, ItemError, ItemKind};
pub use state::{AccountId, DefinitionId, EntityId, Position, SessionId};
pub use zone::{
    Beam, DeployError, EffectError, HazardDevice, HazardDeviceController, TickReport, UnitKind,
    UnitRegistry, ZoneEffects, ZoneUnit, ZoneView,
};
