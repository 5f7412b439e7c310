//! Background workers owned by the runtime.
mod zone;

pub use zone::{
    ChannelZoneEffects, DeviceSummary, Zone, ZoneCommand, ZoneEffect, ZoneHandle, ZoneWorker,
};
