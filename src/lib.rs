//! Guildhall — an idle guild-simulation engine.
//!
//! A tick-driven economic simulation: passive hunts, time-boxed
//! expeditions, crafting lines, continuous altar accrual, and guild
//! progression. Everything is driven by elapsed-time deltas against an
//! injectable clock, so results are deterministic, linear in time, and
//! safe under offline catch-up. Presentation and persistence are the
//! host's job; the engine only mutates an [`entity::Entity`] and reports
//! what happened.

pub mod altar;
pub mod catalog;
pub mod clock;
pub mod combat;
pub mod constants;
pub mod costs;
pub mod crafting;
pub mod engine;
pub mod entity;
pub mod expeditions;
pub mod guild;
pub mod hunts;

pub use catalog::{Catalog, StaticCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{GuildEngine, OfflineReport, TickEvent, TickReport};
pub use entity::{Entity, GuildMember, Role};
