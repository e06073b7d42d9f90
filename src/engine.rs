//! Tick orchestration.
//!
//! [`GuildEngine`] is the service object a host constructs once with its
//! catalog and clock (explicit dependency injection — no global state)
//! and drives on whatever cadence it likes. One tick runs, in order: buff
//! sweep, expedition cleanup, expedition completion, hunts, crafting,
//! altar accrual, then guild XP and bounty bookkeeping. All accrual math
//! is delta-driven, so irregular cadences and offline catch-up produce
//! the same totals as a steady timer.

use crate::altar::process_accrual;
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::constants::MAX_OFFLINE_SECONDS;
use crate::crafting::process_crafting;
use crate::entity::{BuffKind, Entity};
use crate::expeditions::{
    check_completed_expeditions, cleanup_invalid_expeditions, launch_expedition, ExpeditionError,
};
use crate::guild::{
    add_guild_xp, generate_daily_bounties, record_bounty_progress, BountyKind, GuildLevelUp,
    RandomPerkSelector,
};
use crate::hunts::{process_hunts, start_hunt, HuntError, HuntEvent};
use log::debug;
use rand::Rng;
use uuid::Uuid;

/// One observable effect of a tick, in chronological order. The host maps
/// these to log lines, notifications, or UI updates; the engine never
/// touches presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    BuffExpired(BuffKind),
    ExpeditionDiscarded { count: usize },
    ExpeditionCompleted {
        expedition_id: String,
        gold: u64,
        members_freed: usize,
    },
    HuntProgress {
        enemy_id: String,
        new_kills: u64,
        gold: u64,
    },
    ItemDropped {
        item_id: String,
        quantity: u32,
    },
    ItemsCrafted {
        item_id: String,
        units: u32,
    },
    GuildLevelUp(GuildLevelUp),
    BountiesRefreshed { count: usize },
}

/// Result of processing one tick.
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    pub events: Vec<TickEvent>,
    /// Echoes generated this tick.
    pub echoes_gained: f64,
    /// Guild XP applied this tick (hunt trickle plus expedition rewards).
    pub guild_xp: u64,
    /// True if anything observable changed and the host should persist.
    pub state_changed: bool,
}

/// Offline catch-up summary, produced by one batched update on resume.
#[derive(Debug, Default, Clone)]
pub struct OfflineReport {
    pub elapsed_seconds: i64,
    /// Elapsed time actually applied, after the 7-day cap.
    pub applied_seconds: i64,
    pub echoes_gained: f64,
    pub kills: u64,
    pub expeditions_completed: usize,
    pub guild_levels_gained: usize,
}

/// Narrow persistence boundary. The engine calls [`EntityStore::save`]
/// only at the end of a tick, never mid-computation; a failure leaves
/// in-memory state valid and is reported to the host for retry.
pub trait EntityStore {
    fn save(&mut self, entity: &Entity) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

/// Store that keeps JSON snapshots in memory. Used by tests and as a
/// template for real stores.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub snapshots: Vec<String>,
}

impl EntityStore for InMemoryStore {
    fn save(&mut self, entity: &Entity) -> Result<(), StoreError> {
        let json = serde_json::to_string(entity).map_err(|e| StoreError {
            message: e.to_string(),
        })?;
        self.snapshots.push(json);
        Ok(())
    }
}

/// The simulation service object.
pub struct GuildEngine<C: Catalog, K: Clock> {
    catalog: C,
    clock: K,
}

impl<C: Catalog, K: Clock> GuildEngine<C, K> {
    pub fn new(catalog: C, clock: K) -> Self {
        Self { catalog, clock }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Processes one tick, deriving the elapsed delta from the entity's
    /// own last-tick timestamp. Clock regressions yield a zero delta.
    pub fn tick(&self, entity: &mut Entity, rng: &mut impl Rng) -> TickReport {
        let now = self.clock.now();
        let delta = (now - entity.last_tick).max(0) as f64;
        entity.last_tick = now;
        entity.last_seen = now;
        self.run(entity, delta, now, rng)
    }

    /// Processes one tick with an explicit delta, for hosts that own the
    /// timer. "Now" still comes from the injected clock.
    pub fn tick_with_delta(
        &self,
        entity: &mut Entity,
        delta: f64,
        rng: &mut impl Rng,
    ) -> TickReport {
        self.run(entity, delta, self.clock.now(), rng)
    }

    /// Applies the wall-clock time elapsed since the entity was last
    /// seen as a single batched update, capped at seven days. Syncs the
    /// timestamps so an immediate second call applies nothing.
    pub fn catch_up(&self, entity: &mut Entity, rng: &mut impl Rng) -> OfflineReport {
        let now = self.clock.now();
        let elapsed = now - entity.last_seen;
        entity.last_seen = now;
        entity.last_tick = now;
        if elapsed <= 0 {
            return OfflineReport::default();
        }

        let applied = elapsed.min(MAX_OFFLINE_SECONDS);
        let report = self.run(entity, applied as f64, now, rng);

        let mut offline = OfflineReport {
            elapsed_seconds: elapsed,
            applied_seconds: applied,
            echoes_gained: report.echoes_gained,
            ..OfflineReport::default()
        };
        for event in &report.events {
            match event {
                TickEvent::HuntProgress { new_kills, .. } => offline.kills += new_kills,
                TickEvent::ExpeditionCompleted { .. } => offline.expeditions_completed += 1,
                TickEvent::GuildLevelUp(_) => offline.guild_levels_gained += 1,
                _ => {}
            }
        }
        offline
    }

    /// Ticks, then saves at the batch boundary when state changed. The
    /// store error, if any, is handed back alongside the report.
    pub fn tick_and_save(
        &self,
        entity: &mut Entity,
        store: &mut impl EntityStore,
        rng: &mut impl Rng,
    ) -> (TickReport, Result<(), StoreError>) {
        let report = self.tick(entity, rng);
        let saved = if report.state_changed {
            store.save(entity)
        } else {
            Ok(())
        };
        (report, saved)
    }

    /// Starts a hunt at the injected clock's current time.
    pub fn start_hunt(
        &self,
        entity: &mut Entity,
        enemy_id: &str,
        member_ids: &[Uuid],
    ) -> Result<(), HuntError> {
        start_hunt(entity, enemy_id, member_ids, self.clock.now())
    }

    /// Launches an expedition at the injected clock's current time.
    pub fn launch_expedition(
        &self,
        entity: &mut Entity,
        expedition_id: &str,
        member_ids: &[Uuid],
    ) -> Result<(), ExpeditionError> {
        launch_expedition(
            entity,
            &self.catalog,
            expedition_id,
            member_ids,
            self.clock.now(),
        )
    }

    fn run(&self, entity: &mut Entity, delta: f64, now: i64, rng: &mut impl Rng) -> TickReport {
        let mut report = TickReport::default();
        let echoes_before = entity.echoes;

        for kind in entity.sweep_expired_buffs(now) {
            report.events.push(TickEvent::BuffExpired(kind));
        }

        let discarded = cleanup_invalid_expeditions(entity, &self.catalog);
        if discarded > 0 {
            report
                .events
                .push(TickEvent::ExpeditionDiscarded { count: discarded });
        }

        let mut guild_xp = 0u64;
        let completions = check_completed_expeditions(entity, &self.catalog, now);
        let completed = completions.len();
        for completion in completions {
            guild_xp += completion.guild_xp;
            report.events.push(TickEvent::ExpeditionCompleted {
                expedition_id: completion.expedition_id,
                gold: completion.gold,
                members_freed: completion.members_freed,
            });
        }

        let mut kills = 0u64;
        let hunt_outcome = process_hunts(entity, &self.catalog, delta, now, rng);
        guild_xp += hunt_outcome.guild_xp;
        for event in hunt_outcome.events {
            match event {
                HuntEvent::KillsRecorded {
                    enemy_id,
                    new_kills,
                    gold,
                } => {
                    kills += new_kills;
                    report.events.push(TickEvent::HuntProgress {
                        enemy_id,
                        new_kills,
                        gold,
                    });
                }
                HuntEvent::ItemDropped {
                    item_id, quantity, ..
                } => report.events.push(TickEvent::ItemDropped { item_id, quantity }),
            }
        }

        let mut crafted = 0u64;
        for event in process_crafting(entity, delta) {
            crafted += event.units as u64;
            report.events.push(TickEvent::ItemsCrafted {
                item_id: event.item_id,
                units: event.units,
            });
        }

        let summary = process_accrual(entity, delta, now);
        report.echoes_gained = summary.echoes;

        // Whole-echo crossings, exact regardless of tick size
        let echo_units = (entity.echoes.floor() - echoes_before.floor()).max(0.0) as u64;

        record_bounty_progress(&mut entity.guild, BountyKind::SlayEnemies, kills);
        record_bounty_progress(
            &mut entity.guild,
            BountyKind::CompleteExpeditions,
            completed as u64,
        );
        record_bounty_progress(&mut entity.guild, BountyKind::CraftItems, crafted);
        record_bounty_progress(&mut entity.guild, BountyKind::GatherEchoes, echo_units);

        if guild_xp > 0 {
            let mut selector = RandomPerkSelector { rng: &mut *rng };
            for level_up in add_guild_xp(&mut entity.guild, guild_xp, &mut selector) {
                report.events.push(TickEvent::GuildLevelUp(level_up));
            }
            report.guild_xp = guild_xp;
        }

        let day = now.div_euclid(86_400);
        if day > entity.guild.last_bounty_day {
            entity.guild.last_bounty_day = day;
            generate_daily_bounties(&mut entity.guild, rng);
            report.events.push(TickEvent::BountiesRefreshed {
                count: entity.guild.bounties.len(),
            });
        }

        report.state_changed = !report.events.is_empty() || report.echoes_gained > 0.0;
        debug!(
            "tick delta={:.3}s events={} echoes=+{:.3}",
            delta,
            report.events.len(),
            report.echoes_gained
        );
        report
    }
}
