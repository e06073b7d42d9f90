//! Crafting/production simulation.
//!
//! Each production role converts worker-time into whole units through a
//! fractional accumulator. The remainder is carried across ticks, so no
//! work is ever lost to polling granularity — accruing 600 seconds in one
//! call produces exactly what 600 one-second calls would.

use crate::constants::{CRAFT_LEVEL_SPEED_FACTOR, CRAFT_MIN_SECONDS_PER_UNIT, PERK_BONUS_PERCENT};
use crate::entity::{Entity, Role};
use crate::guild::GuildPerk;

/// Fixed production table: (producer role, item id, base seconds per unit
/// at level 1). Higher worker levels shorten the effective time, floored
/// at [`CRAFT_MIN_SECONDS_PER_UNIT`].
pub const PRODUCTION_TABLE: &[(Role, &str, f64)] = &[
    (Role::Forager, "item_herb_bundle", 120.0),
    (Role::Gardener, "item_vegetable_crate", 240.0),
    (Role::Alchemist, "item_healing_draught", 600.0),
    (Role::Seer, "item_scrying_rune", 900.0),
    (Role::Blacksmith, "item_iron_ingot", 450.0),
    (Role::Leatherworker, "item_cured_leather", 300.0),
    (Role::Spinner, "item_spool_of_thread", 200.0),
    (Role::Weaver, "item_bolt_of_cloth", 350.0),
];

/// Units produced during one crafting pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftEvent {
    pub role: Role,
    pub item_id: String,
    pub units: u32,
}

/// Effective seconds per unit for a single worker at `level`.
pub fn seconds_per_unit(base_seconds: f64, level: u32) -> f64 {
    let level = level.max(1);
    (base_seconds / (1.0 + CRAFT_LEVEL_SPEED_FACTOR * (level - 1) as f64))
        .max(CRAFT_MIN_SECONDS_PER_UNIT)
}

/// Advances every production line by `delta` elapsed seconds. Workers on
/// an expedition are committed elsewhere and produce nothing.
pub fn process_crafting(entity: &mut Entity, delta: f64) -> Vec<CraftEvent> {
    let mut events = Vec::new();
    if delta <= 0.0 {
        return events;
    }

    let speed_perk = entity.guild.has_perk(GuildPerk::MasterworkTools);

    for (role, item_id, base_seconds) in PRODUCTION_TABLE {
        let mut items_per_second: f64 = entity
            .members
            .values()
            .filter(|m| m.role == *role && !m.busy)
            .map(|m| 1.0 / seconds_per_unit(*base_seconds, m.level))
            .sum();
        if items_per_second == 0.0 {
            continue;
        }
        if speed_perk {
            items_per_second *= 1.0 + PERK_BONUS_PERCENT;
        }

        let progress = entity.craft_progress.entry(*role).or_insert(0.0);
        *progress += items_per_second * delta;

        let produced = progress.floor();
        if produced >= 1.0 {
            *progress -= produced;
            let units = produced as u32;
            entity.add_unclaimed_item(item_id, units);
            events.push(CraftEvent {
                role: *role,
                item_id: item_id.to_string(),
                units,
            });
        }
    }
    events
}
