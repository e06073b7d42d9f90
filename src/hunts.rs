//! Hunt simulation.
//!
//! Converts elapsed time and team DPS into kills, unclaimed gold,
//! probabilistic item drops, and a guild XP trickle. A tick that would
//! produce zero whole kills mutates nothing at all, which makes the pass
//! idempotent under zero or tiny deltas and avoids timestamp churn.

use crate::catalog::{Catalog, LootEntry};
use crate::combat::team_dps;
use crate::constants::{
    BUFF_DOUBLE_MULTIPLIER, FALLBACK_GOLD_PER_KILL, HUNT_DROP_CHANCE_CAP,
    HUNT_DROP_CHANCE_PER_KILL, HUNT_DROP_QUANTITY_SCALE, HUNT_GOLD_TAX,
    HUNT_GUILD_XP_KILL_DIVISOR, HUNT_KILL_DPS_DIVISOR, PERK_BONUS_PERCENT,
};
use crate::entity::{ActiveHunt, BuffKind, Entity};
use crate::guild::GuildPerk;
use log::warn;
use rand::Rng;
use uuid::Uuid;

/// Why a hunt could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntError {
    NoMembers,
    UnknownMember(Uuid),
    MemberBusy(Uuid),
    AlreadyHunting(String),
}

/// One observable effect of a hunt pass.
#[derive(Debug, Clone, PartialEq)]
pub enum HuntEvent {
    KillsRecorded {
        enemy_id: String,
        new_kills: u64,
        gold: u64,
    },
    ItemDropped {
        enemy_id: String,
        item_id: String,
        quantity: u32,
    },
}

/// Everything a hunt pass produced. Guild XP is returned rather than
/// applied so the caller controls perk selection on level-up.
#[derive(Debug, Default, Clone)]
pub struct HuntOutcome {
    pub events: Vec<HuntEvent>,
    pub guild_xp: u64,
}

/// Starts a passive hunt against `enemy_id` with the given members.
///
/// Members on an expedition cannot be assigned. An unknown enemy id is
/// accepted on purpose: the processing pass degrades it to conservative
/// defaults rather than failing the assignment.
pub fn start_hunt(
    entity: &mut Entity,
    enemy_id: &str,
    member_ids: &[Uuid],
    now: i64,
) -> Result<(), HuntError> {
    if member_ids.is_empty() {
        return Err(HuntError::NoMembers);
    }
    if entity.hunts.iter().any(|h| h.enemy_id == enemy_id) {
        return Err(HuntError::AlreadyHunting(enemy_id.to_string()));
    }
    for id in member_ids {
        match entity.member(id) {
            None => return Err(HuntError::UnknownMember(*id)),
            Some(m) if m.busy => return Err(HuntError::MemberBusy(*id)),
            Some(_) => {}
        }
    }

    entity.hunts.push(ActiveHunt {
        enemy_id: enemy_id.to_string(),
        member_ids: member_ids.to_vec(),
        kills: 0,
        last_updated: now,
    });
    Ok(())
}

/// Stops the hunt against `enemy_id`. Immediate and unconditional;
/// returns false if no such hunt was active.
pub fn stop_hunt(entity: &mut Entity, enemy_id: &str) -> bool {
    let before = entity.hunts.len();
    entity.hunts.retain(|h| h.enemy_id != enemy_id);
    entity.hunts.len() != before
}

/// Processes every active hunt for `delta` elapsed seconds.
pub fn process_hunts(
    entity: &mut Entity,
    catalog: &impl Catalog,
    delta: f64,
    now: i64,
    rng: &mut impl Rng,
) -> HuntOutcome {
    let mut outcome = HuntOutcome::default();
    if delta <= 0.0 || entity.hunts.is_empty() {
        return outcome;
    }

    let double_gold = entity.buff_active(BuffKind::DoubleGold, now);
    let double_xp = entity.buff_active(BuffKind::DoubleXp, now);
    let gold_perk = entity.guild.has_perk(GuildPerk::HuntersFervor);

    // Take the hunt list out so the entity can be mutated per hunt.
    let mut hunts = std::mem::take(&mut entity.hunts);

    for hunt in &mut hunts {
        let members: Vec<_> = hunt
            .member_ids
            .iter()
            .filter_map(|id| entity.member(id))
            .collect();
        let dps = team_dps(&members, &hunt.enemy_id);

        let kills_per_second = dps / HUNT_KILL_DPS_DIVISOR;
        let new_kills = (kills_per_second * delta).floor() as u64;
        if new_kills == 0 {
            continue;
        }

        let (gold_per_kill, xp_per_kill, loot): (u32, f64, &[LootEntry]) =
            match catalog.enemy(&hunt.enemy_id) {
                Some(enemy) => (enemy.gold_per_kill, enemy.xp_per_kill, &enemy.loot),
                None => {
                    warn!(
                        "hunt references unknown enemy '{}', using fallback rewards",
                        hunt.enemy_id
                    );
                    (FALLBACK_GOLD_PER_KILL, 0.0, &[])
                }
            };

        hunt.kills = hunt.kills.saturating_add(new_kills);
        hunt.last_updated = now;
        entity.record_kills(&hunt.enemy_id, new_kills);

        // Economy tax: 40% of the listed gold per kill, floor 1
        let adjusted = ((gold_per_kill as f64 * HUNT_GOLD_TAX).round() as u64).max(1);
        let mut gold = new_kills * adjusted;
        if double_gold {
            gold = (gold as f64 * BUFF_DOUBLE_MULTIPLIER) as u64;
        }
        if gold_perk {
            gold = (gold as f64 * (1.0 + PERK_BONUS_PERCENT)) as u64;
        }
        entity.unclaimed_gold = entity.unclaimed_gold.saturating_add(gold);

        outcome.events.push(HuntEvent::KillsRecorded {
            enemy_id: hunt.enemy_id.clone(),
            new_kills,
            gold,
        });

        for entry in loot {
            let chance =
                (new_kills as f64 * HUNT_DROP_CHANCE_PER_KILL).min(HUNT_DROP_CHANCE_CAP)
                    * entry.rate;
            if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
                continue;
            }
            let rolled = rng.gen_range(entry.min_quantity..=entry.max_quantity);
            let quantity = ((rolled as f64 * HUNT_DROP_QUANTITY_SCALE).floor() as u32).max(1);
            entity.add_unclaimed_item(&entry.item_id, quantity);
            outcome.events.push(HuntEvent::ItemDropped {
                enemy_id: hunt.enemy_id.clone(),
                item_id: entry.item_id.clone(),
                quantity,
            });
        }

        let mut xp =
            new_kills / HUNT_GUILD_XP_KILL_DIVISOR + (new_kills as f64 * xp_per_kill).floor() as u64;
        if double_xp {
            xp = (xp as f64 * BUFF_DOUBLE_MULTIPLIER) as u64;
        }
        outcome.guild_xp += xp;
    }

    entity.hunts = hunts;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::entity::{GuildMember, Role};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entity_with_knight() -> (Entity, Uuid) {
        let mut entity = Entity::new("Hunter", 0);
        let id = entity.add_member(GuildMember::new(Role::Knight));
        (entity, id)
    }

    #[test]
    fn test_start_hunt_rejects_busy_and_unknown_members() {
        let (mut entity, knight) = entity_with_knight();
        let stranger = Uuid::new_v4();
        assert_eq!(
            start_hunt(&mut entity, "enemy_goblin", &[stranger], 0),
            Err(HuntError::UnknownMember(stranger))
        );

        entity.member_mut(&knight).unwrap().busy = true;
        assert_eq!(
            start_hunt(&mut entity, "enemy_goblin", &[knight], 0),
            Err(HuntError::MemberBusy(knight))
        );

        entity.member_mut(&knight).unwrap().busy = false;
        assert!(start_hunt(&mut entity, "enemy_goblin", &[knight], 0).is_ok());
        assert_eq!(
            start_hunt(&mut entity, "enemy_goblin", &[knight], 0),
            Err(HuntError::AlreadyHunting("enemy_goblin".to_string()))
        );
    }

    #[test]
    fn test_start_hunt_requires_members() {
        let mut entity = Entity::new("Hunter", 0);
        assert_eq!(
            start_hunt(&mut entity, "enemy_goblin", &[], 0),
            Err(HuntError::NoMembers)
        );
    }

    #[test]
    fn test_zero_delta_mutates_nothing() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let before = entity.clone();
        let outcome = process_hunts(&mut entity, &catalog, 0.0, 100, &mut rng);

        assert!(outcome.events.is_empty());
        assert_eq!(outcome.guild_xp, 0);
        assert_eq!(entity.hunts[0].kills, before.hunts[0].kills);
        assert_eq!(entity.hunts[0].last_updated, before.hunts[0].last_updated);
        assert_eq!(entity.unclaimed_gold, before.unclaimed_gold);
    }

    #[test]
    fn test_sub_kill_delta_skips_timestamp_update() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        // knight L1 vs goblin: 10 * 1.25 / 10 = 1.25 kills/s; 0.5s -> 0 kills
        process_hunts(&mut entity, &catalog, 0.5, 100, &mut rng);
        assert_eq!(entity.hunts[0].kills, 0);
        assert_eq!(entity.hunts[0].last_updated, 0);
    }

    #[test]
    fn test_kills_are_monotone_across_ticks() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut previous = 0;
        for tick in 1..=50 {
            process_hunts(&mut entity, &catalog, 2.0, tick * 2, &mut rng);
            assert!(entity.hunts[0].kills >= previous);
            previous = entity.hunts[0].kills;
        }
        assert!(previous > 0);
    }

    #[test]
    fn test_unknown_enemy_uses_fallback_rewards() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_mystery", &[knight], 0).unwrap();
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // 10 DPS (neutral multiplier) -> 1 kill/s; 10s -> 10 kills
        let outcome = process_hunts(&mut entity, &catalog, 10.0, 10, &mut rng);

        // fallback gold 5 -> round(5*0.4) = 2 per kill
        assert_eq!(entity.unclaimed_gold, 20);
        assert_eq!(entity.kill_tally["enemy_mystery"], 10);
        // fallback loot table is empty
        assert!(entity.unclaimed_items.is_empty());
        assert!(outcome
            .events
            .iter()
            .all(|e| matches!(e, HuntEvent::KillsRecorded { .. })));
    }

    #[test]
    fn test_double_gold_buff_doubles_hunt_gold() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_mystery", &[knight], 0).unwrap();
        entity.grant_buff(BuffKind::DoubleGold, 1000, 0);
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        process_hunts(&mut entity, &catalog, 10.0, 10, &mut rng);
        assert_eq!(entity.unclaimed_gold, 40);
    }

    #[test]
    fn test_stop_hunt_is_immediate() {
        let (mut entity, knight) = entity_with_knight();
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        assert!(stop_hunt(&mut entity, "enemy_goblin"));
        assert!(!stop_hunt(&mut entity, "enemy_goblin"));
        assert!(entity.hunts.is_empty());
    }

    #[test]
    fn test_drops_only_come_from_loot_table() {
        let (mut entity, knight) = entity_with_knight();
        entity.member_mut(&knight).unwrap().level = 10;
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        let catalog = StaticCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for tick in 1..=200 {
            process_hunts(&mut entity, &catalog, 5.0, tick * 5, &mut rng);
        }

        // Goblins only ever drop goblin ears
        for item_id in entity.unclaimed_items.keys() {
            assert_eq!(item_id, "item_goblin_ear");
        }
        assert!(
            !entity.unclaimed_items.is_empty(),
            "200 high-DPS ticks should land at least one drop"
        );
    }
}
