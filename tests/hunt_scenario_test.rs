//! Balance-locking scenario tests for the hunt simulation.
//!
//! These pin the exact arithmetic the economy depends on: the DPS-to-kill
//! conversion, the 40% gold tax with its floor of 1, and the guild XP
//! trickle. Randomized drops are exercised with a seeded generator and
//! distribution-level assertions.

use guildhall::combat::{combat_dps, team_dps};
use guildhall::entity::{Entity, GuildMember, Role};
use guildhall::hunts::{process_hunts, start_hunt};
use guildhall::StaticCatalog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn entity_with_member(role: Role, level: u32) -> (Entity, uuid::Uuid) {
    let mut entity = Entity::new("Scenario", 0);
    let mut member = GuildMember::new(role);
    member.level = level;
    let id = entity.add_member(member);
    (entity, id)
}

#[test]
fn test_level_one_knight_hunting_goblins_for_100_seconds() {
    let (mut entity, knight) = entity_with_member(Role::Knight, 1);
    let catalog = StaticCatalog::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();

    let dps = combat_dps(entity.member(&knight).unwrap());
    assert!((dps - 10.0).abs() < 1e-9);

    // kills/s = D * 1.25 / 10 = 1.25; 100s -> floor(125) kills
    let outcome = process_hunts(&mut entity, &catalog, 100.0, 100, &mut rng);

    assert_eq!(entity.hunts[0].kills, 125);
    assert_eq!(entity.kill_tally["enemy_goblin"], 125);
    assert_eq!(entity.hunts[0].last_updated, 100);

    // Goblin base gold 3 -> max(1, round(3*0.4)) = 1 per kill
    assert_eq!(entity.unclaimed_gold, 125);

    // Guild XP: floor(125/25) + floor(125 * 0.04) = 5 + 5
    assert_eq!(outcome.guild_xp, 10);
}

#[test]
fn test_team_dps_matches_hand_computation() {
    let mut entity = Entity::new("Scenario", 0);
    let mut knight = GuildMember::new(Role::Knight);
    knight.level = 2;
    let mut cleric = GuildMember::new(Role::Cleric);
    cleric.level = 1;
    let k = entity.add_member(knight);
    let c = entity.add_member(cleric);

    let members = [entity.member(&k).unwrap(), entity.member(&c).unwrap()];
    // knight L2: 10*1.15*1.25 = 14.375; cleric: 5*1.0 = 5
    // total 19.375 * (1 + 0.10*1) = 21.3125
    let dps = team_dps(&members, "enemy_goblin");
    assert!((dps - 21.3125).abs() < 1e-9, "got {}", dps);
}

#[test]
fn test_gold_tax_floor_of_one_for_cheap_enemies() {
    // Goblin gold 3: round(1.2) = 1; everything pays at least 1
    let (mut entity, knight) = entity_with_member(Role::Knight, 1);
    let catalog = StaticCatalog::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
    process_hunts(&mut entity, &catalog, 8.0, 8, &mut rng);

    // 1.25 kills/s * 8s = 10 kills, 1 gold each
    assert_eq!(entity.unclaimed_gold, 10);
}

#[test]
fn test_same_seed_same_drops() {
    let catalog = StaticCatalog::with_defaults();

    let run = |seed: u64| {
        let (mut entity, knight) = entity_with_member(Role::Knight, 10);
        start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for tick in 1..=100 {
            process_hunts(&mut entity, &catalog, 5.0, tick * 5, &mut rng);
        }
        entity.unclaimed_items
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn test_drop_rate_is_plausible_over_many_ticks() {
    let (mut entity, knight) = entity_with_member(Role::Knight, 10);
    let catalog = StaticCatalog::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();

    let mut drop_ticks = 0u32;
    let ticks = 1000;
    for tick in 1..=ticks {
        let before: u32 = entity.unclaimed_items.values().sum();
        process_hunts(&mut entity, &catalog, 5.0, tick * 5, &mut rng);
        let after: u32 = entity.unclaimed_items.values().sum();
        if after > before {
            drop_ticks += 1;
        }
    }

    // Per-tick chance is capped at 0.35 * 0.6 = 0.21; expect roughly
    // 210/1000 with generous slack for variance
    assert!(
        (120..=300).contains(&drop_ticks),
        "drop ticks out of plausible band: {}",
        drop_ticks
    );
}

#[test]
fn test_unclaimed_quantities_never_negative_or_zero() {
    let (mut entity, knight) = entity_with_member(Role::Knight, 10);
    let catalog = StaticCatalog::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    start_hunt(&mut entity, "enemy_goblin", &[knight], 0).unwrap();
    for tick in 1..=500 {
        process_hunts(&mut entity, &catalog, 3.0, tick * 3, &mut rng);
    }

    for (item_id, quantity) in &entity.unclaimed_items {
        assert!(*quantity > 0, "{} stored with zero quantity", item_id);
    }
}
