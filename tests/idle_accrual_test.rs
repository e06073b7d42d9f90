//! Idle-accrual properties: linearity in elapsed time, the offline
//! catch-up batch with its seven-day cap, and double-count prevention
//! across repeated resumes.

use guildhall::altar::process_accrual;
use guildhall::constants::MAX_OFFLINE_SECONDS;
use guildhall::engine::GuildEngine;
use guildhall::entity::{BuffKind, Entity};
use guildhall::{ManualClock, StaticCatalog};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn engine_at(seconds: i64) -> GuildEngine<StaticCatalog, ManualClock> {
    GuildEngine::new(StaticCatalog::with_defaults(), ManualClock::new(seconds))
}

#[test]
fn test_accrue_a_plus_b_equals_accrue_a_then_b() {
    for (a, b) in [(1.0, 2.0), (0.1, 49.9), (3600.0, 0.5), (7.25, 7.25)] {
        let mut combined = Entity::new("Linear", 0);
        combined.altar.attunement_level = 2;
        combined.altar.amplifier_level = 1;
        combined.altar.gold_gen_level = 4;
        let mut split = combined.clone();

        process_accrual(&mut combined, a + b, 0);
        process_accrual(&mut split, a, 0);
        process_accrual(&mut split, b, 0);

        assert!(
            (combined.echoes - split.echoes).abs() < 1e-9,
            "echoes diverged for ({}, {})",
            a,
            b
        );
        assert_eq!(combined.gold, split.gold, "gold diverged for ({}, {})", a, b);
    }
}

#[test]
fn test_offline_50_seconds_at_base_rate_yields_five_echoes() {
    // Last seen at t=1000, resumed at t=1050
    let mut entity = Entity::new("Idler", 1000);
    let engine = engine_at(1050);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let report = engine.catch_up(&mut entity, &mut rng);

    assert_eq!(report.elapsed_seconds, 50);
    assert_eq!(report.applied_seconds, 50);
    assert!((report.echoes_gained - 5.0).abs() < 1e-9);
    assert!((entity.echoes - 5.0).abs() < 1e-9);
}

#[test]
fn test_offline_catch_up_capped_at_seven_days() {
    let mut entity = Entity::new("Idler", 0);
    let two_weeks = 14 * 24 * 3600;
    let engine = engine_at(two_weeks);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let report = engine.catch_up(&mut entity, &mut rng);
    assert_eq!(report.elapsed_seconds, two_weeks);
    assert_eq!(report.applied_seconds, MAX_OFFLINE_SECONDS);

    // Exactly the capped window's worth of echoes at base rate
    let expected = 0.1 * MAX_OFFLINE_SECONDS as f64;
    assert!((entity.echoes - expected).abs() < 1e-6);
}

#[test]
fn test_catch_up_syncs_timestamp_preventing_double_count() {
    let mut entity = Entity::new("Idler", 0);
    let engine = engine_at(3600);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let first = engine.catch_up(&mut entity, &mut rng);
    assert!(first.echoes_gained > 0.0);
    assert_eq!(entity.last_seen, 3600);

    let second = engine.catch_up(&mut entity, &mut rng);
    assert_eq!(second.elapsed_seconds, 0);
    assert_eq!(second.echoes_gained, 0.0);
}

#[test]
fn test_negative_elapsed_applies_nothing() {
    // Clock moved backwards relative to last_seen
    let mut entity = Entity::new("Idler", 5000);
    let engine = engine_at(4000);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let report = engine.catch_up(&mut entity, &mut rng);
    assert_eq!(report.applied_seconds, 0);
    assert_eq!(entity.echoes, 0.0);
    // Timestamp resynced so the next resume is clean
    assert_eq!(entity.last_seen, 4000);
}

#[test]
fn test_offline_batch_equals_many_small_ticks() {
    let mut batched = Entity::new("Idler", 0);
    batched.altar.attunement_level = 1;
    batched.grant_buff(BuffKind::EchoBoost, 10_000, 0);
    let mut ticked = batched.clone();

    // One 600s batch vs 600 one-second ticks, both fully inside the buff
    process_accrual(&mut batched, 600.0, 100);
    for i in 0..600 {
        process_accrual(&mut ticked, 1.0, 100 + i);
    }

    assert!(
        (batched.echoes - ticked.echoes).abs() < 1e-6,
        "batched {} vs ticked {}",
        batched.echoes,
        ticked.echoes
    );
}
