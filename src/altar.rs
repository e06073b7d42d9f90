//! Idle accrual engine — the altar.
//!
//! Echoes, gold, runes, and willpower accrue continuously at rates derived
//! purely from upgrade levels and active buffs. All accrual is linear in
//! elapsed time: one call for `3*dt` equals three calls for `dt`, which is
//! what makes offline catch-up a single batched update. Integer counters
//! go through fractional carries so the linearity survives flooring.
//!
//! Upgrade costs are pure functions of the current level
//! (`base * growth^level`), strictly increasing, so the UI can price the
//! next upgrade without touching any hidden state.

use crate::constants::{
    ALTAR_COST_BASE, ALTAR_COST_GROWTH, AMPLIFIER_BONUS_PER_LEVEL, AMPLIFIER_COST_BASE,
    AMPLIFIER_COST_GROWTH, BASE_ECHO_RATE, BUFF_DOUBLE_MULTIPLIER, ECHO_BOOST_MULTIPLIER,
    GOLD_GEN_COST_BASE, GOLD_GEN_COST_GROWTH, GOLD_GEN_RATE_PER_LEVEL, PERK_BONUS_PERCENT,
    RUNE_GEN_COST_BASE, RUNE_GEN_COST_GROWTH, RUNE_GEN_RATE_PER_LEVEL, WILLPOWER_SURGE_RATE,
};
use crate::entity::{BuffKind, Entity};
use crate::guild::GuildPerk;
use serde::{Deserialize, Serialize};

/// Altar upgrade levels. The echo balance itself lives on the entity.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AltarState {
    pub attunement_level: u32,
    pub amplifier_level: u32,
    pub gold_gen_level: u32,
    pub rune_gen_level: u32,
}

/// What one accrual pass generated.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccrualSummary {
    pub echoes: f64,
    pub gold: u64,
    pub runes: u64,
    pub willpower: u64,
}

pub fn altar_upgrade_cost(level: u32) -> f64 {
    ALTAR_COST_BASE * ALTAR_COST_GROWTH.powi(level as i32)
}

pub fn amplifier_upgrade_cost(level: u32) -> f64 {
    AMPLIFIER_COST_BASE * AMPLIFIER_COST_GROWTH.powi(level as i32)
}

pub fn gold_gen_upgrade_cost(level: u32) -> f64 {
    GOLD_GEN_COST_BASE * GOLD_GEN_COST_GROWTH.powi(level as i32)
}

pub fn rune_gen_upgrade_cost(level: u32) -> f64 {
    RUNE_GEN_COST_BASE * RUNE_GEN_COST_GROWTH.powi(level as i32)
}

/// Echoes per second for the current altar levels and buff state.
pub fn echo_rate(entity: &Entity, now: i64) -> f64 {
    let altar = &entity.altar;
    let mut rate = BASE_ECHO_RATE
        * (1.0 + altar.attunement_level as f64)
        * (1.0 + AMPLIFIER_BONUS_PER_LEVEL * altar.amplifier_level as f64);
    if entity.buff_active(BuffKind::EchoBoost, now) {
        rate *= ECHO_BOOST_MULTIPLIER;
    }
    if entity.guild.has_perk(GuildPerk::EchoAttunement) {
        rate *= 1.0 + PERK_BONUS_PERCENT;
    }
    rate
}

/// Passive gold per second from the altar's gold generation level.
pub fn gold_rate(entity: &Entity, now: i64) -> f64 {
    let mut rate = GOLD_GEN_RATE_PER_LEVEL * entity.altar.gold_gen_level as f64;
    if entity.buff_active(BuffKind::DoubleGold, now) {
        rate *= BUFF_DOUBLE_MULTIPLIER;
    }
    rate
}

/// Passive runes per second from the altar's rune generation level.
pub fn rune_rate(entity: &Entity, now: i64) -> f64 {
    let mut rate = RUNE_GEN_RATE_PER_LEVEL * entity.altar.rune_gen_level as f64;
    if entity.buff_active(BuffKind::RuneBoost, now) {
        rate *= BUFF_DOUBLE_MULTIPLIER;
    }
    rate
}

/// Willpower only flows while a surge buff is active.
pub fn willpower_rate(entity: &Entity, now: i64) -> f64 {
    if entity.buff_active(BuffKind::WillpowerSurge, now) {
        WILLPOWER_SURGE_RATE
    } else {
        0.0
    }
}

/// Advances a fractional carry and returns the whole units to credit.
fn accrue_whole(carry: &mut f64, rate: f64, delta: f64) -> u64 {
    *carry += rate * delta;
    let whole = carry.floor();
    *carry -= whole;
    whole as u64
}

/// Applies `delta` elapsed seconds of continuous generation.
pub fn process_accrual(entity: &mut Entity, delta: f64, now: i64) -> AccrualSummary {
    let mut summary = AccrualSummary::default();
    if delta <= 0.0 {
        return summary;
    }

    summary.echoes = echo_rate(entity, now) * delta;
    entity.echoes += summary.echoes;

    let gold_rate = gold_rate(entity, now);
    let rune_rate = rune_rate(entity, now);
    let will_rate = willpower_rate(entity, now);

    summary.gold = accrue_whole(&mut entity.gold_carry, gold_rate, delta);
    entity.gold = entity.gold.saturating_add(summary.gold);

    summary.runes = accrue_whole(&mut entity.rune_carry, rune_rate, delta);
    entity.runes = entity.runes.saturating_add(summary.runes);

    summary.willpower = accrue_whole(&mut entity.willpower_carry, will_rate, delta);
    entity.willpower = entity.willpower.saturating_add(summary.willpower);

    summary
}

fn try_spend_echoes(entity: &mut Entity, cost: f64) -> bool {
    if entity.echoes < cost {
        return false;
    }
    entity.echoes = (entity.echoes - cost).max(0.0);
    true
}

/// Raises the attunement level if the echo balance covers the cost.
pub fn upgrade_altar(entity: &mut Entity) -> bool {
    let cost = altar_upgrade_cost(entity.altar.attunement_level);
    if !try_spend_echoes(entity, cost) {
        return false;
    }
    entity.altar.attunement_level += 1;
    true
}

pub fn upgrade_echo_multiplier(entity: &mut Entity) -> bool {
    let cost = amplifier_upgrade_cost(entity.altar.amplifier_level);
    if !try_spend_echoes(entity, cost) {
        return false;
    }
    entity.altar.amplifier_level += 1;
    true
}

pub fn upgrade_gold_generation(entity: &mut Entity) -> bool {
    let cost = gold_gen_upgrade_cost(entity.altar.gold_gen_level);
    if !try_spend_echoes(entity, cost) {
        return false;
    }
    entity.altar.gold_gen_level += 1;
    true
}

pub fn upgrade_rune_generation(entity: &mut Entity) -> bool {
    let cost = rune_gen_upgrade_cost(entity.altar.rune_gen_level);
    if !try_spend_echoes(entity, cost) {
        return false;
    }
    entity.altar.rune_gen_level += 1;
    true
}
