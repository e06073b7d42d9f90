//! Expedition simulation.
//!
//! Expeditions commit members for a fixed duration and pay a lump-sum,
//! fully deterministic reward on completion — the probabilistic side of
//! the economy lives in `hunts`. Completion is computed from stored
//! timestamps against "now", so expeditions finish correctly no matter
//! how irregularly the host ticks.

use crate::catalog::Catalog;
use crate::constants::{
    EXPEDITION_BASE_GOLD, EXPEDITION_GOLD_PER_MEMBER, EXPEDITION_GOLD_XP_DIVISOR,
    PERK_BONUS_PERCENT,
};
use crate::entity::{ActiveExpedition, Entity, Role};
use crate::guild::GuildPerk;
use log::warn;
use uuid::Uuid;

/// Why an expedition launch was rejected. Rejection never mutates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpeditionError {
    UnknownExpedition(String),
    UnknownMember(Uuid),
    MemberBusy(Uuid),
    InsufficientMembers { required: usize, committed: usize },
    MissingRole(Role),
}

/// A finished expedition's payout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpeditionCompletion {
    pub expedition_id: String,
    pub gold: u64,
    pub guild_xp: u64,
    pub members_freed: usize,
}

/// Launches an expedition, committing the given members.
///
/// The constraints are re-verified here even when a caller has already
/// checked them: count >= the definition's minimum, every required role
/// present, every member known and idle. On success all members are
/// marked busy and the record is created atomically.
pub fn launch_expedition(
    entity: &mut Entity,
    catalog: &impl Catalog,
    expedition_id: &str,
    member_ids: &[Uuid],
    now: i64,
) -> Result<(), ExpeditionError> {
    let definition = catalog
        .expedition(expedition_id)
        .ok_or_else(|| ExpeditionError::UnknownExpedition(expedition_id.to_string()))?;

    if member_ids.len() < definition.min_members {
        return Err(ExpeditionError::InsufficientMembers {
            required: definition.min_members,
            committed: member_ids.len(),
        });
    }

    for id in member_ids {
        match entity.member(id) {
            None => return Err(ExpeditionError::UnknownMember(*id)),
            Some(m) if m.busy => return Err(ExpeditionError::MemberBusy(*id)),
            Some(_) => {}
        }
    }

    for role in &definition.required_roles {
        let covered = member_ids
            .iter()
            .filter_map(|id| entity.member(id))
            .any(|m| m.role == *role);
        if !covered {
            return Err(ExpeditionError::MissingRole(*role));
        }
    }

    for id in member_ids {
        if let Some(member) = entity.member_mut(id) {
            member.busy = true;
        }
    }
    entity.expeditions.push(ActiveExpedition {
        expedition_id: expedition_id.to_string(),
        member_ids: member_ids.to_vec(),
        started_at: now,
    });
    Ok(())
}

/// Completes every expedition whose duration has elapsed.
///
/// Each completion pays gold (`50 + xp/10` base plus 25 per member),
/// deterministic loot straight into the inventory, splits the XP reward
/// across the party as member experience, frees the members, and removes
/// the record — all in one pass. Guild XP is reported to the caller.
pub fn check_completed_expeditions(
    entity: &mut Entity,
    catalog: &impl Catalog,
    now: i64,
) -> Vec<ExpeditionCompletion> {
    let mut completions = Vec::new();
    let mut remaining = Vec::with_capacity(entity.expeditions.len());

    let haste = entity.guild.has_perk(GuildPerk::SwiftCaravans);
    let ledger = entity.guild.has_perk(GuildPerk::QuartermastersLedger);

    for expedition in std::mem::take(&mut entity.expeditions) {
        let Some(definition) = catalog.expedition(&expedition.expedition_id) else {
            // Unknown definitions are the cleanup sweep's job
            remaining.push(expedition);
            continue;
        };

        let mut duration = definition.duration_seconds;
        if haste {
            duration = (duration as f64 * (1.0 - PERK_BONUS_PERCENT)) as i64;
        }
        if now < expedition.started_at + duration {
            remaining.push(expedition);
            continue;
        }

        let member_count = expedition.member_ids.len();
        let base_gold = EXPEDITION_BASE_GOLD + definition.xp_reward / EXPEDITION_GOLD_XP_DIVISOR;
        let mut gold = base_gold + member_count as u64 * EXPEDITION_GOLD_PER_MEMBER;
        if ledger {
            gold = (gold as f64 * (1.0 + PERK_BONUS_PERCENT)) as u64;
        }
        entity.add_gold(gold);

        for (item_id, quantity) in &definition.loot {
            entity.add_inventory_item(item_id, *quantity);
        }

        let xp_share = if member_count > 0 {
            definition.xp_reward / member_count as u64
        } else {
            0
        };
        for id in &expedition.member_ids {
            if let Some(member) = entity.members.get_mut(id) {
                member.busy = false;
                member.experience = member.experience.saturating_add(xp_share);
            }
        }

        completions.push(ExpeditionCompletion {
            expedition_id: expedition.expedition_id.clone(),
            gold,
            guild_xp: definition.xp_reward,
            members_freed: member_count,
        });
    }

    entity.expeditions = remaining;
    completions
}

/// Defensive consistency sweep: any active expedition referencing an
/// unknown definition is treated as corrupt — its members are freed and
/// the record dropped. Idempotent and safe to run every tick.
pub fn cleanup_invalid_expeditions(entity: &mut Entity, catalog: &impl Catalog) -> usize {
    let mut freed_ids = Vec::new();
    let mut removed = 0;

    entity.expeditions.retain(|expedition| {
        if catalog.expedition(&expedition.expedition_id).is_some() {
            return true;
        }
        warn!(
            "discarding expedition with unknown definition '{}'",
            expedition.expedition_id
        );
        freed_ids.extend(expedition.member_ids.iter().copied());
        removed += 1;
        false
    });

    for id in freed_ids {
        if let Some(member) = entity.members.get_mut(&id) {
            member.busy = false;
        }
    }
    removed
}
