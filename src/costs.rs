//! Scaling cost functions and roster operations.
//!
//! The curves are standalone pure functions so balance tests can assert
//! exact values without touching any state: hiring scales 1.5x per member
//! already holding the role, member upgrades double per level with a
//! per-role premium.

use crate::constants::{HIRE_COST_GROWTH, MEMBER_UPGRADE_COST_BASE, MEMBER_UPGRADE_COST_GROWTH};
use crate::entity::{Entity, GuildMember, Role};
use uuid::Uuid;

/// Gold to hire the first member of a role.
pub fn base_hire_cost(role: Role) -> u64 {
    match role {
        Role::Knight => 100,
        Role::Archer => 120,
        Role::Wizard => 150,
        Role::Rogue => 130,
        Role::Cleric => 140,
        Role::Forager => 60,
        Role::Gardener => 70,
        Role::Alchemist => 160,
        Role::Seer => 180,
        Role::Blacksmith => 110,
        Role::Leatherworker => 90,
        Role::Spinner => 80,
        Role::Weaver => 100,
    }
}

/// Per-role premium on upgrade costs.
pub fn role_cost_multiplier(role: Role) -> f64 {
    match role {
        Role::Wizard | Role::Seer => 1.5,
        Role::Alchemist | Role::Cleric => 1.3,
        Role::Knight | Role::Archer | Role::Rogue | Role::Blacksmith => 1.2,
        _ => 1.0,
    }
}

/// Gold to hire another member of `role` when `existing_count` are
/// already on the roster: `base * 1.5^existing_count`.
pub fn hire_cost(role: Role, existing_count: usize) -> u64 {
    (base_hire_cost(role) as f64 * HIRE_COST_GROWTH.powi(existing_count as i32)).round() as u64
}

/// Gold to raise a member from `level` to `level + 1`:
/// `base * 2^(level-1) * role_multiplier`.
pub fn member_upgrade_cost(level: u32, role: Role) -> u64 {
    let level = level.max(1);
    (MEMBER_UPGRADE_COST_BASE
        * MEMBER_UPGRADE_COST_GROWTH.powi((level - 1) as i32)
        * role_cost_multiplier(role))
    .round() as u64
}

/// Why a roster operation failed. Failure never mutates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    InsufficientGold { cost: u64, balance: u64 },
    UnknownMember(Uuid),
}

/// Hires a new level-1 member of `role`, paying the scaled cost.
pub fn hire_member(entity: &mut Entity, role: Role) -> Result<Uuid, RosterError> {
    let cost = hire_cost(role, entity.role_count(role));
    if !entity.spend_gold(cost) {
        return Err(RosterError::InsufficientGold {
            cost,
            balance: entity.gold,
        });
    }
    Ok(entity.add_member(GuildMember::new(role)))
}

/// Raises a member one level, paying the scaled cost. Busy members can
/// still be trained. Returns the new level.
pub fn upgrade_member(entity: &mut Entity, member_id: &Uuid) -> Result<u32, RosterError> {
    let (level, role) = match entity.member(member_id) {
        Some(m) => (m.level, m.role),
        None => return Err(RosterError::UnknownMember(*member_id)),
    };

    let cost = member_upgrade_cost(level, role);
    if !entity.spend_gold(cost) {
        return Err(RosterError::InsufficientGold {
            cost,
            balance: entity.gold,
        });
    }

    let member = entity
        .member_mut(member_id)
        .expect("member existed moments ago");
    member.level += 1;
    Ok(member.level)
}
