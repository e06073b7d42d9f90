//! Combat power model.
//!
//! Pure functions only: a member's damage-per-second from role and level,
//! rock-paper-scissors matchup multipliers per enemy, and the aggregate
//! team DPS with the cleric support buff. No side effects anywhere here —
//! the hunt simulation owns all mutation.

use crate::constants::{CLERIC_TEAM_BUFF_PER_LEVEL, DPS_PER_LEVEL_FACTOR};
use crate::entity::{GuildMember, Role};

/// Base DPS at level 1. Production roles can technically fight, badly.
fn base_dps(role: Role) -> f64 {
    match role {
        Role::Knight => 10.0,
        Role::Archer => 12.0,
        Role::Wizard => 15.0,
        Role::Rogue => 13.0,
        Role::Cleric => 5.0,
        _ => 2.0,
    }
}

/// A member's damage per second: monotonically increasing in level.
pub fn combat_dps(member: &GuildMember) -> f64 {
    let level = member.level.max(1);
    base_dps(member.role) * (1.0 + DPS_PER_LEVEL_FACTOR * (level - 1) as f64)
}

/// Matchup multiplier for a role against an enemy type. Unknown enemies
/// fall back to 1.0 across the board.
pub fn role_multiplier(role: Role, enemy_id: &str) -> f64 {
    match enemy_id {
        "enemy_goblin" => match role {
            Role::Knight => 1.25,
            Role::Rogue => 1.2,
            Role::Archer => 1.1,
            _ => 1.0,
        },
        "enemy_skeleton" => match role {
            // Arrows pass between the ribs
            Role::Archer => 0.6,
            Role::Knight => 1.3,
            Role::Wizard => 1.1,
            _ => 1.0,
        },
        "enemy_wraith" => match role {
            Role::Wizard => 1.5,
            Role::Cleric => 1.4,
            Role::Rogue => 0.8,
            _ => 1.0,
        },
        "enemy_dire_wolf" => match role {
            Role::Archer => 1.3,
            Role::Knight => 1.1,
            _ => 1.0,
        },
        _ => 1.0,
    }
}

/// Aggregate team DPS against an enemy: sum of each member's DPS times
/// their matchup multiplier, scaled by `1 + 0.10 * sum(cleric levels)`.
/// An empty team deals 0 DPS.
pub fn team_dps(members: &[&GuildMember], enemy_id: &str) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let raw: f64 = members
        .iter()
        .map(|m| combat_dps(m) * role_multiplier(m.role, enemy_id))
        .sum();

    let cleric_levels: u32 = members
        .iter()
        .filter(|m| m.role == Role::Cleric)
        .map(|m| m.level)
        .sum();

    raw * (1.0 + CLERIC_TEAM_BUFF_PER_LEVEL * cleric_levels as f64)
}
