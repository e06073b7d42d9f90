//! Player-owned progression state.
//!
//! [`Entity`] is the aggregate every simulation pass mutates: currency
//! counters, inventory, the member roster, active hunts and expeditions,
//! timed buffs, crafting accumulators, and the guild. It is the unit of
//! mutual exclusion — a host must serialize all mutations to one entity,
//! while different entities may tick concurrently.

use crate::altar::AltarState;
use crate::guild::Guild;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A guild member's specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    // Combat
    Knight,
    Archer,
    Wizard,
    Rogue,
    Cleric,
    // Gathering / production
    Forager,
    Gardener,
    Alchemist,
    Seer,
    Blacksmith,
    Leatherworker,
    Spinner,
    Weaver,
}

impl Role {
    /// All roles, combat first.
    pub const ALL: [Role; 13] = [
        Role::Knight,
        Role::Archer,
        Role::Wizard,
        Role::Rogue,
        Role::Cleric,
        Role::Forager,
        Role::Gardener,
        Role::Alchemist,
        Role::Seer,
        Role::Blacksmith,
        Role::Leatherworker,
        Role::Spinner,
        Role::Weaver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Knight => "Knight",
            Role::Archer => "Archer",
            Role::Wizard => "Wizard",
            Role::Rogue => "Rogue",
            Role::Cleric => "Cleric",
            Role::Forager => "Forager",
            Role::Gardener => "Gardener",
            Role::Alchemist => "Alchemist",
            Role::Seer => "Seer",
            Role::Blacksmith => "Blacksmith",
            Role::Leatherworker => "Leatherworker",
            Role::Spinner => "Spinner",
            Role::Weaver => "Weaver",
        }
    }

    pub fn is_combat(&self) -> bool {
        matches!(
            self,
            Role::Knight | Role::Archer | Role::Wizard | Role::Rogue | Role::Cleric
        )
    }
}

/// A hired guild member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    pub id: Uuid,
    pub role: Role,
    /// Always >= 1.
    pub level: u32,
    pub experience: u64,
    /// True while committed to exactly one active expedition.
    pub busy: bool,
}

impl GuildMember {
    pub fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            level: 1,
            experience: 0,
            busy: false,
        }
    }
}

/// A long-running passive combat assignment against one enemy type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveHunt {
    pub enemy_id: String,
    pub member_ids: Vec<Uuid>,
    /// Monotonically non-decreasing.
    pub kills: u64,
    pub last_updated: i64,
}

/// A time-boxed task committing members for a fixed duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveExpedition {
    pub expedition_id: String,
    pub member_ids: Vec<Uuid>,
    pub started_at: i64,
}

/// Timed-buff kinds. Magnitudes are fixed constants; only the expiry
/// timestamp is stored per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    DoubleXp,
    DoubleGold,
    RuneBoost,
    EchoBoost,
    WillpowerSurge,
}

impl BuffKind {
    pub const ALL: [BuffKind; 5] = [
        BuffKind::DoubleXp,
        BuffKind::DoubleGold,
        BuffKind::RuneBoost,
        BuffKind::EchoBoost,
        BuffKind::WillpowerSurge,
    ];
}

/// The player aggregate: all mutable progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,

    // Currency counters
    pub gold: u64,
    pub runes: u64,
    pub willpower: u64,
    pub echoes: f64,
    pub unclaimed_gold: u64,

    /// item-id -> quantity, quantities >= 0 by construction.
    pub inventory: HashMap<String, u32>,
    /// Rewards produced by hunts and crafting, waiting to be claimed.
    pub unclaimed_items: HashMap<String, u32>,

    pub members: HashMap<Uuid, GuildMember>,
    pub hunts: Vec<ActiveHunt>,
    pub expeditions: Vec<ActiveExpedition>,

    /// effect-kind -> absolute expiry timestamp. Expired entries are
    /// treated as absent by all consumers and swept each tick.
    pub buffs: HashMap<BuffKind, i64>,

    /// Fractional crafting progress per producer role, in [0, 1) after
    /// each conversion to whole units.
    pub craft_progress: HashMap<Role, f64>,

    // Fractional accrual carries for integer counters, each in [0, 1)
    // after conversion.
    #[serde(default)]
    pub gold_carry: f64,
    #[serde(default)]
    pub rune_carry: f64,
    #[serde(default)]
    pub willpower_carry: f64,

    pub altar: AltarState,
    pub guild: Guild,

    /// Lifetime kills per enemy id.
    pub kill_tally: HashMap<String, u64>,

    /// Timestamp of the last processed tick.
    pub last_tick: i64,
    /// Timestamp of the last session activity, used for offline catch-up.
    pub last_seen: i64,
}

impl Entity {
    pub fn new(name: impl Into<String>, now: i64) -> Self {
        Self {
            name: name.into(),
            gold: 0,
            runes: 0,
            willpower: 0,
            echoes: 0.0,
            unclaimed_gold: 0,
            inventory: HashMap::new(),
            unclaimed_items: HashMap::new(),
            members: HashMap::new(),
            hunts: Vec::new(),
            expeditions: Vec::new(),
            buffs: HashMap::new(),
            craft_progress: HashMap::new(),
            gold_carry: 0.0,
            rune_carry: 0.0,
            willpower_carry: 0.0,
            altar: AltarState::default(),
            guild: Guild::default(),
            kill_tally: HashMap::new(),
            last_tick: now,
            last_seen: now,
        }
    }

    /// Hire a member directly, bypassing cost checks. Hosts normally go
    /// through `costs::hire_member`.
    pub fn add_member(&mut self, member: GuildMember) -> Uuid {
        let id = member.id;
        self.members.insert(id, member);
        id
    }

    pub fn member(&self, id: &Uuid) -> Option<&GuildMember> {
        self.members.get(id)
    }

    pub fn member_mut(&mut self, id: &Uuid) -> Option<&mut GuildMember> {
        self.members.get_mut(id)
    }

    /// Number of hired members with the given role.
    pub fn role_count(&self, role: Role) -> usize {
        self.members.values().filter(|m| m.role == role).count()
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deducts gold if the balance covers it. Returns false (no mutation)
    /// otherwise — "not enough gold" is an ordinary condition, not an error.
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    pub fn add_inventory_item(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.inventory.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    pub fn add_unclaimed_item(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.unclaimed_items.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Moves all unclaimed gold and items into the claimed balances.
    /// Returns (gold claimed, distinct item stacks claimed).
    pub fn claim_rewards(&mut self) -> (u64, usize) {
        let gold = std::mem::take(&mut self.unclaimed_gold);
        self.add_gold(gold);

        let items = std::mem::take(&mut self.unclaimed_items);
        let stacks = items.len();
        for (item_id, quantity) in items {
            self.add_inventory_item(&item_id, quantity);
        }
        (gold, stacks)
    }

    /// Grants a timed buff, extending rather than shortening any existing
    /// expiry for the same kind.
    pub fn grant_buff(&mut self, kind: BuffKind, duration_seconds: i64, now: i64) {
        let expiry = now + duration_seconds.max(0);
        let entry = self.buffs.entry(kind).or_insert(expiry);
        if *entry < expiry {
            *entry = expiry;
        }
    }

    /// An expired buff (expiry <= now) is absent for all consumers.
    pub fn buff_active(&self, kind: BuffKind, now: i64) -> bool {
        self.buffs.get(&kind).is_some_and(|expiry| *expiry > now)
    }

    /// Removes expired buffs, returning the kinds that lapsed.
    pub fn sweep_expired_buffs(&mut self, now: i64) -> Vec<BuffKind> {
        let expired: Vec<BuffKind> = self
            .buffs
            .iter()
            .filter(|(_, expiry)| **expiry <= now)
            .map(|(kind, _)| *kind)
            .collect();
        for kind in &expired {
            self.buffs.remove(kind);
        }
        expired
    }

    pub fn record_kills(&mut self, enemy_id: &str, kills: u64) {
        let tally = self.kill_tally.entry(enemy_id.to_string()).or_insert(0);
        *tally = tally.saturating_add(kills);
    }
}
