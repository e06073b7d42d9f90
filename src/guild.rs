//! Guild progression and bounties.
//!
//! The guild levels up from accumulated XP, unlocking one perk per level
//! through an injected selection strategy — the default rolls uniformly
//! over the remaining pool, but a host that needs determinism can supply
//! its own [`PerkSelector`]. Bounties are goal counters generated in
//! daily batches and claimable exactly once.

use crate::constants::{DAILY_BOUNTY_COUNT, GUILD_XP_CURVE_BASE, GUILD_XP_CURVE_EXPONENT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permanent guild-wide perks, unlocked one per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuildPerk {
    /// +10% hunt gold.
    HuntersFervor,
    /// +10% crafting speed.
    MasterworkTools,
    /// -10% expedition duration.
    SwiftCaravans,
    /// +10% echo generation.
    EchoAttunement,
    /// +10% expedition gold.
    QuartermastersLedger,
    /// One extra daily bounty.
    BountifulContracts,
}

impl GuildPerk {
    pub const ALL: [GuildPerk; 6] = [
        GuildPerk::HuntersFervor,
        GuildPerk::MasterworkTools,
        GuildPerk::SwiftCaravans,
        GuildPerk::EchoAttunement,
        GuildPerk::QuartermastersLedger,
        GuildPerk::BountifulContracts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GuildPerk::HuntersFervor => "Hunter's Fervor",
            GuildPerk::MasterworkTools => "Masterwork Tools",
            GuildPerk::SwiftCaravans => "Swift Caravans",
            GuildPerk::EchoAttunement => "Echo Attunement",
            GuildPerk::QuartermastersLedger => "Quartermaster's Ledger",
            GuildPerk::BountifulContracts => "Bountiful Contracts",
        }
    }
}

/// What a bounty counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BountyKind {
    SlayEnemies,
    CompleteExpeditions,
    CraftItems,
    GatherEchoes,
}

/// A goal-counter task yielding guild XP and gold when claimed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildBounty {
    pub id: Uuid,
    pub title: String,
    pub kind: BountyKind,
    pub required: u64,
    /// Clamped to `required`; never exceeds it.
    pub current: u64,
    pub xp_reward: u64,
    pub gold_reward: u64,
    pub active: bool,
}

impl GuildBounty {
    pub fn is_claimable(&self) -> bool {
        self.active && self.current >= self.required
    }
}

/// The player's guild: meta-progression shared by all members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub name: String,
    /// Always >= 1.
    pub level: u32,
    pub xp: u64,
    pub perks: Vec<GuildPerk>,
    pub bounties: Vec<GuildBounty>,
    /// Unix day (now / 86400) of the last bounty generation.
    #[serde(default)]
    pub last_bounty_day: i64,
}

impl Default for Guild {
    fn default() -> Self {
        Self {
            name: "Adventurers' Guild".to_string(),
            level: 1,
            xp: 0,
            perks: Vec::new(),
            bounties: Vec::new(),
            last_bounty_day: 0,
        }
    }
}

impl Guild {
    pub fn has_perk(&self, perk: GuildPerk) -> bool {
        self.perks.contains(&perk)
    }

    fn remaining_perks(&self) -> Vec<GuildPerk> {
        GuildPerk::ALL
            .iter()
            .copied()
            .filter(|p| !self.perks.contains(p))
            .collect()
    }
}

/// XP required to go from `level` to `level + 1`. Strictly positive, so
/// the level-up loop always terminates.
pub fn xp_to_next_level(level: u32) -> u64 {
    let threshold = (GUILD_XP_CURVE_BASE * (level.max(1) as f64).powf(GUILD_XP_CURVE_EXPONENT))
        .floor() as u64;
    threshold.max(1)
}

/// Strategy for picking the perk unlocked on a guild level-up.
pub trait PerkSelector {
    /// Picks one of `remaining`; `None` leaves the level-up perk-less
    /// (only sensible once the pool is exhausted).
    fn select(&mut self, remaining: &[GuildPerk]) -> Option<GuildPerk>;
}

/// Default strategy: uniform random over the remaining pool. Seed the
/// generator for deterministic tests.
pub struct RandomPerkSelector<'a, R: Rng> {
    pub rng: &'a mut R,
}

impl<R: Rng> PerkSelector for RandomPerkSelector<'_, R> {
    fn select(&mut self, remaining: &[GuildPerk]) -> Option<GuildPerk> {
        if remaining.is_empty() {
            return None;
        }
        Some(remaining[self.rng.gen_range(0..remaining.len())])
    }
}

/// One guild level gained, with the perk it unlocked (if any remained).
#[derive(Debug, Clone, PartialEq)]
pub struct GuildLevelUp {
    pub level: u32,
    pub perk: Option<GuildPerk>,
}

/// Adds guild XP, resolving any number of level-ups.
pub fn add_guild_xp(
    guild: &mut Guild,
    amount: u64,
    selector: &mut impl PerkSelector,
) -> Vec<GuildLevelUp> {
    let mut level_ups = Vec::new();
    if amount == 0 {
        return level_ups;
    }
    guild.xp = guild.xp.saturating_add(amount);

    while guild.xp >= xp_to_next_level(guild.level) {
        guild.xp -= xp_to_next_level(guild.level);
        guild.level += 1;

        let perk = selector.select(&guild.remaining_perks());
        if let Some(perk) = perk {
            guild.perks.push(perk);
        }
        level_ups.push(GuildLevelUp {
            level: guild.level,
            perk,
        });
    }
    level_ups
}

/// Advances every active bounty of `kind`, clamping at the target.
pub fn record_bounty_progress(guild: &mut Guild, kind: BountyKind, amount: u64) {
    if amount == 0 {
        return;
    }
    for bounty in guild.bounties.iter_mut().filter(|b| b.active && b.kind == kind) {
        bounty.current = bounty.current.saturating_add(amount).min(bounty.required);
    }
}

/// Why a bounty claim failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BountyError {
    UnknownBounty(Uuid),
    NotComplete { current: u64, required: u64 },
}

/// Reward paid out by a successful claim.
#[derive(Debug, Clone, PartialEq)]
pub struct BountyReward {
    pub title: String,
    pub guild_xp: u64,
    pub gold: u64,
    pub level_ups: Vec<GuildLevelUp>,
}

/// Claims a completed bounty: removes it and pays exactly its rewards.
/// Gold is returned to the caller to credit the entity's balance.
pub fn claim_bounty(
    guild: &mut Guild,
    bounty_id: Uuid,
    selector: &mut impl PerkSelector,
) -> Result<BountyReward, BountyError> {
    let index = guild
        .bounties
        .iter()
        .position(|b| b.id == bounty_id)
        .ok_or(BountyError::UnknownBounty(bounty_id))?;

    let bounty = &guild.bounties[index];
    if !bounty.is_claimable() {
        return Err(BountyError::NotComplete {
            current: bounty.current,
            required: bounty.required,
        });
    }

    let bounty = guild.bounties.remove(index);
    let level_ups = add_guild_xp(guild, bounty.xp_reward, selector);
    Ok(BountyReward {
        title: bounty.title,
        guild_xp: bounty.xp_reward,
        gold: bounty.gold_reward,
        level_ups,
    })
}

/// Replaces the bounty board with a fresh daily batch. Guilds holding
/// Bountiful Contracts get one extra slot.
pub fn generate_daily_bounties(guild: &mut Guild, rng: &mut impl Rng) {
    let mut count = DAILY_BOUNTY_COUNT;
    if guild.has_perk(GuildPerk::BountifulContracts) {
        count += 1;
    }

    guild.bounties = (0..count)
        .map(|_| {
            let (kind, title, required) = match rng.gen_range(0..4) {
                0 => (
                    BountyKind::SlayEnemies,
                    "Cull the Wilds",
                    rng.gen_range(50..=200),
                ),
                1 => (
                    BountyKind::CompleteExpeditions,
                    "Charter the Roads",
                    rng.gen_range(1..=3),
                ),
                2 => (
                    BountyKind::CraftItems,
                    "Fill the Stockpile",
                    rng.gen_range(5..=20),
                ),
                _ => (
                    BountyKind::GatherEchoes,
                    "Feed the Altar",
                    rng.gen_range(20..=100),
                ),
            };
            GuildBounty {
                id: Uuid::new_v4(),
                title: title.to_string(),
                kind,
                required,
                current: 0,
                xp_reward: required * 2,
                gold_reward: required,
                active: true,
            }
        })
        .collect();
}
