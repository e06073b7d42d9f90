// Offline catch-up
pub const MAX_OFFLINE_SECONDS: i64 = 7 * 24 * 60 * 60;

// Combat power model
pub const DPS_PER_LEVEL_FACTOR: f64 = 0.15;
pub const CLERIC_TEAM_BUFF_PER_LEVEL: f64 = 0.10;

// Hunts
pub const HUNT_KILL_DPS_DIVISOR: f64 = 10.0;
pub const HUNT_GOLD_TAX: f64 = 0.4;
pub const HUNT_DROP_CHANCE_PER_KILL: f64 = 0.04;
pub const HUNT_DROP_CHANCE_CAP: f64 = 0.35;
pub const HUNT_DROP_QUANTITY_SCALE: f64 = 0.5;
pub const HUNT_GUILD_XP_KILL_DIVISOR: u64 = 25;
pub const FALLBACK_GOLD_PER_KILL: u32 = 5;

// Expeditions
pub const EXPEDITION_BASE_GOLD: u64 = 50;
pub const EXPEDITION_GOLD_XP_DIVISOR: u64 = 10;
pub const EXPEDITION_GOLD_PER_MEMBER: u64 = 25;

// Crafting
pub const CRAFT_MIN_SECONDS_PER_UNIT: f64 = 10.0;
pub const CRAFT_LEVEL_SPEED_FACTOR: f64 = 0.1;

// Altar accrual rates
pub const BASE_ECHO_RATE: f64 = 0.1;
pub const AMPLIFIER_BONUS_PER_LEVEL: f64 = 0.25;
pub const GOLD_GEN_RATE_PER_LEVEL: f64 = 0.5;
pub const RUNE_GEN_RATE_PER_LEVEL: f64 = 0.05;
pub const WILLPOWER_SURGE_RATE: f64 = 0.2;
pub const ECHO_BOOST_MULTIPLIER: f64 = 1.5;
pub const BUFF_DOUBLE_MULTIPLIER: f64 = 2.0;

// Altar upgrade cost curves: cost(level) = base * growth^level
pub const ALTAR_COST_BASE: f64 = 50.0;
pub const ALTAR_COST_GROWTH: f64 = 1.6;
pub const AMPLIFIER_COST_BASE: f64 = 100.0;
pub const AMPLIFIER_COST_GROWTH: f64 = 2.0;
pub const GOLD_GEN_COST_BASE: f64 = 75.0;
pub const GOLD_GEN_COST_GROWTH: f64 = 1.8;
pub const RUNE_GEN_COST_BASE: f64 = 120.0;
pub const RUNE_GEN_COST_GROWTH: f64 = 1.9;

// Guild progression: xp_to_next_level = floor(BASE * level^EXPONENT)
pub const GUILD_XP_CURVE_BASE: f64 = 100.0;
pub const GUILD_XP_CURVE_EXPONENT: f64 = 1.5;
pub const DAILY_BOUNTY_COUNT: usize = 3;

// Guild perk bonuses (fractional, e.g. 0.10 = +10%)
pub const PERK_BONUS_PERCENT: f64 = 0.10;

// Roster cost curves
pub const HIRE_COST_GROWTH: f64 = 1.5;
pub const MEMBER_UPGRADE_COST_BASE: f64 = 100.0;
pub const MEMBER_UPGRADE_COST_GROWTH: f64 = 2.0;
