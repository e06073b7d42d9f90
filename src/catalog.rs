//! Static game-data catalog.
//!
//! The simulation consumes item, enemy, and expedition definitions through
//! the [`Catalog`] trait. Lookups are by stable string identifier and may
//! miss; the simulation degrades to conservative defaults on a miss
//! instead of erroring (see `hunts`), so the catalog never blocks a tick.

use crate::entity::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry in an enemy's loot table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    /// Relative drop rate in (0, 1], multiplied into the per-tick chance.
    pub rate: f64,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    /// True for seeds/saplings that can go into a garden plot.
    #[serde(default)]
    pub plantable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub gold_per_kill: u32,
    /// Guild XP granted per kill, before the flat per-25-kills trickle.
    pub xp_per_kill: f64,
    pub loot: Vec<LootEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpeditionDefinition {
    pub id: String,
    pub name: String,
    pub duration_seconds: i64,
    pub min_members: usize,
    /// Roles that must each be present at least once among the party.
    pub required_roles: Vec<Role>,
    pub xp_reward: u64,
    /// Deterministic loot: every entry pays its full quantity on completion.
    pub loot: Vec<(String, u32)>,
}

/// Read-only lookup of static definitions by identifier.
pub trait Catalog {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
    fn enemy(&self, id: &str) -> Option<&EnemyDefinition>;
    fn expedition(&self, id: &str) -> Option<&ExpeditionDefinition>;
    fn all_expeditions(&self) -> &[ExpeditionDefinition];

    /// All items that can be planted in a garden plot.
    fn all_plantables(&self) -> Vec<&ItemDefinition>;
}

/// In-memory catalog used by tests and hosts that embed their data.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    items: HashMap<String, ItemDefinition>,
    enemies: HashMap<String, EnemyDefinition>,
    expeditions: Vec<ExpeditionDefinition>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn add_enemy(&mut self, enemy: EnemyDefinition) {
        self.enemies.insert(enemy.id.clone(), enemy);
    }

    pub fn add_expedition(&mut self, expedition: ExpeditionDefinition) {
        self.expeditions.push(expedition);
    }

    /// A small built-in data set: enough enemies, items, and expeditions
    /// to run every subsystem. Hosts with real content ship their own.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        for (id, name, plantable) in [
            ("item_goblin_ear", "Goblin Ear", false),
            ("item_bone_dust", "Bone Dust", false),
            ("item_wolf_pelt", "Wolf Pelt", false),
            ("item_ectoplasm", "Ectoplasm", false),
            ("item_herb_bundle", "Herb Bundle", true),
            ("item_vegetable_crate", "Vegetable Crate", true),
            ("item_healing_draught", "Healing Draught", false),
            ("item_scrying_rune", "Scrying Rune", false),
            ("item_iron_ingot", "Iron Ingot", false),
            ("item_cured_leather", "Cured Leather", false),
            ("item_spool_of_thread", "Spool of Thread", false),
            ("item_bolt_of_cloth", "Bolt of Cloth", false),
            ("item_ancient_relic", "Ancient Relic", false),
        ] {
            catalog.add_item(ItemDefinition {
                id: id.to_string(),
                name: name.to_string(),
                plantable,
            });
        }

        catalog.add_enemy(EnemyDefinition {
            id: "enemy_goblin".to_string(),
            name: "Goblin".to_string(),
            gold_per_kill: 3,
            xp_per_kill: 0.04,
            loot: vec![LootEntry {
                item_id: "item_goblin_ear".to_string(),
                rate: 0.6,
                min_quantity: 1,
                max_quantity: 3,
            }],
        });
        catalog.add_enemy(EnemyDefinition {
            id: "enemy_skeleton".to_string(),
            name: "Skeleton".to_string(),
            gold_per_kill: 5,
            xp_per_kill: 0.06,
            loot: vec![LootEntry {
                item_id: "item_bone_dust".to_string(),
                rate: 0.5,
                min_quantity: 1,
                max_quantity: 4,
            }],
        });
        catalog.add_enemy(EnemyDefinition {
            id: "enemy_dire_wolf".to_string(),
            name: "Dire Wolf".to_string(),
            gold_per_kill: 8,
            xp_per_kill: 0.08,
            loot: vec![LootEntry {
                item_id: "item_wolf_pelt".to_string(),
                rate: 0.4,
                min_quantity: 1,
                max_quantity: 2,
            }],
        });
        catalog.add_enemy(EnemyDefinition {
            id: "enemy_wraith".to_string(),
            name: "Wraith".to_string(),
            gold_per_kill: 12,
            xp_per_kill: 0.12,
            loot: vec![LootEntry {
                item_id: "item_ectoplasm".to_string(),
                rate: 0.3,
                min_quantity: 1,
                max_quantity: 2,
            }],
        });

        catalog.add_expedition(ExpeditionDefinition {
            id: "expedition_old_mine".to_string(),
            name: "Survey the Old Mine".to_string(),
            duration_seconds: 30 * 60,
            min_members: 2,
            required_roles: vec![Role::Knight],
            xp_reward: 200,
            loot: vec![("item_iron_ingot".to_string(), 4)],
        });
        catalog.add_expedition(ExpeditionDefinition {
            id: "expedition_sunken_crypt".to_string(),
            name: "Delve the Sunken Crypt".to_string(),
            duration_seconds: 2 * 60 * 60,
            min_members: 3,
            required_roles: vec![Role::Wizard, Role::Cleric],
            xp_reward: 600,
            loot: vec![
                ("item_ancient_relic".to_string(), 1),
                ("item_bone_dust".to_string(), 6),
            ],
        });
        catalog.add_expedition(ExpeditionDefinition {
            id: "expedition_herb_gathering".to_string(),
            name: "Gather Moonpetal Herbs".to_string(),
            duration_seconds: 15 * 60,
            min_members: 1,
            required_roles: vec![],
            xp_reward: 80,
            loot: vec![("item_herb_bundle".to_string(), 3)],
        });

        catalog
    }
}

impl Catalog for StaticCatalog {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    fn expedition(&self, id: &str) -> Option<&ExpeditionDefinition> {
        self.expeditions.iter().find(|e| e.id == id)
    }

    fn all_expeditions(&self) -> &[ExpeditionDefinition] {
        &self.expeditions
    }

    fn all_plantables(&self) -> Vec<&ItemDefinition> {
        self.items.values().filter(|i| i.plantable).collect()
    }
}
