//! Combat catalog
//!
//! Static lookup of archetypes, their resolution priority, and their skills.
//! The table is validated once when built, so the resolver never needs a
//! fallback for a missing entry.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error::CatalogError;

/// Starting and maximum health for every archetype
pub const DEFAULT_MAX_HP: i32 = 100;

/// Starting and maximum mana for every archetype
pub const DEFAULT_MAX_MP: i32 = 20;

/// Character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Archetype {
    Assassin,
    Archer,
    Mage,
    Necromancer,
    Lancer,
    Warrior,
}

impl Archetype {
    /// Get all archetypes
    pub fn all() -> &'static [Archetype] {
        &[
            Archetype::Assassin,
            Archetype::Archer,
            Archetype::Mage,
            Archetype::Necromancer,
            Archetype::Lancer,
            Archetype::Warrior,
        ]
    }

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Assassin => "Assassin",
            Archetype::Archer => "Archer",
            Archetype::Mage => "Mage",
            Archetype::Necromancer => "Necromancer",
            Archetype::Lancer => "Lancer",
            Archetype::Warrior => "Warrior",
        }
    }
}

impl FromStr for Archetype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assassin" => Ok(Archetype::Assassin),
            "archer" => Ok(Archetype::Archer),
            "mage" => Ok(Archetype::Mage),
            "necromancer" => Ok(Archetype::Necromancer),
            "lancer" => Ok(Archetype::Lancer),
            "warrior" => Ok(Archetype::Warrior),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Secondary consequence of a skill beyond raw damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecialEffect {
    Freeze,
    Poison,
    Burn,
    Stun,
    Lifesteal,
    /// Damage-rule override, never a status
    Pierce,
}

impl std::fmt::Display for SpecialEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpecialEffect::Freeze => "freeze",
            SpecialEffect::Poison => "poison",
            SpecialEffect::Burn => "burn",
            SpecialEffect::Stun => "stun",
            SpecialEffect::Lifesteal => "lifesteal",
            SpecialEffect::Pierce => "pierce",
        };
        write!(f, "{}", s)
    }
}

/// An archetype-scoped attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: String,
    /// Mana consumed on a successful use
    pub cost: i32,
    /// Damage before defense rules
    pub power: i32,
    pub effect: Option<SpecialEffect>,
}

impl Skill {
    /// Create a new skill
    pub fn new(name: &str, power: i32, cost: i32, effect: Option<SpecialEffect>) -> Self {
        Self {
            name: name.to_string(),
            cost,
            power,
            effect,
        }
    }
}

/// Everything the catalog knows about one archetype
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeProfile {
    pub archetype: Archetype,
    /// Higher acts first
    pub priority: u8,
    pub max_hp: i32,
    pub max_mp: i32,
    pub skills: Vec<Skill>,
}

/// Consumables usable with the `item` action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    HealthPotion,
    ManaPotion,
}

impl Item {
    /// Health restored by a health potion
    pub const HEALTH_RESTORE: i32 = 30;
    /// Mana restored by a mana potion
    pub const MANA_RESTORE: i32 = 15;

    /// Look up an item by its wire name
    pub fn from_name(name: &str) -> Option<Item> {
        match name.trim() {
            "Health Potion" => Some(Item::HealthPotion),
            "Mana Potion" => Some(Item::ManaPotion),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Item::HealthPotion => "Health Potion",
            Item::ManaPotion => "Mana Potion",
        }
    }
}

/// Immutable archetype/skill table
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: HashMap<Archetype, ArchetypeProfile>,
}

impl Catalog {
    /// Build a catalog from profiles, validating the whole table
    pub fn new(profiles: Vec<ArchetypeProfile>) -> Result<Self, CatalogError> {
        let mut by_priority: HashMap<u8, Archetype> = HashMap::new();
        let mut table = HashMap::new();

        for profile in profiles {
            if profile.skills.is_empty() {
                return Err(CatalogError::NoSkills(profile.archetype.to_string()));
            }

            let mut seen = HashSet::new();
            for skill in &profile.skills {
                if !seen.insert(skill.name.as_str()) {
                    return Err(CatalogError::DuplicateSkill {
                        archetype: profile.archetype.to_string(),
                        skill: skill.name.clone(),
                    });
                }
                if skill.cost < 0 || skill.power < 0 {
                    return Err(CatalogError::NegativeValue(skill.name.clone()));
                }
            }

            if let Some(other) = by_priority.insert(profile.priority, profile.archetype) {
                return Err(CatalogError::DuplicatePriority(
                    other.to_string(),
                    profile.archetype.to_string(),
                    profile.priority,
                ));
            }

            table.insert(profile.archetype, profile);
        }

        for archetype in Archetype::all() {
            if !table.contains_key(archetype) {
                return Err(CatalogError::MissingArchetype(archetype.to_string()));
            }
        }

        Ok(Self { profiles: table })
    }

    /// The built-in arena catalog
    pub fn standard() -> Result<Self, CatalogError> {
        use SpecialEffect::*;

        let profile = |archetype, priority, skills| ArchetypeProfile {
            archetype,
            priority,
            max_hp: DEFAULT_MAX_HP,
            max_mp: DEFAULT_MAX_MP,
            skills,
        };

        Self::new(vec![
            profile(
                Archetype::Assassin,
                6,
                vec![
                    Skill::new("Stab", 12, 0, None),
                    Skill::new("Sneak Attack", 25, 5, None),
                    Skill::new("Venom Blade", 38, 10, Some(Poison)),
                ],
            ),
            profile(
                Archetype::Archer,
                5,
                vec![
                    Skill::new("Precise Shot", 12, 0, None),
                    Skill::new("Arrow Rain", 22, 5, None),
                    Skill::new("Piercing Arrow", 40, 10, Some(Pierce)),
                ],
            ),
            profile(
                Archetype::Mage,
                4,
                vec![
                    Skill::new("Fireball", 16, 2, None),
                    Skill::new("Frost Ray", 25, 4, None),
                    Skill::new("Freezing Meteor", 40, 8, Some(Freeze)),
                ],
            ),
            profile(
                Archetype::Necromancer,
                3,
                vec![
                    Skill::new("Shadow Touch", 15, 2, None),
                    Skill::new("Necrotic Ray", 25, 4, None),
                    Skill::new("Drain Life", 33, 9, Some(Lifesteal)),
                ],
            ),
            profile(
                Archetype::Lancer,
                2,
                vec![
                    Skill::new("Lance Charge", 10, 0, None),
                    Skill::new("Deadly Spin", 15, 5, None),
                    Skill::new("Stunning Thrust", 30, 10, Some(Stun)),
                ],
            ),
            profile(
                Archetype::Warrior,
                1,
                vec![
                    Skill::new("Sword Strike", 10, 0, None),
                    Skill::new("Furious Charge", 15, 5, None),
                    Skill::new("Berserker", 30, 10, Some(Burn)),
                ],
            ),
        ])
    }

    /// Profile for an archetype (always present after validation)
    pub fn profile(&self, archetype: Archetype) -> &ArchetypeProfile {
        &self.profiles[&archetype]
    }

    /// Resolution priority for an archetype
    pub fn priority(&self, archetype: Archetype) -> u8 {
        self.profile(archetype).priority
    }

    /// Look up a skill by exact name within an archetype
    pub fn skill(&self, archetype: Archetype, name: &str) -> Option<&Skill> {
        self.profile(archetype)
            .skills
            .iter()
            .find(|s| s.name == name)
    }
}
