//! Participant combat state
//!
//! Health and mana are kept within `[0, max]` by every mutator.

use crate::catalog::{Archetype, ArchetypeProfile};

use super::effects::EntityEffects;

/// One fighter in the session roster
#[derive(Debug, Clone)]
pub struct Participant {
    /// Unique display name
    pub name: String,
    pub archetype: Archetype,
    /// Resolution priority, copied from the catalog at admission
    pub priority: u8,
    /// Current hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Current mana
    pub mp: i32,
    /// Maximum mana
    pub max_mp: i32,
    pub alive: bool,
    /// Set by a defend action, cleared at every turn boundary
    pub defending: bool,
    pub effects: EntityEffects,
    /// Connection left during a match; pruned at reset
    pub departed: bool,
}

impl Participant {
    /// Create a participant at full health and mana
    pub fn new(name: &str, profile: &ArchetypeProfile) -> Self {
        Self {
            name: name.to_string(),
            archetype: profile.archetype,
            priority: profile.priority,
            hp: profile.max_hp,
            max_hp: profile.max_hp,
            mp: profile.max_mp,
            max_mp: profile.max_mp,
            alive: true,
            defending: false,
            effects: EntityEffects::new(),
            departed: false,
        }
    }

    /// Take damage, returning the amount actually removed.
    /// Reaching zero marks the participant dead.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.hp);
        self.hp -= actual;
        if self.hp == 0 {
            self.alive = false;
        }
        actual
    }

    /// Heal (cannot exceed max_hp)
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    /// Restore mana (cannot exceed max_mp)
    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.max_mp - self.mp);
        self.mp += actual;
        actual
    }

    /// Spend mana if enough is available
    pub fn spend_mana(&mut self, cost: i32) -> bool {
        if cost > self.mp {
            return false;
        }
        self.mp -= cost.max(0);
        true
    }

    /// Kill without damage (departure)
    pub fn mark_dead(&mut self) {
        self.alive = false;
    }

    /// Restore to the state of a fresh admission
    pub fn reset(&mut self) {
        self.hp = self.max_hp;
        self.mp = self.max_mp;
        self.alive = true;
        self.defending = false;
        self.effects.clear();
    }
}
