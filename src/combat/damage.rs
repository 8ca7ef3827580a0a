//! Damage rules
//!
//! - Base damage is the skill's power
//! - A defending target takes half (rounded down)
//! - A pierce skill ignores defense and adds a random bonus instead

use crate::catalog::{Skill, SpecialEffect};

use super::bonus::BonusSource;

/// How a hit's damage was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageModifier {
    /// Target was not defending
    Normal,
    /// Defense halved the damage
    Defended,
    /// Defense was bypassed; carries the bonus added
    Pierced(i32),
}

impl DamageModifier {
    /// Apply this modifier to base damage
    pub fn apply(&self, damage: i32) -> i32 {
        match self {
            DamageModifier::Normal => damage,
            DamageModifier::Defended => damage / 2,
            DamageModifier::Pierced(bonus) => damage + bonus,
        }
    }
}

/// Result of a damage calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    /// Damage to apply to the target
    pub final_damage: i32,
    pub modifier: DamageModifier,
}

/// Compute the damage a skill deals to a target
pub fn calculate_damage(
    skill: &Skill,
    target_defending: bool,
    bonus: &mut dyn BonusSource,
) -> DamageResult {
    let modifier = match (target_defending, skill.effect) {
        (false, _) => DamageModifier::Normal,
        (true, Some(SpecialEffect::Pierce)) => DamageModifier::Pierced(bonus.pierce_bonus()),
        (true, _) => DamageModifier::Defended,
    };

    DamageResult {
        final_damage: modifier.apply(skill.power),
        modifier,
    }
}
