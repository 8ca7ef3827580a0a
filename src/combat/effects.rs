//! Status effects system
//!
//! Timed effects keyed by name with a remaining-turns counter:
//! - Frozen, stunned: block normal actions
//! - Poison, bleeding: damage at the start of each turn
//!
//! Upkeep runs before any action of a turn executes; aging runs after all
//! of them.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::participant::Participant;
use crate::catalog::SpecialEffect;

/// Types of status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EffectType {
    /// Frozen - cannot act
    Frozen,
    /// Stunned - cannot act
    Stunned,
    /// Poisoned - takes damage every turn
    Poison,
    /// Bleeding - takes damage every turn
    Bleeding,
}

impl EffectType {
    /// Whether this effect prevents normal actions
    pub fn prevents_action(&self) -> bool {
        matches!(self, EffectType::Frozen | EffectType::Stunned)
    }

    /// Damage taken at the start of each turn while active
    pub fn damage_per_turn(&self) -> Option<i32> {
        match self {
            EffectType::Poison => Some(5),
            EffectType::Bleeding => Some(6),
            _ => None,
        }
    }

    /// Status granted by a skill's special effect, with its duration in turns
    pub fn granted_by(effect: SpecialEffect) -> Option<(EffectType, u32)> {
        match effect {
            SpecialEffect::Freeze => Some((EffectType::Frozen, 2)),
            SpecialEffect::Poison => Some((EffectType::Poison, 3)),
            SpecialEffect::Burn => Some((EffectType::Bleeding, 2)),
            SpecialEffect::Stun => Some((EffectType::Stunned, 2)),
            SpecialEffect::Lifesteal | SpecialEffect::Pierce => None,
        }
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EffectType::Frozen => "frozen",
            EffectType::Stunned => "stunned",
            EffectType::Poison => "poison",
            EffectType::Bleeding => "bleeding",
        };
        write!(f, "{}", s)
    }
}

/// Effects on a single participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityEffects {
    effects: BTreeMap<EffectType, u32>,
}

impl EntityEffects {
    /// Create new empty effects
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect. Reapplying overwrites the remaining duration.
    pub fn add(&mut self, effect_type: EffectType, turns: u32) {
        if turns == 0 {
            self.effects.remove(&effect_type);
        } else {
            self.effects.insert(effect_type, turns);
        }
    }

    /// Check if a specific effect is active
    pub fn has(&self, effect_type: EffectType) -> bool {
        self.effects.contains_key(&effect_type)
    }

    /// Remaining turns for an effect
    pub fn remaining(&self, effect_type: EffectType) -> Option<u32> {
        self.effects.get(&effect_type).copied()
    }

    /// The active effect blocking normal actions, if any
    pub fn impairment(&self) -> Option<EffectType> {
        self.effects.keys().copied().find(|e| e.prevents_action())
    }

    /// Decrement every counter and drop the ones reaching zero
    pub fn age(&mut self) {
        for turns in self.effects.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.effects.retain(|_, turns| *turns > 0);
    }

    /// Iterate active effects in stable order
    pub fn iter(&self) -> impl Iterator<Item = (EffectType, u32)> + '_ {
        self.effects.iter().map(|(e, t)| (*e, *t))
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Clear all effects
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl std::fmt::Display for EntityEffects {
    /// `poison(2);stunned(1)`, or `none`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.effects.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (effect, turns) in self.iter() {
            if !first {
                f.write_str(";")?;
            }
            write!(f, "{}({})", effect, turns)?;
            first = false;
        }
        Ok(())
    }
}

/// Apply damage-over-time to every living participant.
///
/// Returns one narration line per tick and one per defeat.
pub fn apply_upkeep(roster: &mut [Participant]) -> Vec<String> {
    let mut lines = Vec::new();

    for participant in roster.iter_mut() {
        for effect in [EffectType::Poison, EffectType::Bleeding] {
            if !participant.alive || !participant.effects.has(effect) {
                continue;
            }
            let Some(amount) = effect.damage_per_turn() else {
                continue;
            };

            let dealt = participant.take_damage(amount);
            debug!("{} took {} {} damage", participant.name, dealt, effect);
            lines.push(format!(
                "{} took {} {} damage",
                participant.name, dealt, effect
            ));

            if !participant.alive {
                lines.push(format!("{} was defeated by {}!", participant.name, effect));
            }
        }
    }

    lines
}

/// Age every participant's effects at the end of a turn
pub fn age_all(roster: &mut [Participant]) {
    for participant in roster.iter_mut() {
        participant.effects.age();
    }
}
