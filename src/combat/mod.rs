//! Combat system module
//!
//! Implements the arena's turn combat:
//! - Participant state with clamped health and mana
//! - Damage rules (defense, pierce)
//! - Status effects (frozen, stunned, poison, bleeding)
//! - Priority-ordered action resolution

mod action;
mod bonus;
mod damage;
mod effects;
mod participant;
mod resolver;

pub use action::{ActionKind, SubmittedAction};
pub use bonus::{BonusSource, FixedBonus, SeededBonus, PIERCE_BONUS_MAX};
pub use damage::{calculate_damage, DamageModifier, DamageResult};
pub use effects::{age_all, apply_upkeep, EffectType, EntityEffects};
pub use participant::Participant;
pub use resolver::{Resolver, LIFESTEAL_AMOUNT};
