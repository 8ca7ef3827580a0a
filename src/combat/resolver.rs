//! Combat resolver
//!
//! Orders a turn's actions by archetype priority (highest first, submission
//! order among ties) and applies each to the roster, producing one narration
//! line per processed action.

use std::cmp::Reverse;

use tracing::{debug, warn};

use crate::catalog::{Catalog, Item, SpecialEffect};

use super::action::{ActionKind, SubmittedAction};
use super::bonus::BonusSource;
use super::damage::{calculate_damage, DamageModifier};
use super::effects::EffectType;
use super::participant::Participant;

/// Health drained by a lifesteal hit, at most
pub const LIFESTEAL_AMOUNT: i32 = 15;

/// Applies one turn's actions to the roster
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    bonus: &'a mut dyn BonusSource,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, bonus: &'a mut dyn BonusSource) -> Self {
        Self { catalog, bonus }
    }

    /// Execute every action in priority order.
    ///
    /// Actions whose actor is dead by the time their slot comes up are
    /// narrated as "could not act" without taking effect. Disconnect skips
    /// keep their own narration.
    pub fn resolve(
        &mut self,
        roster: &mut [Participant],
        mut actions: Vec<SubmittedAction>,
    ) -> Vec<String> {
        // sort_by_key is stable, so ties keep submission order
        actions.sort_by_key(|a| Reverse(a.priority));

        let mut lines = Vec::with_capacity(actions.len());
        for action in &actions {
            let Some(actor_idx) = find(roster, &action.actor) else {
                warn!("Dropping action for unknown participant {}", action.actor);
                continue;
            };

            if action.kind != ActionKind::DisconnectSkip && !roster[actor_idx].alive {
                debug!("{} died before acting", action.actor);
                lines.push(format!("{}: could not act", action.actor));
                continue;
            }

            let line = self.execute(roster, actor_idx, action);
            debug!("{}", line);
            lines.push(line);
        }

        lines
    }

    fn execute(
        &mut self,
        roster: &mut [Participant],
        actor_idx: usize,
        action: &SubmittedAction,
    ) -> String {
        let actor_name = roster[actor_idx].name.clone();

        let outcome = match &action.kind {
            ActionKind::Attack => self.attack(roster, actor_idx, action),
            ActionKind::Defend => {
                roster[actor_idx].defending = true;
                "took a defensive stance".to_string()
            }
            ActionKind::UseItem => use_item(&mut roster[actor_idx], action.skill.as_deref()),
            ActionKind::ForcedSkip => match roster[actor_idx].effects.impairment() {
                Some(effect) => format!("is {} and cannot act", effect),
                None => {
                    warn!(
                        "{} sent a forced skip without an active impairment",
                        actor_name
                    );
                    "was impaired but the effect already expired".to_string()
                }
            },
            ActionKind::DisconnectSkip => "skipped the turn".to_string(),
            ActionKind::Unrecognized(kind) => {
                format!("performed an unrecognized action ({})", kind)
            }
        };

        format!("{}: {}", actor_name, outcome)
    }

    fn attack(
        &mut self,
        roster: &mut [Participant],
        actor_idx: usize,
        action: &SubmittedAction,
    ) -> String {
        let target_idx = action
            .target
            .as_deref()
            .and_then(|name| find(roster, name))
            .filter(|idx| roster[*idx].alive);

        let Some(target_idx) = target_idx else {
            return "tried to attack without a valid target".to_string();
        };

        let catalog = self.catalog;
        let skill_name = action.skill.as_deref().unwrap_or_default();
        let Some(skill) = catalog.skill(roster[actor_idx].archetype, skill_name) else {
            return format!("does not know {}", display_skill(skill_name));
        };

        if !roster[actor_idx].spend_mana(skill.cost) {
            return format!("did not have enough mana for {}", skill.name);
        }

        let target_name = roster[target_idx].name.clone();
        let damage = calculate_damage(skill, roster[target_idx].defending, self.bonus);

        let mut text = match damage.modifier {
            DamageModifier::Defended => {
                format!("attacked {} (defending) with {}", target_name, skill.name)
            }
            DamageModifier::Pierced(_) => format!(
                "attacked {} (defending) with {} (piercing attack ignored defense!)",
                target_name, skill.name
            ),
            DamageModifier::Normal => format!("attacked {} with {}", target_name, skill.name),
        };

        let dealt = roster[target_idx].take_damage(damage.final_damage);
        text.push_str(&format!(" dealing {} damage", dealt));

        if let Some(effect) = skill.effect {
            if let Some((status, turns)) = EffectType::granted_by(effect) {
                roster[target_idx].effects.add(status, turns);
                text.push_str(&format!(
                    " - {} is {} for {} turns!",
                    target_name,
                    status.to_string().to_uppercase(),
                    turns
                ));
            } else if effect == SpecialEffect::Lifesteal {
                let drained = roster[actor_idx].heal(LIFESTEAL_AMOUNT);
                text.push_str(&format!(
                    " - {} drained {} HP!",
                    roster[actor_idx].name, drained
                ));
            }
        }

        if !roster[target_idx].alive {
            text.push_str(&format!(" - {} was defeated!", target_name));
        }

        text
    }
}

fn use_item(actor: &mut Participant, item: Option<&str>) -> String {
    match item.and_then(Item::from_name) {
        Some(item @ Item::HealthPotion) => {
            let restored = actor.heal(Item::HEALTH_RESTORE);
            format!("used {} and restored {} HP", item.name(), restored)
        }
        Some(item @ Item::ManaPotion) => {
            let restored = actor.restore_mana(Item::MANA_RESTORE);
            format!("used {} and restored {} MP", item.name(), restored)
        }
        None => "used an unknown item".to_string(),
    }
}

fn display_skill(name: &str) -> &str {
    if name.is_empty() {
        "that skill"
    } else {
        name
    }
}

fn find(roster: &[Participant], name: &str) -> Option<usize> {
    roster.iter().position(|p| p.name == name)
}
