//! Turn coordination
//!
//! Collects one action per living participant. When every living participant
//! has an action recorded, the turn resolves exactly once:
//! upkeep, actions by priority, effect aging, flag reset, then either the
//! next turn opens or the match ends.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::{Broadcast, Phase, Session};
use crate::combat::{age_all, apply_upkeep, ActionKind, Resolver, SubmittedAction};
use crate::error::ActionRejection;

/// Turn coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// No match running
    Idle,
    AwaitingActions(u32),
    Resolving(u32),
    Advancing,
    Ended,
}

/// An action as requested by a participant, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub actor: String,
    pub kind: ActionKind,
    pub target: Option<String>,
    /// Skill name for attacks, item name for items
    pub skill: Option<String>,
}

impl ActionRequest {
    pub fn new(actor: &str, kind: ActionKind) -> Self {
        Self {
            actor: actor.to_string(),
            kind,
            target: None,
            skill: None,
        }
    }

    /// Attack `target` with `skill`
    pub fn attack(actor: &str, target: &str, skill: &str) -> Self {
        Self::new(actor, ActionKind::Attack)
            .with_target(target)
            .with_skill(skill)
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn with_skill(mut self, skill: &str) -> Self {
        self.skill = Some(skill.to_string());
        self
    }
}

impl Session {
    /// Record an action for the active turn and resolve the turn if complete
    pub fn submit_action(
        &mut self,
        request: ActionRequest,
    ) -> Result<Vec<Broadcast>, ActionRejection> {
        if self.phase != Phase::InProgress
            || !matches!(self.turn_state, TurnState::AwaitingActions(_))
        {
            return Err(ActionRejection::NotInProgress);
        }

        let participant = self
            .participant(&request.actor)
            .ok_or(ActionRejection::UnknownParticipant)?;
        if !participant.alive {
            return Err(ActionRejection::Dead);
        }
        if self.pending.iter().any(|a| a.actor == request.actor) {
            return Err(ActionRejection::AlreadySubmitted);
        }
        if let Some(effect) = participant.effects.impairment() {
            if request.kind != ActionKind::ForcedSkip {
                return Err(ActionRejection::Impaired(effect));
            }
        }

        let priority = participant.priority;
        debug!(
            "Action from {}: {}{}{}",
            request.actor,
            request.kind.as_wire(),
            request
                .target
                .as_deref()
                .map(|t| format!(" -> {}", t))
                .unwrap_or_default(),
            request
                .skill
                .as_deref()
                .map(|s| format!(" ({})", s))
                .unwrap_or_default()
        );

        self.pending.push(SubmittedAction {
            actor: request.actor,
            kind: request.kind,
            target: request.target,
            skill: request.skill,
            priority,
        });

        Ok(self.evaluate_turn())
    }

    /// Resolve the active turn if every living participant has acted
    pub(super) fn evaluate_turn(&mut self) -> Vec<Broadcast> {
        if self.phase != Phase::InProgress {
            return Vec::new();
        }
        let TurnState::AwaitingActions(turn) = self.turn_state else {
            return Vec::new();
        };

        let alive = self.alive_count();
        let submitted = self
            .roster
            .iter()
            .filter(|p| p.alive && self.pending.iter().any(|a| a.actor == p.name))
            .count();
        debug!("Turn {}: {}/{} actions received", turn, submitted, alive);

        if submitted < alive {
            return Vec::new();
        }

        self.resolve_turn(turn)
    }

    fn resolve_turn(&mut self, turn: u32) -> Vec<Broadcast> {
        self.turn_state = TurnState::Resolving(turn);
        let actions = std::mem::take(&mut self.pending);
        info!("Resolving turn {} with {} actions", turn, actions.len());

        let mut lines = apply_upkeep(&mut self.roster);

        let catalog = Arc::clone(&self.catalog);
        let mut resolver = Resolver::new(&catalog, self.bonus.as_mut());
        lines.extend(resolver.resolve(&mut self.roster, actions));

        age_all(&mut self.roster);
        for participant in &mut self.roster {
            participant.defending = false;
        }
        self.turns_resolved += 1;
        self.turn_state = TurnState::Advancing;

        let mut broadcasts = vec![
            Broadcast::PlayersUpdate(self.participant_views()),
            Broadcast::TurnResult(lines),
        ];
        broadcasts.extend(self.advance());
        broadcasts
    }

    /// Open the next turn, or end the match if at most one participant is alive
    fn advance(&mut self) -> Vec<Broadcast> {
        if self.alive_count() > 1 {
            self.turn += 1;
            self.turn_state = TurnState::AwaitingActions(self.turn);
            return vec![Broadcast::StartTurn(self.turn)];
        }

        self.phase = Phase::Ended;
        self.turn_state = TurnState::Ended;
        let winner = self
            .roster
            .iter()
            .find(|p| p.alive)
            .map(|p| p.name.clone());

        match &winner {
            Some(name) => info!("Match over after {} turns, winner: {}", self.turn, name),
            None => info!("Match over after {} turns, draw", self.turn),
        }

        let mut broadcasts = vec![Broadcast::GameEnd(winner)];
        broadcasts.extend(self.end_and_reset());
        broadcasts
    }
}
