//! `CommandTranslator`: validates decisions against the current snapshot.
//!
//! Translation is pure: same snapshot and decisions, same batch.  Every
//! decision becomes either a [`TranslatedCommand`] or a [`Rejection`], and
//! one bad decision never affects another.
//!
//! Checks, in order: the actor exists and is alive; then per kind the
//! builder flag and definition (build), the position (build, move, patrol),
//! or the target (attack, guard).

use std::sync::Arc;

use fb_core::{DefinitionTable, MapExtent, Position, UnitFlags, UnitId};
use fb_native::CommandArgs;
use fb_snapshot::WorldSnapshot;

use crate::{CommandBatch, Decision, RejectReason, Rejection, TranslatedCommand};

pub struct CommandTranslator {
    defs: Arc<DefinitionTable>,
    map:  MapExtent,
}

impl CommandTranslator {
    pub fn new(defs: Arc<DefinitionTable>, map: MapExtent) -> Self {
        Self { defs, map }
    }

    pub fn map(&self) -> MapExtent {
        self.map
    }

    pub fn translate(&self, snapshot: &WorldSnapshot, decisions: &[Decision]) -> CommandBatch {
        let mut batch = CommandBatch {
            frame:      snapshot.frame(),
            decisions:  decisions.len(),
            commands:   Vec::with_capacity(decisions.len()),
            rejections: Vec::new(),
        };
        for (i, decision) in decisions.iter().enumerate() {
            match self.check(snapshot, decision) {
                Ok((target, args)) => batch.commands.push(TranslatedCommand {
                    decision: i,
                    kind: decision.kind(),
                    actor: decision.actor(),
                    target,
                    args,
                }),
                Err(reason) => batch.rejections.push(Rejection {
                    decision: i,
                    kind: decision.kind(),
                    actor: decision.actor(),
                    reason,
                }),
            }
        }
        if !batch.rejections.is_empty() {
            tracing::debug!(
                frame = %batch.frame,
                rejected = batch.rejections.len(),
                accepted = batch.commands.len(),
                "decisions rejected"
            );
        }
        batch
    }

    fn check(&self, snapshot: &WorldSnapshot, decision: &Decision) -> Result<(UnitId, CommandArgs), RejectReason> {
        let actor = snapshot.get(decision.actor()).ok_or(RejectReason::UnknownActor)?;
        if !actor.is_alive() {
            return Err(RejectReason::DeadActor);
        }

        match *decision {
            Decision::Build { def, at, .. } => {
                if !actor.flags().contains(UnitFlags::BUILDER) {
                    return Err(RejectReason::NotABuilder);
                }
                if !self.defs.contains(def) {
                    return Err(RejectReason::UnknownDefinition);
                }
                self.check_position(at)?;
                Ok((UnitId::INVALID, CommandArgs::build(at, def)))
            }
            Decision::Move { to, .. } | Decision::Patrol { to, .. } => {
                self.check_position(to)?;
                Ok((UnitId::INVALID, CommandArgs::at(to)))
            }
            Decision::Attack { unit, target } | Decision::Guard { unit, target } => {
                if target == unit {
                    return Err(RejectReason::SelfTarget);
                }
                let t = snapshot.get(target).ok_or(RejectReason::UnknownTarget)?;
                if !t.is_alive() {
                    return Err(RejectReason::DeadTarget);
                }
                Ok((target, CommandArgs::at(t.position())))
            }
            Decision::Stop { .. } => Ok((UnitId::INVALID, CommandArgs::default())),
        }
    }

    fn check_position(&self, pos: Position) -> Result<(), RejectReason> {
        if self.map.contains(pos) { Ok(()) } else { Err(RejectReason::InvalidPosition) }
    }
}
