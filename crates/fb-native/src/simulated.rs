//! `SimulatedNative`: an in-process stand-in for the real simulation.
//!
//! Implements both native traits over a plain `Vec` of units so the whole
//! pipeline can run in tests and demos without the engine.  It counts every
//! native call, which is how tests check that snapshot cost does not grow
//! with unit count.
//!
//! The movement/combat model is deliberately crude: units step straight at
//! their goal, attackers deal fixed damage in range, builds finish after a
//! fixed number of frames.  Nothing here is part of the bridge contract.

use std::mem;

use fb_core::{
    DefId, DefinitionTable, Faction, Frame, GameEvent, MapExtent, Position,
    ResourceCounters, SimRng, UnitFlags, UnitId,
};

use crate::{
    CommandArrays, CommandCode, NativeCommandSink, NativeError, NativeResult, NativeStatus, NativeWorld,
    SubmitReport,
};

const DEFAULT_MAX_HEALTH: f32 = 100.0;
const ATTACK_RANGE:       f32 = 200.0;
const ATTACK_DAMAGE:      f32 = 10.0;
const GUARD_DISTANCE:     f32 = 100.0;

// ── Unit state ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
enum Order {
    None,
    MoveTo(Position),
    Patrol { from: Position, to: Position, outbound: bool },
    Attack(UnitId),
    Guard(UnitId),
}

/// One simulated unit.
#[derive(Clone, Debug)]
pub struct SimUnit {
    pub id:         UnitId,
    pub def:        DefId,
    pub position:   Position,
    pub health:     f32,
    pub max_health: f32,
    pub faction:    Faction,
    pub flags:      UnitFlags,
    order:          Order,
    build_left:     u32,
}

impl SimUnit {
    /// `true` while the unit has an order in progress.
    pub fn has_order(&self) -> bool {
        self.order != Order::None
    }
}

/// Number of calls made to each native accessor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub unit_count:      usize,
    pub fill_unit_ids:   usize,
    pub fill_positions:  usize,
    pub fill_health:     usize,
    pub fill_attributes: usize,
    pub resources:       usize,
    pub map_extent:      usize,
    pub submit_commands: usize,
}

impl CallCounts {
    /// Calls made by the read side (everything except command submission).
    pub fn reads(&self) -> usize {
        self.unit_count
            + self.fill_unit_ids
            + self.fill_positions
            + self.fill_health
            + self.fill_attributes
            + self.resources
            + self.map_extent
    }

    pub fn total(&self) -> usize {
        self.reads() + self.submit_commands
    }
}

// ── SimulatedNative ───────────────────────────────────────────────────────────

pub struct SimulatedNative {
    frame:              Frame,
    map:                MapExtent,
    defs:               DefinitionTable,
    units:              Vec<SimUnit>,
    next_id:            u32,
    resources:          ResourceCounters,
    events:             Vec<(Frame, GameEvent)>,
    calls:              CallCounts,
    per_command_status: bool,
    spawn_before_fill:  usize,
    move_speed:         f32,
    build_frames:       u32,
}

impl SimulatedNative {
    pub fn new(map: MapExtent, defs: DefinitionTable) -> Self {
        Self {
            frame: Frame::ZERO,
            map,
            defs,
            units: Vec::new(),
            next_id: 1,
            resources: ResourceCounters::default(),
            events: Vec::new(),
            calls: CallCounts::default(),
            per_command_status: true,
            spawn_before_fill: 0,
            move_speed: 4.0,
            build_frames: 30,
        }
    }

    /// Whether `submit_commands` fills the per-command status array.
    pub fn with_per_command_status(mut self, enabled: bool) -> Self {
        self.per_command_status = enabled;
        self
    }

    pub fn with_resources(mut self, resources: ResourceCounters) -> Self {
        self.resources = resources;
        self
    }

    /// World units a moving unit covers per frame.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    // ── Scenario setup ────────────────────────────────────────────────────

    /// Add a finished unit.  Emits `UnitCreated` for the current frame.
    pub fn spawn(&mut self, def: DefId, faction: Faction, position: Position, flags: UnitFlags) -> UnitId {
        let id = self.insert_unit(def, faction, position, flags);
        self.events.push((self.frame, GameEvent::UnitCreated { unit: id, def, builder: None }));
        id
    }

    /// Add `count` units at uniformly random map positions.  Faction is a
    /// coin flip between own and enemy; builder-capable definitions get the
    /// `BUILDER` flag.  Same seed, same layout.
    pub fn populate_random(&mut self, count: usize, seed: u64) {
        let mut rng = SimRng::new(seed);
        let def_count = self.defs.len().max(1);
        for _ in 0..count {
            let def = DefId(rng.gen_range(0..def_count) as u16);
            let x = rng.gen_range(0.0..=self.map.width);
            let z = rng.gen_range(0.0..=self.map.height);
            let faction = if rng.gen_bool(0.5) { Faction::Own } else { Faction::Enemy };
            let mut flags = UnitFlags::IDLE;
            if self.defs.role(def).is_some_and(|r| r.can_build()) {
                flags |= UnitFlags::BUILDER;
            }
            self.spawn(def, faction, Position::ground(x, z), flags);
        }
    }

    /// Spawn `n` extra units right before the next `fill_unit_ids`, as if the
    /// simulation created them between the count and the fill.
    pub fn spawn_before_next_fill(&mut self, n: usize) {
        self.spawn_before_fill = n;
    }

    /// Apply damage; marks the unit dead and emits `UnitDestroyed` when its
    /// health reaches zero.  Returns `false` for unknown or already-dead units.
    pub fn damage(&mut self, unit: UnitId, amount: f32, attacker: Option<UnitId>) -> bool {
        let frame = self.frame;
        let Some(u) = self.unit_mut(unit) else { return false };
        if !u.flags.is_alive() {
            return false;
        }
        u.health -= amount;
        let died = u.health <= 0.0;
        if died {
            u.health = 0.0;
            u.flags.insert(UnitFlags::DEAD);
            u.flags.remove(UnitFlags::IDLE);
            u.order = Order::None;
        }
        self.events.push((frame, GameEvent::UnitDamaged { unit, attacker, damage: amount }));
        if died {
            self.events.push((frame, GameEvent::UnitDestroyed { unit, attacker }));
        }
        true
    }

    /// Advance one frame: dead units from the previous frame disappear,
    /// income is credited, orders progress.
    pub fn advance_frame(&mut self) -> Frame {
        self.frame = self.frame.next();
        self.units.retain(|u| u.flags.is_alive());

        // Zero storage means uncapped.
        let r = &mut self.resources;
        r.metal += r.metal_income;
        r.energy += r.energy_income;
        if r.metal_storage.0 > 0.0 {
            r.metal.0 = r.metal.0.min(r.metal_storage.0);
        }
        if r.energy_storage.0 > 0.0 {
            r.energy.0 = r.energy.0.min(r.energy_storage.0);
        }

        self.progress_builds();
        self.progress_orders();
        self.frame
    }

    /// Take every occurrence emitted since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<(Frame, GameEvent)> {
        mem::take(&mut self.events)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn units(&self) -> &[SimUnit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&SimUnit> {
        self.index_of(id).map(|i| &self.units[i])
    }

    pub fn current_resources(&self) -> ResourceCounters {
        self.resources
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    pub fn reset_calls(&mut self) {
        self.calls = CallCounts::default();
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn insert_unit(&mut self, def: DefId, faction: Faction, position: Position, flags: UnitFlags) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        let max_health = self.defs.get(def).map_or(DEFAULT_MAX_HEALTH, |d| d.max_health);
        // Ids only ever grow, so `units` stays sorted by id.
        self.units.push(SimUnit {
            id,
            def,
            position,
            health: max_health,
            max_health,
            faction,
            flags,
            order: Order::None,
            build_left: 0,
        });
        id
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.binary_search_by_key(&id, |u| u.id).ok()
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut SimUnit> {
        self.index_of(id).map(move |i| &mut self.units[i])
    }

    fn progress_builds(&mut self) {
        let frame = self.frame;
        for u in self.units.iter_mut().filter(|u| u.flags.contains(UnitFlags::BEING_BUILT)) {
            u.build_left = u.build_left.saturating_sub(1);
            if u.build_left == 0 {
                u.flags.remove(UnitFlags::BEING_BUILT);
                u.flags.insert(UnitFlags::IDLE);
                self.events.push((frame, GameEvent::UnitFinished { unit: u.id }));
            }
        }
    }

    fn progress_orders(&mut self) {
        // Resolve target positions first so the mutation pass does not need
        // to read other units.
        let plans: Vec<(usize, Option<Position>, Option<UnitId>)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.flags.is_alive() && !u.flags.contains(UnitFlags::STUNNED))
            .filter_map(|(i, u)| match u.order {
                Order::None => None,
                Order::MoveTo(p) => Some((i, Some(p), None)),
                Order::Patrol { from, to, outbound } => {
                    Some((i, Some(if outbound { to } else { from }), None))
                }
                Order::Attack(t) => {
                    let tp = self.unit(t).filter(|t| t.flags.is_alive()).map(|t| t.position);
                    match tp {
                        Some(p) if p.distance_2d(u.position) <= ATTACK_RANGE => Some((i, None, Some(t))),
                        Some(p) => Some((i, Some(p), None)),
                        None => Some((i, None, None)),
                    }
                }
                Order::Guard(t) => {
                    let tp = self.unit(t).filter(|t| t.flags.is_alive()).map(|t| t.position);
                    match tp {
                        Some(p) if p.distance_2d(u.position) > GUARD_DISTANCE => Some((i, Some(p), None)),
                        Some(_) => None,
                        None => Some((i, None, None)),
                    }
                }
            })
            .collect();

        let frame = self.frame;
        let speed = self.move_speed;
        let mut hits = Vec::new();
        for (i, goal, strike) in plans {
            let u = &mut self.units[i];
            if let Some(target) = strike {
                hits.push((target, u.id));
                continue;
            }
            let Some(goal) = goal else {
                // Target is gone: the order ends.
                u.order = Order::None;
                u.flags.insert(UnitFlags::IDLE);
                self.events.push((frame, GameEvent::UnitIdle { unit: u.id }));
                continue;
            };
            let dist = u.position.distance_2d(goal);
            if dist <= speed {
                u.position.x = goal.x;
                u.position.z = goal.z;
                match u.order {
                    Order::MoveTo(_) => {
                        u.order = Order::None;
                        u.flags.insert(UnitFlags::IDLE);
                        self.events.push((frame, GameEvent::UnitIdle { unit: u.id }));
                    }
                    Order::Patrol { from, to, outbound } => {
                        u.order = Order::Patrol { from, to, outbound: !outbound };
                    }
                    _ => {}
                }
            } else {
                let step = speed / dist;
                u.position.x += (goal.x - u.position.x) * step;
                u.position.z += (goal.z - u.position.z) * step;
            }
        }
        for (target, attacker) in hits {
            self.damage(target, ATTACK_DAMAGE, Some(attacker));
        }
    }

    /// Run one command against the simulated world.
    fn apply_command(
        &mut self,
        code:   CommandCode,
        actor:  UnitId,
        target: UnitId,
        pos:    Position,
        param:  u32,
    ) -> NativeStatus {
        let frame = self.frame;
        let Some(ai) = self.index_of(actor) else {
            return NativeStatus::UNKNOWN_UNIT;
        };
        if !self.units[ai].flags.is_alive() {
            return NativeStatus::UNKNOWN_UNIT;
        }
        let target_alive = self.unit(target).is_some_and(|t| t.flags.is_alive());

        let order = match code {
            CommandCode::None => return NativeStatus::INVALID_TARGET,
            CommandCode::Stop => Order::None,
            CommandCode::Move => {
                if !self.map.contains(pos) {
                    return NativeStatus::INVALID_TARGET;
                }
                Order::MoveTo(pos)
            }
            CommandCode::Patrol => {
                if !self.map.contains(pos) {
                    return NativeStatus::INVALID_TARGET;
                }
                Order::Patrol { from: self.units[ai].position, to: pos, outbound: true }
            }
            CommandCode::Attack | CommandCode::Guard => {
                if !target_alive {
                    return NativeStatus::INVALID_TARGET;
                }
                if code == CommandCode::Attack { Order::Attack(target) } else { Order::Guard(target) }
            }
            CommandCode::Build => {
                if self.units[ai].flags.contains(UnitFlags::BEING_BUILT) {
                    return NativeStatus::UNIT_BUSY;
                }
                if !self.map.contains(pos) {
                    return NativeStatus::INVALID_BUILD_SITE;
                }
                let Ok(raw) = u16::try_from(param) else {
                    return NativeStatus::INVALID_TARGET;
                };
                let def = DefId(raw);
                let Some(d) = self.defs.get(def) else {
                    return NativeStatus::INVALID_TARGET;
                };
                if !self.resources.can_afford(d.cost_metal, d.cost_energy) {
                    return NativeStatus::INSUFFICIENT_RESOURCES;
                }
                self.resources.metal -= d.cost_metal;
                self.resources.energy -= d.cost_energy;
                let faction = self.units[ai].faction;
                let builder = self.units[ai].id;
                let build_frames = self.build_frames;
                let id = self.insert_unit(def, faction, pos, UnitFlags::BEING_BUILT);
                if let Some(u) = self.unit_mut(id) {
                    u.build_left = build_frames;
                }
                self.events.push((frame, GameEvent::UnitCreated { unit: id, def, builder: Some(builder) }));
                Order::None
            }
        };

        let u = &mut self.units[ai];
        u.order = order;
        if order == Order::None {
            u.flags.insert(UnitFlags::IDLE);
        } else {
            u.flags.remove(UnitFlags::IDLE);
        }
        NativeStatus::OK
    }
}

// ── NativeWorld ───────────────────────────────────────────────────────────────

impl NativeWorld for SimulatedNative {
    fn unit_count(&mut self) -> NativeResult<usize> {
        self.calls.unit_count += 1;
        Ok(self.units.len())
    }

    fn fill_unit_ids(&mut self, out: &mut [UnitId]) -> NativeResult<usize> {
        self.calls.fill_unit_ids += 1;
        for _ in 0..mem::take(&mut self.spawn_before_fill) {
            let center = Position::ground(self.map.width * 0.5, self.map.height * 0.5);
            self.spawn(DefId(0), Faction::Neutral, center, UnitFlags::IDLE);
        }
        for (slot, unit) in out.iter_mut().zip(&self.units) {
            *slot = unit.id;
        }
        Ok(self.units.len())
    }

    fn fill_positions(&mut self, ids: &[UnitId], out: &mut [Position]) -> NativeResult<usize> {
        self.calls.fill_positions += 1;
        let mut written = 0;
        for (id, slot) in ids.iter().zip(out.iter_mut()) {
            *slot = self.unit(*id).map_or_else(Position::default, |u| u.position);
            written += 1;
        }
        Ok(written)
    }

    fn fill_health(
        &mut self,
        ids:        &[UnitId],
        health:     &mut [f32],
        max_health: &mut [f32],
    ) -> NativeResult<usize> {
        self.calls.fill_health += 1;
        let mut written = 0;
        for ((id, h), m) in ids.iter().zip(health.iter_mut()).zip(max_health.iter_mut()) {
            let (hv, mv) = self.unit(*id).map_or((0.0, 0.0), |u| (u.health, u.max_health));
            *h = hv;
            *m = mv;
            written += 1;
        }
        Ok(written)
    }

    fn fill_attributes(
        &mut self,
        ids:      &[UnitId],
        defs:     &mut [DefId],
        factions: &mut [Faction],
        flags:    &mut [UnitFlags],
    ) -> NativeResult<usize> {
        self.calls.fill_attributes += 1;
        let mut written = 0;
        let slots = defs.iter_mut().zip(factions.iter_mut()).zip(flags.iter_mut());
        for (id, ((d, fa), fl)) in ids.iter().zip(slots) {
            match self.unit(*id) {
                Some(u) => {
                    *d = u.def;
                    *fa = u.faction;
                    *fl = u.flags;
                }
                None => {
                    *d = DefId::INVALID;
                    *fa = Faction::Neutral;
                    *fl = UnitFlags::DEAD;
                }
            }
            written += 1;
        }
        Ok(written)
    }

    fn resources(&mut self) -> NativeResult<ResourceCounters> {
        self.calls.resources += 1;
        Ok(self.resources)
    }

    fn map_extent(&mut self) -> NativeResult<MapExtent> {
        self.calls.map_extent += 1;
        Ok(self.map)
    }
}

// ── NativeCommandSink ─────────────────────────────────────────────────────────

impl NativeCommandSink for SimulatedNative {
    fn submit_commands(
        &mut self,
        commands: CommandArrays<'_>,
        status:   &mut [NativeStatus],
    ) -> NativeResult<SubmitReport> {
        self.calls.submit_commands += 1;
        if let Some((array, actual)) = commands.first_misaligned() {
            return Err(NativeError::MisalignedArrays {
                call: "submit_commands",
                array,
                expected: commands.len(),
                actual,
            });
        }
        let mut succeeded = 0;
        for i in 0..commands.len() {
            let args = commands.args[i];
            let result = self.apply_command(
                commands.codes[i],
                commands.actors[i],
                commands.targets[i],
                args.position(),
                args.param,
            );
            if result.is_ok() {
                succeeded += 1;
            }
            if self.per_command_status {
                if let Some(slot) = status.get_mut(i) {
                    *slot = result;
                }
            }
        }
        tracing::trace!(frame = %self.frame, submitted = commands.len(), succeeded, "simulated batch applied");
        Ok(SubmitReport { succeeded, per_command: self.per_command_status })
    }
}
