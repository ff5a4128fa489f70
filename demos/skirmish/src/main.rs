//! skirmish: smallest end-to-end run of the frame_bridge pipeline.
//!
//! Drives `SimulatedNative` for a fixed number of frames: own units hunt the
//! nearest enemy through the spatial index, constructors build tanks when
//! the stockpile allows.  Pass a JSON config path as the first argument to
//! override the defaults; `RUST_LOG=debug` shows every pipeline stage.

mod scenario;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use fb_bridge::{BridgeBuilder, DecisionModel, DecisionSet, FrameContext, TracingObserver};
use fb_command::Decision;
use fb_core::{BridgeConfig, DefId, Faction, FrameClock, Position, UnitFlags, UnitId};
use fb_native::SimulatedNative;

// ── Constants ─────────────────────────────────────────────────────────────────

const UNITS_PER_SIDE: usize = 400;
const SEED:           u64   = 42;
const GAME_SECONDS:   u64   = 60;
const HUNT_RADIUS:    f32   = 900.0;

// ── Decision subsystems ───────────────────────────────────────────────────────

/// Idle combat units attack the nearest live enemy in range, or advance
/// toward the enemy base.  A unit whose last order was refused advances
/// instead of retrying the attack.
struct Hunt {
    advance_to: Position,
}

impl DecisionModel for Hunt {
    fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision> {
        let refused: Vec<UnitId> = ctx.refused_last_frame().collect();
        ctx.own_units()
            .filter(|u| u.flags().is_idle() && !u.flags().is_builder())
            .map(|u| {
                if refused.contains(&u.id()) {
                    return Decision::Move { unit: u.id(), to: self.advance_to };
                }
                let target = ctx
                    .spatial
                    .nearest(u.position(), HUNT_RADIUS, |c| c.faction().is_hostile() && c.is_alive())
                    .ok()
                    .flatten();
                match target {
                    Some((enemy, _)) => Decision::Attack { unit: u.id(), target: enemy },
                    None => Decision::Move { unit: u.id(), to: self.advance_to },
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "hunt"
    }
}

/// Idle constructors build one tank next to themselves when affordable.
struct Economy {
    tank: DefId,
}

impl DecisionModel for Economy {
    fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision> {
        let Some(def) = ctx.defs.get(self.tank) else { return vec![] };
        if !ctx.resources().can_afford(def.cost_metal, def.cost_energy) {
            return vec![];
        }
        ctx.own_units()
            .filter(|u| u.flags().contains(UnitFlags::BUILDER | UnitFlags::IDLE))
            .take(1)
            .map(|u| {
                let p = u.position();
                let at = Position::ground((p.x + 64.0).min(ctx.map.width), p.z);
                Decision::Build { builder: u.id(), def: self.tank, at }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "economy"
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => fb_bridge::config::load(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        None => BridgeConfig::default(),
    };

    println!("=== skirmish: frame_bridge ===");
    println!("Units per side: {UNITS_PER_SIDE}  |  Game seconds: {GAME_SECONDS}  |  Seed: {SEED}");
    println!(
        "Cell size: {}  |  Rebuild: {:?}  |  Budget: {} ms",
        config.cell_size, config.rebuild_policy, config.frame_budget_ms
    );
    println!();

    // 1. World.
    let (table, defs) = scenario::definitions()?;
    let table = Arc::new(table);
    let mut native = SimulatedNative::new(scenario::map(), (*table).clone())
        .with_resources(scenario::starting_resources());
    scenario::populate(&mut native, &defs, UNITS_PER_SIDE, SEED);

    // 2. Decision function.
    let model = DecisionSet::new()
        .with(Economy { tank: defs.tank })
        .with(Hunt { advance_to: Position::ground(scenario::MAP_SIZE * 0.8, scenario::MAP_SIZE * 0.5) });

    // 3. Bridge.
    let mut bridge = BridgeBuilder::new(config, native, table, model)
        .observer(TracingObserver::default())
        .build()?;

    // 4. Run.
    let frames = FrameClock::default().frames_for_secs(GAME_SECONDS);
    let t0 = Instant::now();
    let mut totals = Totals::default();
    for _ in 0..frames {
        let report = bridge.step_simulated()?;
        totals.add(&report);
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    let pool = bridge.pool_stats();
    println!("Ran {frames} frames in {:.3} s", elapsed.as_secs_f64());
    println!("  decisions      : {}", totals.decisions);
    println!("  succeeded      : {}", totals.succeeded);
    println!("  rejected       : {}", totals.rejected);
    println!("  failed         : {}", totals.failed);
    println!("  over budget    : {} frames", totals.over_budget);
    println!("  refused events : {}", totals.refused_events);
    println!("  slowest frame  : {:.3} ms", totals.slowest_ms);
    println!("  pool reuse     : {:.1} %", pool.reuse_ratio() * 100.0);
    println!();

    // 6. Survivors.
    let snapshot = bridge.snapshot().context("no frame completed")?;
    println!("{:<8} {:>8}", "Faction", "Alive");
    println!("{}", "-".repeat(17));
    for faction in [Faction::Own, Faction::Enemy] {
        let alive = snapshot.units().filter(|u| u.faction() == faction && u.is_alive()).count();
        println!("{:<8} {:>8}", faction.as_str(), alive);
    }

    Ok(())
}

#[derive(Default)]
struct Totals {
    decisions:      usize,
    succeeded:      usize,
    rejected:       usize,
    failed:         usize,
    over_budget:    usize,
    refused_events: usize,
    slowest_ms:     f64,
}

impl Totals {
    fn add(&mut self, r: &fb_bridge::FrameReport) {
        self.decisions += r.decisions;
        self.succeeded += r.succeeded;
        self.rejected += r.rejected;
        self.failed += r.failed;
        self.over_budget += usize::from(r.over_budget);
        self.refused_events += r.refused_events;
        self.slowest_ms = self.slowest_ms.max(r.elapsed.as_secs_f64() * 1_000.0);
    }
}
