//! Fixed-layout records exchanged with the native layer.
//!
//! Everything here is `#[repr(C)]` / `#[repr(transparent)]` so the arrays can
//! be handed across an FFI boundary as-is.  The bridge never sends one record
//! per call: commands travel as parallel slices of equal length.

use fb_core::{DefId, Position, UnitId};

// ── Command codes ─────────────────────────────────────────────────────────────

/// Native command type codes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum CommandCode {
    /// Padding value in pooled arrays; never submitted.
    #[default]
    None   = 0,
    Move   = 1,
    Build  = 2,
    Attack = 3,
    Stop   = 4,
    Guard  = 5,
    Patrol = 6,
}

impl CommandCode {
    pub fn from_u8(v: u8) -> Option<CommandCode> {
        Some(match v {
            1 => CommandCode::Move,
            2 => CommandCode::Build,
            3 => CommandCode::Attack,
            4 => CommandCode::Stop,
            5 => CommandCode::Guard,
            6 => CommandCode::Patrol,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandCode::None   => "none",
            CommandCode::Move   => "move",
            CommandCode::Build  => "build",
            CommandCode::Attack => "attack",
            CommandCode::Stop   => "stop",
            CommandCode::Guard  => "guard",
            CommandCode::Patrol => "patrol",
        }
    }
}

impl std::fmt::Display for CommandCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World-space argument payload of one command.
///
/// `param` carries the definition id for `Build` and is zero otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct CommandArgs {
    pub x:     f32,
    pub y:     f32,
    pub z:     f32,
    pub param: u32,
}

impl CommandArgs {
    pub fn at(pos: Position) -> Self {
        Self { x: pos.x, y: pos.y, z: pos.z, param: 0 }
    }

    pub fn build(pos: Position, def: DefId) -> Self {
        Self { param: def.0 as u32, ..Self::at(pos) }
    }

    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// Parallel command arrays for one batched submission.  All four slices have
/// the same length; `targets[i]` is `UnitId::INVALID` when command `i` has no
/// target unit.
#[derive(Copy, Clone, Debug)]
pub struct CommandArrays<'a> {
    pub codes:   &'a [CommandCode],
    pub actors:  &'a [UnitId],
    pub targets: &'a [UnitId],
    pub args:    &'a [CommandArgs],
}

impl CommandArrays<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `true` when all four arrays agree on length.
    pub fn is_aligned(&self) -> bool {
        self.first_misaligned().is_none()
    }

    /// Name and length of the first array whose length differs from `codes`.
    pub fn first_misaligned(&self) -> Option<(&'static str, usize)> {
        let n = self.codes.len();
        [("actors", self.actors.len()), ("targets", self.targets.len()), ("args", self.args.len())]
            .into_iter()
            .find(|&(_, len)| len != n)
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Per-command result code written by the native layer.
///
/// Zero means "not reported", so a zeroed status array from the pool reads
/// as "native layer gave no per-command information".
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct NativeStatus(pub i32);

impl NativeStatus {
    pub const NOT_REPORTED:           NativeStatus = NativeStatus(0);
    pub const OK:                     NativeStatus = NativeStatus(1);
    pub const INSUFFICIENT_RESOURCES: NativeStatus = NativeStatus(2);
    pub const INVALID_TARGET:         NativeStatus = NativeStatus(3);
    pub const INVALID_BUILD_SITE:     NativeStatus = NativeStatus(4);
    pub const UNIT_BUSY:              NativeStatus = NativeStatus(5);
    pub const UNKNOWN_UNIT:           NativeStatus = NativeStatus(6);

    #[inline]
    pub fn is_reported(self) -> bool {
        self != Self::NOT_REPORTED
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }
}

/// Summary returned by a batched submission.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Commands the native layer accepted.
    pub succeeded: usize,
    /// Whether the status array was filled in.
    pub per_command: bool,
}
