//! Heat signature targets and their priority-ordered categories.

use crate::core::Point2;
use serde::{Deserialize, Serialize};

/// Heat signature category, ordered by rescue priority.
///
/// Lower rank number means higher priority; `Human` always outranks
/// everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Human,
    Animal,
    Fire,
    Vehicle,
    Electronic,
}

impl TargetKind {
    /// All categories in priority order.
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Human,
        TargetKind::Animal,
        TargetKind::Fire,
        TargetKind::Vehicle,
        TargetKind::Electronic,
    ];

    /// Priority rank (1 = highest).
    pub fn priority(self) -> u8 {
        match self {
            TargetKind::Human => 1,
            TargetKind::Animal => 2,
            TargetKind::Fire => 3,
            TargetKind::Vehicle => 4,
            TargetKind::Electronic => 5,
        }
    }

    /// Nominal surface temperature in Celsius.
    pub fn temperature(self) -> f32 {
        match self {
            TargetKind::Human => 37.0,
            TargetKind::Animal => 39.0,
            TargetKind::Fire => 200.0,
            TargetKind::Vehicle => 85.0,
            TargetKind::Electronic => 45.0,
        }
    }

    /// Physical signature radius in meters.
    pub fn size(self) -> f32 {
        match self {
            TargetKind::Human => 0.8,
            TargetKind::Animal => 0.6,
            TargetKind::Fire => 1.0,
            TargetKind::Vehicle => 0.9,
            TargetKind::Electronic => 0.5,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Human => "Human Survivor",
            TargetKind::Animal => "Injured Animal",
            TargetKind::Fire => "Fire Source",
            TargetKind::Vehicle => "Vehicle Heat",
            TargetKind::Electronic => "Electronic Device",
        }
    }

    /// Upper-case short name used in status strings.
    pub fn alert_name(self) -> &'static str {
        match self {
            TargetKind::Human => "HUMAN",
            TargetKind::Animal => "ANIMAL",
            TargetKind::Fire => "FIRE",
            TargetKind::Vehicle => "VEHICLE",
            TargetKind::Electronic => "ELECTRONIC",
        }
    }

    /// True if this category strictly outranks `other`.
    pub fn outranks(self, other: TargetKind) -> bool {
        self.priority() < other.priority()
    }
}

/// Stable target identifier.
///
/// Ids are never reused within a simulation, so a remembered id either
/// resolves to the same target or to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// A heat signature placed in the arena.
#[derive(Clone, Copy, Debug)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    pub position: Point2,
}

/// Dense target storage with stable ids.
#[derive(Default)]
pub struct TargetField {
    targets: Vec<Target>,
    next_id: u32,
}

impl TargetField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target, returning its id.
    pub fn spawn(&mut self, kind: TargetKind, position: Point2) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target { id, kind, position });
        id
    }

    /// Remove a target by id.
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.swap_remove(idx))
    }

    /// Look up a target by id.
    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
