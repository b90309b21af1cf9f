//! Mission status reporting.

use crate::target::TargetKind;
use std::fmt;

/// Operator-facing mission status, one per tick.
///
/// The `Display` impl renders the fixed status vocabulary; consumers
/// match on the variant rather than the rendered string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MissionStatus {
    Initializing,
    Searching,
    ManualControl,
    NoClearPath,
    ClearPathFound,
    ContinuingRotation,
    GridProgress(u32),
    GridComplete,
    PerimeterProgress(u32),
    PerimeterComplete,
    /// New lock acquired at the given distance.
    Detected(TargetKind, f32),
    /// Pursuing a locked target at the given distance.
    Approaching(TargetKind, f32),
    /// Target reached and collected.
    Captured(TargetKind),
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MissionStatus::Initializing => write!(f, "INITIALIZING"),
            MissionStatus::Searching => write!(f, "SEARCHING"),
            MissionStatus::ManualControl => write!(f, "MANUAL CONTROL"),
            MissionStatus::NoClearPath => write!(f, "NO CLEAR PATH - ROTATING TO SCAN"),
            MissionStatus::ClearPathFound => write!(f, "CLEAR PATH FOUND - RESUMING MOVEMENT"),
            MissionStatus::ContinuingRotation => write!(f, "CONTINUING ROTATION SCAN..."),
            MissionStatus::GridProgress(p) => write!(f, "SEARCHING... {}% COMPLETE", p),
            MissionStatus::GridComplete => write!(f, "GRID SEARCH COMPLETE"),
            MissionStatus::PerimeterProgress(p) => write!(f, "PERIMETER SWEEP... {}% COMPLETE", p),
            MissionStatus::PerimeterComplete => write!(f, "PERIMETER SWEEP COMPLETE"),
            MissionStatus::Detected(kind, dist) => {
                write!(f, "{} DETECTED! DISTANCE: {:.1}m", kind.alert_name(), dist)
            }
            MissionStatus::Approaching(kind, dist) => match kind {
                TargetKind::Human => write!(f, "APPROACHING HUMAN - {:.1}m", dist),
                TargetKind::Animal => write!(f, "APPROACHING ANIMAL - {:.1}m", dist),
                other => write!(f, "APPROACHING {} - {:.1}m", other.label(), dist),
            },
            MissionStatus::Captured(kind) => match kind {
                TargetKind::Human => write!(f, "HUMAN RESCUED! RESUMING SEARCH"),
                TargetKind::Animal => write!(f, "ANIMAL RESCUED! RESUMING SEARCH"),
                other => write!(f, "{} COLLECTED! RESUMING SEARCH", other.label()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rendering() {
        assert_eq!(MissionStatus::Searching.to_string(), "SEARCHING");
        assert_eq!(
            MissionStatus::NoClearPath.to_string(),
            "NO CLEAR PATH - ROTATING TO SCAN"
        );
        assert_eq!(
            MissionStatus::GridProgress(40).to_string(),
            "SEARCHING... 40% COMPLETE"
        );
        assert_eq!(
            MissionStatus::Detected(TargetKind::Human, 7.24).to_string(),
            "HUMAN DETECTED! DISTANCE: 7.2m"
        );
        assert_eq!(
            MissionStatus::Approaching(TargetKind::Fire, 3.0).to_string(),
            "APPROACHING Fire Source - 3.0m"
        );
        assert_eq!(
            MissionStatus::Captured(TargetKind::Human).to_string(),
            "HUMAN RESCUED! RESUMING SEARCH"
        );
        assert_eq!(
            MissionStatus::Captured(TargetKind::Vehicle).to_string(),
            "Vehicle Heat COLLECTED! RESUMING SEARCH"
        );
    }
}
