//! Per-frame hand observations as handed over by the tracking source.

use serde::{Deserialize, Serialize};

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// One tracked hand in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    #[serde(rename = "hand")]
    pub handedness: Handedness,
    /// Palm centre in device space, millimetres (x, y, z). y is vertical.
    pub palm: [f32; 3],
    /// Thumb-to-finger closure, 0.0 (open) to 1.0 (pinched).
    pub pinch: f32,
}

impl HandObservation {
    pub fn new(handedness: Handedness, palm: [f32; 3], pinch: f32) -> Self {
        Self {
            handedness,
            palm,
            pinch,
        }
    }

    pub fn left(palm_y: f32) -> Self {
        Self::new(Handedness::Left, [0.0, palm_y, 0.0], 0.0)
    }

    pub fn right(palm_y: f32, pinch: f32) -> Self {
        Self::new(Handedness::Right, [0.0, palm_y, 0.0], pinch)
    }

    pub fn palm_y(&self) -> f32 {
        self.palm[1]
    }
}

/// All hands visible in one tracking frame, in the order the SDK reported them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn new(id: u64, hands: Vec<HandObservation>) -> Self {
        Self { id, hands }
    }

    /// Last hand of the given handedness. Duplicates from sensor ambiguity
    /// resolve to whichever was reported last.
    pub fn last(&self, handedness: Handedness) -> Option<&HandObservation> {
        self.hands.iter().rev().find(|h| h.handedness == handedness)
    }
}
