//! Color segmentation module

pub mod segmenter;

pub use segmenter::ColorSegmenter;

use serde::{Deserialize, Serialize};

/// How the three per-channel tests are combined into one mask bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineRule {
    /// At least two of hue, saturation and value must match (current)
    Majority,
    /// All three channels must match (legacy, stricter under uneven lighting)
    All,
}

impl CombineRule {
    pub fn accepts(&self, matches: [bool; 3]) -> bool {
        let votes = matches.iter().filter(|&&m| m).count();
        match self {
            CombineRule::Majority => votes >= 2,
            CombineRule::All => votes == 3,
        }
    }
}

/// Segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub combine: CombineRule,
    /// Chebyshev radius of the opening; 1 is a 3x3 neighborhood, 0 disables it
    pub open_radius: u8,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            combine: CombineRule::Majority,
            open_radius: 1,
        }
    }
}

impl SegmentConfig {
    /// Strict AND of all three channels
    pub fn legacy() -> Self {
        Self {
            combine: CombineRule::All,
            ..Default::default()
        }
    }

    /// Raw per-pixel votes, no speckle removal
    pub fn unfiltered() -> Self {
        Self {
            open_radius: 0,
            ..Default::default()
        }
    }
}
