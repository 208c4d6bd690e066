//! Checkpoint and working image pointers.

use serde::{Deserialize, Serialize};

use crate::image::ImageId;

/// Which image id a threshold apply should start from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    /// Always threshold the last committed geometry, so retries never compound.
    #[default]
    Checkpoint,
    /// Threshold whatever the last apply produced.
    Working,
}

/// Tracks the last committed image separately from the latest working one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checkpoints {
    checkpoint: Option<ImageId>,
    working: Option<ImageId>,
}

impl Checkpoints {
    /// Commit `id`: both pointers move to it.
    pub fn set_checkpoint(&mut self, id: ImageId) {
        self.checkpoint = Some(id);
        self.working = Some(id);
    }

    pub fn set_working(&mut self, id: ImageId) {
        self.working = Some(id);
    }

    pub fn checkpoint(&self) -> Option<ImageId> {
        self.checkpoint
    }

    pub fn working(&self) -> Option<ImageId> {
        self.working
    }

    /// Pick the id a threshold apply runs against, falling back to `current`
    /// when nothing has been recorded yet.
    pub fn threshold_source(&self, policy: ThresholdSource, current: Option<ImageId>) -> Option<ImageId> {
        let tracked = match policy {
            ThresholdSource::Checkpoint => self.checkpoint,
            ThresholdSource::Working => self.working,
        };
        tracked.or(current)
    }
}
