//! The interactive tool state machine.
//!
//! Exactly one [`ToolMode`] is active. Each mode other than `Idle` has a
//! [`Tool`] implementation; the editor picks it with a single `match` on the
//! mode and forwards pointer events and apply requests to it.

mod anchors;
mod crop;
mod threshold;

use std::fmt;

use tracing::info;

use crate::bridge::EditOp;
use crate::geometry::ScreenPoint;
use crate::history::{Checkpoints, ThresholdSource};
use crate::image::ImageId;
use crate::render::RenderScheduler;
use crate::state::AppState;

pub use anchors::AnchorTool;
pub use crop::CropTool;
pub use threshold::ThresholdTool;

/// The active editing mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolMode {
    #[default]
    Idle,
    Anchors,
    Crop,
    Threshold,
}

impl ToolMode {
    pub const ALL: [ToolMode; 4] = [Self::Idle, Self::Anchors, Self::Crop, Self::Threshold];
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::Anchors => "Anchors",
            Self::Crop => "Crop",
            Self::Threshold => "Threshold",
        };
        f.write_str(label)
    }
}

/// Mutable view of the editor handed to a tool for one event.
pub struct ToolContext<'a> {
    pub state: &'a mut AppState,
    pub scheduler: &'a mut RenderScheduler,
}

impl ToolContext<'_> {
    pub fn request_redraw(&mut self) {
        self.scheduler.request_redraw();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        info!("{status}");
        self.state.status = status;
        self.scheduler.request_redraw();
    }
}

/// Read-only inputs for building an apply request.
pub struct ApplyContext<'a> {
    pub state: &'a AppState,
    pub history: &'a Checkpoints,
    pub threshold_source: ThresholdSource,
}

/// Behaviour of one interactive mode.
///
/// Pointer positions are in screen space; tools convert through the viewport.
/// Drag state belongs to the tool and is dropped on `exit` and `pointer_up`.
pub trait Tool {
    /// Seed mode-local defaults. Called after `state.mode` is switched.
    fn enter(&mut self, cx: &mut ToolContext<'_>);

    fn exit(&mut self, _cx: &mut ToolContext<'_>) {}

    fn pointer_down(&mut self, _cx: &mut ToolContext<'_>, _pos: ScreenPoint) {}

    fn pointer_move(&mut self, _cx: &mut ToolContext<'_>, _pos: ScreenPoint) {}

    fn pointer_up(&mut self, _cx: &mut ToolContext<'_>) {}

    /// Whether the apply action is enabled.
    fn can_apply(&self, state: &AppState) -> bool;

    /// The service call `apply` should make, or `None` when disabled.
    fn apply_op(&self, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)>;

    /// Reset after the service has returned the new preview. The new bitmap is
    /// already in `state.image`.
    fn on_applied(&mut self, cx: &mut ToolContext<'_>);

    /// Status shown while the apply is in flight.
    fn busy_status(&self) -> &'static str;

    /// Status shown when the apply completes.
    fn done_status(&self) -> &'static str;
}
