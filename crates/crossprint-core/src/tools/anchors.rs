use tracing::debug;

use super::{ApplyContext, Tool, ToolContext};
use crate::bridge::EditOp;
use crate::consts::{ANCHOR_HIT_SLOP, ANCHOR_R, MAX_ANCHORS};
use crate::geometry::{ImagePoint, ScreenPoint};
use crate::image::ImageId;
use crate::state::AppState;

/// Places and drags the four perspective anchors.
#[derive(Debug, Default)]
pub struct AnchorTool {
    dragging: Option<usize>,
}

impl AnchorTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the anchor being dragged, if any.
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn clear(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        cx.state.anchors.clear();
        cx.request_redraw();
    }

    fn hit_test(state: &AppState, p: ImagePoint) -> Option<usize> {
        let radius = (ANCHOR_R + ANCHOR_HIT_SLOP) / state.viewport.zoom;
        state.anchors.iter().position(|a| a.distance(p) < radius)
    }
}

impl Tool for AnchorTool {
    fn enter(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        cx.request_redraw();
    }

    fn exit(&mut self, _cx: &mut ToolContext<'_>) {
        self.dragging = None;
    }

    fn pointer_down(&mut self, cx: &mut ToolContext<'_>, pos: ScreenPoint) {
        if !cx.state.is_loaded() {
            return;
        }
        let p = cx.state.viewport.to_image(pos);

        if let Some(hit) = Self::hit_test(cx.state, p) {
            debug!(index = hit, "anchor drag start");
            self.dragging = Some(hit);
        } else if cx.state.anchors.len() < MAX_ANCHORS {
            cx.state.anchors.push(p);
        } else {
            cx.state.anchors[MAX_ANCHORS - 1] = p;
        }
        cx.request_redraw();
    }

    fn pointer_move(&mut self, cx: &mut ToolContext<'_>, pos: ScreenPoint) {
        let Some(index) = self.dragging else {
            return;
        };
        let p = cx.state.viewport.to_image(pos);
        if let Some(anchor) = cx.state.anchors.get_mut(index) {
            *anchor = p;
            cx.request_redraw();
        }
    }

    fn pointer_up(&mut self, _cx: &mut ToolContext<'_>) {
        self.dragging = None;
    }

    fn can_apply(&self, state: &AppState) -> bool {
        state.is_loaded() && state.anchors.len() == MAX_ANCHORS
    }

    fn apply_op(&self, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)> {
        if !self.can_apply(cx.state) {
            return None;
        }
        let id = cx.state.image_id()?;
        let anchors: [ImagePoint; MAX_ANCHORS] = cx.state.anchors.as_slice().try_into().ok()?;
        Some((id, EditOp::Homography(anchors)))
    }

    fn on_applied(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        cx.state.anchors.clear();
        cx.state.fit_to_screen();
        cx.request_redraw();
    }

    fn busy_status(&self) -> &'static str {
        "Applying perspective..."
    }

    fn done_status(&self) -> &'static str {
        "Perspective corrected"
    }
}
